//! Feedback for a headless host: cues go to the log, optionally with a terminal bell

use std::io::Write;

use tracing::{debug, info, warn};

use super::{Cue, Feedback, PulseKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalFeedback {
    bell: bool,
}

impl TerminalFeedback {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    fn ring(&self) {
        if !self.bell {
            return;
        }
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

impl Feedback for TerminalFeedback {
    fn play(&self, cue: Cue) {
        match cue {
            Cue::Beep => debug!("Cue: beep"),
            other => info!("Cue: {:?} ({} tones)", other, other.tones().len()),
        }
        self.ring();
    }

    fn pulse(&self, kind: PulseKind) {
        debug!("Haptic pulse {:?}: {:?}ms", kind, kind.pattern_ms());
    }
}
