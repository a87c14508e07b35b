//! Feedback sink that remembers every request, for hosts without devices and for tests

use std::sync::Mutex;

use serde::Serialize;

use super::{Cue, Feedback, PulseKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum FeedbackEvent {
    Sound(Cue),
    Pulse(PulseKind),
}

#[derive(Debug, Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return and forget everything recorded so far
    pub fn take(&self) -> Vec<FeedbackEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    fn push(&self, event: FeedbackEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Feedback for RecordingFeedback {
    fn play(&self, cue: Cue) {
        self.push(FeedbackEvent::Sound(cue));
    }

    fn pulse(&self, kind: PulseKind) {
        self.push(FeedbackEvent::Pulse(kind));
    }
}
