//! Feedback devices (audio cues and haptic pulses)
//!
//! The timer core never actuates a device itself. The orchestration layer decides when a cue
//! is due and calls into a [`Feedback`] implementation.

pub mod recording;
pub mod terminal;

use serde::Serialize;

pub use recording::RecordingFeedback;
pub use terminal::TerminalFeedback;

/// Waveform of a synthesized tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// One note of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub waveform: Waveform,
    /// Peak gain in percent
    pub volume_pct: u8,
    /// Silence before this note starts
    pub delay_ms: u32,
}

const fn tone(
    frequency_hz: u32,
    duration_ms: u32,
    waveform: Waveform,
    volume_pct: u8,
    delay_ms: u32,
) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        waveform,
        volume_pct,
        delay_ms,
    }
}

/// Audio cues the timer can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    Beep,
    Transition,
    Finish,
}

impl Cue {
    pub fn tones(&self) -> &'static [Tone] {
        const START: [Tone; 2] = [
            tone(620, 90, Waveform::Triangle, 12, 0),
            tone(900, 110, Waveform::Triangle, 14, 90),
        ];
        const BEEP: [Tone; 1] = [tone(980, 85, Waveform::Square, 12, 0)];
        const TRANSITION: [Tone; 2] = [
            tone(740, 80, Waveform::Square, 11, 0),
            tone(880, 85, Waveform::Square, 11, 85),
        ];
        const FINISH: [Tone; 3] = [
            tone(660, 110, Waveform::Sine, 12, 0),
            tone(830, 110, Waveform::Sine, 12, 110),
            tone(1040, 160, Waveform::Sine, 14, 110),
        ];
        match self {
            Cue::Start => &START,
            Cue::Beep => &BEEP,
            Cue::Transition => &TRANSITION,
            Cue::Finish => &FINISH,
        }
    }
}

/// Haptic pulse kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    FinalCountdown,
    Transition,
    Finish,
}

impl PulseKind {
    /// Alternating vibrate/pause lengths in milliseconds
    pub fn pattern_ms(&self) -> &'static [u32] {
        match self {
            PulseKind::FinalCountdown => &[35],
            PulseKind::Transition => &[120],
            PulseKind::Finish => &[120, 70, 180],
        }
    }
}

/// Capability interface for whatever plays cues on the host
pub trait Feedback: Send + Sync {
    fn play(&self, cue: Cue);

    fn pulse(&self, kind: PulseKind);

    fn play_start(&self) {
        self.play(Cue::Start);
    }

    fn play_beep(&self) {
        self.play(Cue::Beep);
    }

    fn play_transition(&self) {
        self.play(Cue::Transition);
    }

    fn play_finish(&self) {
        self.play(Cue::Finish);
    }
}
