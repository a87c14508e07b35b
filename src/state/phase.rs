//! Workout phases and the immutable workout configuration

use serde::{Deserialize, Serialize};

/// One timed segment of a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Countdown,
    Work,
    Rest,
    Cooldown,
    /// Terminal: nothing follows it
    Done,
}

impl Phase {
    /// Label shown next to the countdown
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Countdown => "GET READY",
            Phase::Work => "WORK",
            Phase::Rest => "REST",
            Phase::Cooldown => "COOLDOWN",
            Phase::Done => "DONE",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done)
    }
}

/// Phase durations in whole seconds plus the number of rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    pub countdown_sec: u32,
    pub work_sec: u32,
    pub rest_sec: u32,
    pub cooldown_sec: u32,
    pub rounds: u32,
}

impl WorkoutConfig {
    /// Phase the workout opens with; a zero countdown is elided
    pub fn entry_phase(&self) -> Phase {
        if self.countdown_sec > 0 {
            Phase::Countdown
        } else {
            Phase::Work
        }
    }

    /// Configured length of `phase` in milliseconds
    pub fn phase_duration_ms(&self, phase: Phase) -> u64 {
        let seconds = match phase {
            Phase::Countdown => self.countdown_sec,
            Phase::Work => self.work_sec,
            Phase::Rest => self.rest_sec,
            Phase::Cooldown => self.cooldown_sec,
            Phase::Done => 0,
        };
        u64::from(seconds) * 1000
    }
}
