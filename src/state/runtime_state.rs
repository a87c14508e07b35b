//! The single runtime value threaded through the model and the engine

use serde::{Deserialize, Serialize};

use super::Phase;

/// Runtime state of a workout. Replaced wholesale at every transition, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    pub phase: Phase,
    /// Work phases fully completed so far
    pub round_index: u32,
    /// Length of the current phase instance, fixed when the phase was entered
    pub phase_duration_ms: u64,
    /// Monotonic instant the phase ends at; `None` while paused, idle or done
    pub phase_end_ts: Option<u64>,
    pub paused: bool,
    /// Remaining time frozen at pause, or the full duration while idle
    pub paused_remaining_ms: u64,
    pub started: bool,
}

/// Identifies one instance of a running phase
pub type PhaseKey = (Phase, u32, Option<u64>);

impl RuntimeState {
    /// Whether the phase clock is ticking right now
    pub fn is_running(&self) -> bool {
        self.started && !self.paused && !self.phase.is_terminal()
    }

    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn phase_key(&self) -> PhaseKey {
        (self.phase, self.round_index, self.phase_end_ts)
    }

    /// Time left in the current phase at `now`, clamped at zero
    pub fn remaining_ms(&self, now: u64) -> u64 {
        match self.phase_end_ts {
            Some(end) => end.saturating_sub(now),
            None if self.paused || !self.started => self.paused_remaining_ms,
            None => 0,
        }
    }
}
