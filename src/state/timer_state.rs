//! Published view of the timer for status queries and watchers

use serde::{Deserialize, Serialize};

use super::{Phase, RuntimeState, WorkoutConfig};
use crate::utils::format_ms_as_clock;

/// Which user actions currently apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub skip: bool,
    pub skip_countdown: bool,
    pub restart: bool,
}

impl Controls {
    pub fn for_state(state: &RuntimeState) -> Self {
        let done = state.is_done();
        Self {
            start: !state.started,
            pause: state.started && !state.paused && !done,
            resume: state.started && state.paused && !done,
            skip: state.started && !done,
            skip_countdown: state.started && state.phase == Phase::Countdown,
            restart: state.started,
        }
    }
}

/// Timer snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub label: String,
    /// "Round k / N", shown during Work and Rest only
    pub round_text: Option<String>,
    pub rounds_completed: u32,
    pub rounds_total: u32,
    pub phase_duration_ms: u64,
    pub remaining_ms: u64,
    pub clock: String,
    pub started: bool,
    pub paused: bool,
    pub controls: Controls,
}

impl TimerSnapshot {
    pub fn new(state: &RuntimeState, config: &WorkoutConfig, remaining_ms: u64) -> Self {
        let rounds_total = config.rounds.max(1);
        let round_text = matches!(state.phase, Phase::Work | Phase::Rest).then(|| {
            let current = rounds_total.min(state.round_index + 1);
            format!("Round {} / {}", current, rounds_total)
        });

        Self {
            phase: state.phase,
            label: state.phase.label().to_string(),
            round_text,
            rounds_completed: state.round_index.min(rounds_total),
            rounds_total,
            phase_duration_ms: state.phase_duration_ms,
            remaining_ms,
            clock: format_ms_as_clock(remaining_ms),
            started: state.started,
            paused: state.paused,
            controls: Controls::for_state(state),
        }
    }

    /// Whether the timer is counting down right now
    pub fn is_active(&self) -> bool {
        self.started && !self.paused && self.phase != Phase::Done
    }
}
