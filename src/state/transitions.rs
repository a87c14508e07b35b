//! Pure phase transition functions
//!
//! Every function takes the current state by value and returns the next one. A transition
//! that does not apply returns its input unchanged rather than failing.

use super::{Phase, RuntimeState, WorkoutConfig};

/// Not-started state in the entry phase. Reads no clock.
pub fn idle(config: &WorkoutConfig) -> RuntimeState {
    let phase = config.entry_phase();
    let phase_duration_ms = config.phase_duration_ms(phase);
    RuntimeState {
        phase,
        round_index: 0,
        phase_duration_ms,
        phase_end_ts: None,
        paused: false,
        paused_remaining_ms: phase_duration_ms,
        started: false,
    }
}

/// Start the workout at `now`
pub fn begin(config: &WorkoutConfig, now: u64) -> RuntimeState {
    let state = idle(config);
    RuntimeState {
        started: true,
        phase_end_ts: Some(now.saturating_add(state.phase_duration_ms)),
        ..state
    }
}

pub fn pause(state: RuntimeState, now: u64) -> RuntimeState {
    if !state.is_running() {
        return state;
    }
    RuntimeState {
        paused: true,
        paused_remaining_ms: state.remaining_ms(now),
        phase_end_ts: None,
        ..state
    }
}

pub fn resume(state: RuntimeState, now: u64) -> RuntimeState {
    if !state.started || !state.paused || state.is_done() {
        return state;
    }
    RuntimeState {
        paused: false,
        phase_end_ts: Some(now.saturating_add(state.paused_remaining_ms)),
        ..state
    }
}

/// Leave the current phase at `now`. Used for natural completion and manual skips alike.
pub fn advance(state: RuntimeState, config: &WorkoutConfig, now: u64) -> RuntimeState {
    if !state.started || state.is_done() {
        return state;
    }
    let (phase, round_index) = successor(&state, config);
    let phase_duration_ms = config.phase_duration_ms(phase);
    let phase_end_ts = if phase.is_terminal() {
        None
    } else {
        Some(now.saturating_add(phase_duration_ms))
    };
    RuntimeState {
        phase,
        round_index,
        phase_duration_ms,
        phase_end_ts,
        paused: false,
        paused_remaining_ms: phase_duration_ms,
        started: state.started,
    }
}

/// Back to the pre-start state
pub fn restart(config: &WorkoutConfig) -> RuntimeState {
    idle(config)
}

fn successor(state: &RuntimeState, config: &WorkoutConfig) -> (Phase, u32) {
    match state.phase {
        Phase::Countdown | Phase::Rest => (Phase::Work, state.round_index),
        Phase::Work => {
            let completed = state.round_index + 1;
            let next = if completed >= config.rounds {
                if config.cooldown_sec > 0 {
                    Phase::Cooldown
                } else {
                    Phase::Done
                }
            } else if config.rest_sec > 0 {
                Phase::Rest
            } else {
                Phase::Work
            };
            (next, completed)
        }
        Phase::Cooldown | Phase::Done => (Phase::Done, state.round_index),
    }
}
