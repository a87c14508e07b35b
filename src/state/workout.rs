//! Workout orchestration: owns the current runtime state and drives feedback
//!
//! Every user action goes through the pure transition functions and replaces the stored
//! state. Cues are derived by comparing the phase before and after each transition.

use std::sync::Arc;

use tracing::{debug, info};

use super::{transitions, Phase, RuntimeState, Settings, TimerSnapshot};
use crate::{
    engine::{ProgressTick, SecondTick},
    feedback::{Feedback, PulseKind},
};

/// What the owner should do with the scheduling engine after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Start,
    Stop,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the action changed the runtime state
    pub applied: bool,
    pub engine: EngineCommand,
}

impl Outcome {
    fn ignored() -> Self {
        Self {
            applied: false,
            engine: EngineCommand::Keep,
        }
    }
}

pub struct Workout {
    settings: Settings,
    runtime: RuntimeState,
    /// Last remaining time reported for display
    remaining_ms: u64,
    feedback: Arc<dyn Feedback>,
}

impl Workout {
    pub fn new(settings: Settings, feedback: Arc<dyn Feedback>) -> Self {
        let runtime = transitions::idle(&settings.workout);
        Self {
            settings,
            runtime,
            remaining_ms: runtime.phase_duration_ms,
            feedback,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn runtime(&self) -> RuntimeState {
        self.runtime
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(&self.runtime, &self.settings.workout, self.remaining_ms)
    }

    /// Begin the workout. Only applies before the first start or after a restart.
    pub fn start(&mut self, now: u64) -> Outcome {
        if self.runtime.started {
            return Outcome::ignored();
        }
        self.replace(transitions::begin(&self.settings.workout, now));
        self.remaining_ms = self.runtime.phase_duration_ms;
        if self.settings.feedback.audio_enabled {
            self.feedback.play_start();
        }
        info!(
            "Workout started: {} rounds, entry phase {:?}",
            self.settings.workout.rounds, self.runtime.phase
        );
        Outcome {
            applied: true,
            engine: EngineCommand::Start,
        }
    }

    /// The engine keeps running while paused so the resume is seen on the next frame.
    pub fn pause(&mut self, now: u64) -> Outcome {
        if !self.replace(transitions::pause(self.runtime, now)) {
            return Outcome::ignored();
        }
        self.remaining_ms = self.runtime.paused_remaining_ms;
        Outcome {
            applied: true,
            engine: EngineCommand::Keep,
        }
    }

    pub fn resume(&mut self, now: u64) -> Outcome {
        if !self.replace(transitions::resume(self.runtime, now)) {
            return Outcome::ignored();
        }
        Outcome {
            applied: true,
            engine: EngineCommand::Start,
        }
    }

    /// Skip the current phase as if it ended at `now`
    pub fn skip(&mut self, now: u64) -> Outcome {
        self.advance(now)
    }

    pub fn skip_countdown(&mut self, now: u64) -> Outcome {
        if !self.runtime.started || self.runtime.phase != Phase::Countdown {
            return Outcome::ignored();
        }
        self.advance(now)
    }

    /// Natural end of the current phase, reported by the engine
    pub fn complete_phase(&mut self, now: u64) -> Outcome {
        self.advance(now)
    }

    pub fn restart(&mut self) -> Outcome {
        if !self.runtime.started {
            return Outcome::ignored();
        }
        self.replace(transitions::restart(&self.settings.workout));
        self.remaining_ms = self.runtime.phase_duration_ms;
        info!("Workout restarted");
        Outcome {
            applied: true,
            engine: EngineCommand::Stop,
        }
    }

    /// Replace the settings. A workout in progress keeps its current phase length; an idle or
    /// finished one is rebuilt from the new settings.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !self.runtime.started || self.runtime.is_done() {
            self.runtime = transitions::idle(&self.settings.workout);
            self.remaining_ms = self.runtime.phase_duration_ms;
        }
    }

    pub fn on_progress(&mut self, tick: ProgressTick) {
        if tick.state.phase_key() == self.runtime.phase_key() {
            self.remaining_ms = tick.remaining_ms;
        }
    }

    /// Final-seconds cues for the current phase instance
    pub fn on_second(&self, tick: SecondTick) {
        if tick.state.is_done() || tick.state.phase_key() != self.runtime.phase_key() {
            return;
        }
        let prefs = self.settings.feedback;
        if prefs.audio_enabled && prefs.final_10_beeps && (1..=10).contains(&tick.remaining_sec) {
            self.feedback.play_beep();
        }
        if prefs.haptics_enabled && (1..=3).contains(&tick.remaining_sec) {
            self.feedback.pulse(PulseKind::FinalCountdown);
        }
    }

    fn advance(&mut self, now: u64) -> Outcome {
        let from = self.runtime.phase;
        if !self.replace(transitions::advance(self.runtime, &self.settings.workout, now)) {
            return Outcome::ignored();
        }
        self.remaining_ms = self.runtime.phase_duration_ms;
        self.on_phase_change(from, self.runtime.phase);

        let engine = if self.runtime.is_done() {
            info!("Workout complete after {} rounds", self.runtime.round_index);
            EngineCommand::Stop
        } else {
            EngineCommand::Start
        };
        Outcome {
            applied: true,
            engine,
        }
    }

    fn on_phase_change(&self, from: Phase, to: Phase) {
        if from == to {
            return;
        }
        debug!("Phase {:?} -> {:?}", from, to);
        let prefs = self.settings.feedback;
        if prefs.audio_enabled && prefs.transition_sounds {
            self.feedback.play_transition();
        }
        if prefs.haptics_enabled {
            self.feedback.pulse(PulseKind::Transition);
        }
        if to == Phase::Done {
            if prefs.audio_enabled {
                self.feedback.play_finish();
            }
            if prefs.haptics_enabled {
                self.feedback.pulse(PulseKind::Finish);
            }
        }
    }

    /// Store `next`, reporting whether it differs from the current state
    fn replace(&mut self, next: RuntimeState) -> bool {
        let changed = next != self.runtime;
        self.runtime = next;
        changed
    }
}

impl std::fmt::Debug for Workout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workout")
            .field("settings", &self.settings)
            .field("runtime", &self.runtime)
            .field("remaining_ms", &self.remaining_ms)
            .finish_non_exhaustive()
    }
}
