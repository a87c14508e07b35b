//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{EngineCommand, Outcome, RuntimeState, Settings, TimerSnapshot, Workout};
use crate::{
    engine::{EngineHooks, EngineOptions, PhaseComplete, ProgressTick, SchedulingEngine, SecondTick},
    feedback::Feedback,
    utils::Clock,
};

/// Main application state that owns the workout and its scheduling engine
pub struct AppState {
    /// The workout being run
    pub workout: Mutex<Workout>,
    /// Frame scheduler driving phase completion
    pub engine: SchedulingEngine,
    pub clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create the application state and wire the engine back to it
    pub fn new(
        port: u16,
        host: String,
        settings: Settings,
        feedback: Arc<dyn Feedback>,
        clock: Arc<dyn Clock>,
        engine_options: EngineOptions,
    ) -> Arc<Self> {
        let workout = Workout::new(settings, feedback);
        let (timer_update_tx, timer_update_rx) = watch::channel(workout.snapshot());

        Arc::new_cyclic(|weak: &Weak<AppState>| {
            let (w1, w2, w3, w4) = (weak.clone(), weak.clone(), weak.clone(), weak.clone());
            let hooks = EngineHooks::new(
                move || w1.upgrade().and_then(|state| state.current_runtime().ok()),
                move |tick: ProgressTick| {
                    if let Some(state) = w2.upgrade() {
                        state.record_progress(tick);
                    }
                },
                move |complete: PhaseComplete| {
                    if let Some(state) = w3.upgrade() {
                        state.complete_phase(complete);
                    }
                },
            )
            .with_second_tick(move |tick: SecondTick| {
                if let Some(state) = w4.upgrade() {
                    state.second_elapsed(tick);
                }
            });

            Self {
                workout: Mutex::new(workout),
                engine: SchedulingEngine::new(hooks, Arc::clone(&clock), engine_options),
                clock,
                start_time: Instant::now(),
                port,
                host,
                last_action: Mutex::new(None),
                last_action_time: Mutex::new(None),
                timer_update_tx,
                _timer_update_rx: timer_update_rx,
            }
        })
    }

    fn lock_workout(&self) -> Result<MutexGuard<'_, Workout>, String> {
        self.workout
            .lock()
            .map_err(|e| format!("Failed to lock workout: {}", e))
    }

    /// Run a transition at `now`, drive the engine and notify watchers.
    ///
    /// The engine command runs under the workout lock so start/stop reach the engine in the
    /// same order as the state changes that produced them. Neither call takes the workout lock.
    fn transition<F>(
        &self,
        action: Option<&str>,
        now: u64,
        apply: F,
    ) -> Result<(Outcome, TimerSnapshot), String>
    where
        F: FnOnce(&mut Workout, u64) -> Outcome,
    {
        let mut workout = self.lock_workout()?;
        let outcome = apply(&mut *workout, now);
        let snapshot = workout.snapshot();
        match outcome.engine {
            EngineCommand::Start => self.engine.start(),
            EngineCommand::Stop => self.engine.stop(),
            EngineCommand::Keep => {}
        }
        drop(workout);

        if let Some(action) = action {
            self.record_action(action);
            if !outcome.applied {
                debug!("Action '{}' did not apply in phase {:?}", action, snapshot.phase);
            }
        }

        self.publish(snapshot.clone());
        Ok((outcome, snapshot))
    }

    fn user_action<F>(&self, action: &str, apply: F) -> Result<(Outcome, TimerSnapshot), String>
    where
        F: FnOnce(&mut Workout, u64) -> Outcome,
    {
        let now = self.clock.now_ms();
        self.transition(Some(action), now, apply)
    }

    /// Begin the workout
    pub fn start_workout(&self) -> Result<(Outcome, TimerSnapshot), String> {
        info!("Start requested");
        self.user_action("start", Workout::start)
    }

    pub fn pause_workout(&self) -> Result<(Outcome, TimerSnapshot), String> {
        info!("Pause requested");
        self.user_action("pause", Workout::pause)
    }

    pub fn resume_workout(&self) -> Result<(Outcome, TimerSnapshot), String> {
        info!("Resume requested");
        self.user_action("resume", Workout::resume)
    }

    pub fn skip_phase(&self) -> Result<(Outcome, TimerSnapshot), String> {
        info!("Skip requested");
        self.user_action("skip", Workout::skip)
    }

    pub fn skip_countdown(&self) -> Result<(Outcome, TimerSnapshot), String> {
        info!("Skip countdown requested");
        self.user_action("skip-countdown", Workout::skip_countdown)
    }

    pub fn restart_workout(&self) -> Result<(Outcome, TimerSnapshot), String> {
        info!("Restart requested");
        self.user_action("restart", |workout, _| workout.restart())
    }

    /// Engine reported the end of a phase. Ignored when a user action already replaced it.
    pub fn complete_phase(&self, complete: PhaseComplete) {
        let result = self.transition(None, complete.timestamp, |workout, now| {
            if workout.runtime().phase_key() != complete.phase_key {
                debug!("Dropping completion of a phase that already ended");
                return Outcome {
                    applied: false,
                    engine: EngineCommand::Keep,
                };
            }
            workout.complete_phase(now)
        });
        if let Err(e) = result {
            warn!("Failed to complete phase: {}", e);
        }
    }

    /// Engine progress update
    pub fn record_progress(&self, tick: ProgressTick) {
        let snapshot = match self.lock_workout() {
            Ok(mut workout) => {
                workout.on_progress(tick);
                workout.snapshot()
            }
            Err(e) => {
                warn!("Failed to record progress: {}", e);
                return;
            }
        };
        self.publish(snapshot);
    }

    /// Engine per-second update
    pub fn second_elapsed(&self, tick: SecondTick) {
        match self.lock_workout() {
            Ok(workout) => workout.on_second(tick),
            Err(e) => warn!("Failed to handle second tick: {}", e),
        }
    }

    /// Get current runtime state
    pub fn current_runtime(&self) -> Result<RuntimeState, String> {
        self.lock_workout().map(|workout| workout.runtime())
    }

    /// Get current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.lock_workout().map(|workout| workout.snapshot())
    }

    pub fn get_settings(&self) -> Result<Settings, String> {
        self.lock_workout().map(|workout| workout.settings())
    }

    /// Replace the settings; callers validate first
    pub fn update_settings(&self, settings: Settings) -> Result<TimerSnapshot, String> {
        let snapshot = {
            let mut workout = self.lock_workout()?;
            workout.apply_settings(settings);
            workout.snapshot()
        };
        info!(
            "Settings updated: countdown={}s work={}s rest={}s cooldown={}s rounds={}",
            settings.workout.countdown_sec,
            settings.workout.work_sec,
            settings.workout.rest_sec,
            settings.workout.cooldown_sec,
            settings.workout.rounds
        );
        self.record_action("settings");
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("port", &self.port)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
