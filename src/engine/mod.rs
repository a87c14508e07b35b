//! Drift-correcting scheduling engine
//!
//! The engine owns a repeating frame subscription (a tokio task ticking at the display
//! refresh interval). Each frame it reads the owner's current state, derives the remaining
//! time from the phase end instant and dispatches progress, per-second and phase-complete
//! events. It never mutates state and never performs transitions itself.

pub mod events;
pub mod tracker;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, error};

use crate::utils::Clock;

pub use events::{EngineHooks, PhaseComplete, ProgressTick, SecondTick};
pub use tracker::{FrameEvents, FrameTracker};

/// Frame pacing for the engine
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Upper bound on progress callbacks per second
    pub max_fps: u32,
    /// Spacing of the repeating frame subscription
    pub frame_interval: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_fps: 12,
            frame_interval: Duration::from_millis(16),
        }
    }
}

/// Handle to the scheduling engine. Clones share the same subscription.
#[derive(Clone)]
pub struct SchedulingEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    hooks: EngineHooks,
    clock: Arc<dyn Clock>,
    frame_interval: Duration,
    active: AtomicBool,
    tracker: Mutex<FrameTracker>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SchedulingEngine {
    pub fn new(hooks: EngineHooks, clock: Arc<dyn Clock>, options: EngineOptions) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                hooks,
                clock,
                frame_interval: options.frame_interval.max(Duration::from_millis(1)),
                active: AtomicBool::new(false),
                tracker: Mutex::new(FrameTracker::new(options.max_fps)),
                task: Mutex::new(None),
            }),
        }
    }

    /// Start the frame subscription. Does nothing while already running.
    pub fn start(&self) {
        if self.inner.active.swap(true, Ordering::SeqCst) {
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            error!("Scheduling engine needs a tokio runtime to start");
            self.inner.active.store(false, Ordering::SeqCst);
            return;
        };

        self.inner.tracker().reset();

        let inner = Arc::clone(&self.inner);
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(inner.frame_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if !inner.active.load(Ordering::SeqCst) {
                    break;
                }
                inner.frame(inner.clock.now_ms());
            }
        });

        if let Some(previous) = self.inner.task_slot().replace(handle) {
            previous.abort();
        }
        debug!("Scheduling engine started");
    }

    /// Cancel the frame subscription, including a frame already scheduled.
    pub fn stop(&self) {
        let was_active = self.inner.active.swap(false, Ordering::SeqCst);
        if let Some(handle) = self.inner.task_slot().take() {
            handle.abort();
        }
        if was_active {
            debug!("Scheduling engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Run one frame at `now` outside the subscription. Ignored while stopped.
    pub fn frame_at(&self, now: u64) {
        self.inner.frame(now);
    }

    /// Copy of the engine's internal trackers
    pub fn tracker(&self) -> FrameTracker {
        self.inner.tracker().clone()
    }
}

impl EngineInner {
    fn frame(&self, now: u64) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        let state = (self.hooks.get_state)();
        let wants_seconds = self.hooks.on_second_tick.is_some();
        // The tracker lock is released before any hook runs so hooks may stop or restart us.
        let events = self.tracker().observe(state, now, wants_seconds);
        if events.is_empty() {
            return;
        }

        if let (Some(tick), Some(on_second_tick)) = (events.second, &self.hooks.on_second_tick) {
            on_second_tick(tick);
        }
        if let Some(tick) = events.progress {
            (self.hooks.on_tick)(tick);
        }
        if let Some(complete) = events.complete {
            debug!("Phase complete at {}ms", complete.timestamp);
            (self.hooks.on_phase_complete)(complete);
        }
    }

    fn tracker(&self) -> MutexGuard<'_, FrameTracker> {
        self.tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SchedulingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulingEngine")
            .field("running", &self.is_running())
            .field("frame_interval", &self.inner.frame_interval)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{transitions, RuntimeState, WorkoutConfig};
    use crate::utils::{ManualClock, MonotonicClock};

    #[derive(Default)]
    struct Recorded {
        ticks: Mutex<Vec<ProgressTick>>,
        seconds: Mutex<Vec<u64>>,
        completions: Mutex<Vec<u64>>,
    }

    fn engine_for(
        state: Arc<Mutex<Option<RuntimeState>>>,
        clock: Arc<dyn Clock>,
    ) -> (SchedulingEngine, Arc<Recorded>) {
        let recorded = Arc::new(Recorded::default());
        let (r1, r2, r3) = (
            Arc::clone(&recorded),
            Arc::clone(&recorded),
            Arc::clone(&recorded),
        );
        let hooks = EngineHooks::new(
            move || *state.lock().unwrap(),
            move |tick| r1.ticks.lock().unwrap().push(tick),
            move |done: PhaseComplete| r2.completions.lock().unwrap().push(done.timestamp),
        )
        .with_second_tick(move |tick| r3.seconds.lock().unwrap().push(tick.remaining_sec));
        (
            SchedulingEngine::new(hooks, clock, EngineOptions::default()),
            recorded,
        )
    }

    fn config() -> WorkoutConfig {
        WorkoutConfig {
            countdown_sec: 0,
            work_sec: 3,
            rest_sec: 0,
            cooldown_sec: 0,
            rounds: 1,
        }
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let state = Arc::new(Mutex::new(None));
        let (engine, _) = engine_for(state, Arc::new(ManualClock::new(0)));
        assert!(!engine.is_running());
        engine.start();
        engine.start();
        assert!(engine.is_running());
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn stopped_engine_ignores_frames() {
        let state = Arc::new(Mutex::new(Some(transitions::begin(&config(), 0))));
        let (engine, recorded) = engine_for(state, Arc::new(ManualClock::new(0)));
        engine.frame_at(3_000);
        assert!(recorded.ticks.lock().unwrap().is_empty());
        assert!(recorded.completions.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn completion_fires_once_until_owner_advances() {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
        let state = Arc::new(Mutex::new(Some(transitions::begin(&config(), 0))));
        let (engine, recorded) = engine_for(Arc::clone(&state), clock);
        engine.start();

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(recorded.completions.lock().unwrap().len(), 1);
        assert_eq!(recorded.seconds.lock().unwrap().as_slice(), &[3, 2, 1, 0]);
        let last = *recorded.ticks.lock().unwrap().last().unwrap();
        assert_eq!(last.remaining_ms, 0);

        engine.stop();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(recorded.completions.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_ticking_while_paused_and_picks_up_resume() {
        let clock = Arc::new(MonotonicClock::new());
        let paused = transitions::pause(transitions::begin(&config(), 0), 0);
        let state = Arc::new(Mutex::new(Some(paused)));
        let (engine, recorded) = engine_for(Arc::clone(&state), clock.clone());
        engine.start();

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(recorded.ticks.lock().unwrap().is_empty());
        assert!(engine.is_running());

        let resumed = transitions::resume(paused, clock.now_ms());
        *state.lock().unwrap() = Some(resumed);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let first = recorded.ticks.lock().unwrap()[0];
        assert_eq!(first.state, resumed);
        assert!(first.remaining_ms <= 3_000 && first.remaining_ms > 2_800);
        engine.stop();
    }
}
