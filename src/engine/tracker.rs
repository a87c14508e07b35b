//! Per-invocation bookkeeping of the scheduling engine
//!
//! The tracker turns one observation of `(state, now)` into the events due for that frame.
//! Remaining time is always derived from the absolute phase end instant, so irregular frame
//! spacing never accumulates into drift.

use super::events::{PhaseComplete, ProgressTick, SecondTick};
use crate::state::{PhaseKey, RuntimeState};

/// Events due for a single frame, in dispatch order
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameEvents {
    pub second: Option<SecondTick>,
    pub progress: Option<ProgressTick>,
    pub complete: Option<PhaseComplete>,
}

impl FrameEvents {
    pub fn is_empty(&self) -> bool {
        self.second.is_none() && self.progress.is_none() && self.complete.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTracker {
    /// Upper bound on progress ticks per second
    pub max_fps: u64,
    pub last_tick_ts: Option<u64>,
    /// Phase instance the second tracker belongs to
    pub second_phase_key: Option<PhaseKey>,
    pub last_second_value: Option<u64>,
    /// Phase instance that already fired its completion
    pub last_complete_key: Option<PhaseKey>,
}

impl FrameTracker {
    pub fn new(max_fps: u32) -> Self {
        Self {
            max_fps: u64::from(max_fps.max(1)),
            last_tick_ts: None,
            second_phase_key: None,
            last_second_value: None,
            last_complete_key: None,
        }
    }

    /// Forget progress and second bookkeeping. Completion memory survives so a restarted
    /// engine cannot re-fire a phase that already completed.
    pub fn reset(&mut self) {
        self.last_tick_ts = None;
        self.second_phase_key = None;
        self.last_second_value = None;
    }

    pub fn observe(
        &mut self,
        state: Option<RuntimeState>,
        now: u64,
        wants_seconds: bool,
    ) -> FrameEvents {
        let mut events = FrameEvents::default();
        let Some(state) = state.filter(RuntimeState::is_running) else {
            return events;
        };

        // A running state without an end instant is malformed; treat it as expired.
        let remaining_ms = state.phase_end_ts.unwrap_or(0).saturating_sub(now);
        let key = state.phase_key();
        if self.second_phase_key != Some(key) {
            self.second_phase_key = Some(key);
            self.last_second_value = None;
        }

        if wants_seconds {
            let remaining_sec = remaining_ms.div_ceil(1000);
            if self.last_second_value != Some(remaining_sec) {
                self.last_second_value = Some(remaining_sec);
                events.second = Some(SecondTick {
                    timestamp: now,
                    remaining_sec,
                    remaining_ms,
                    state,
                });
            }
        }

        // elapsed >= 1000 / fps, kept in integers so the rate is never exceeded
        let due = self.last_tick_ts.map_or(true, |last| {
            now.saturating_sub(last).saturating_mul(self.max_fps) >= 1000
        });
        if due || remaining_ms == 0 {
            self.last_tick_ts = Some(now);
            events.progress = Some(ProgressTick {
                timestamp: now,
                remaining_ms,
                state,
            });
        }

        if remaining_ms == 0 && self.last_complete_key != Some(key) {
            self.last_complete_key = Some(key);
            events.complete = Some(PhaseComplete {
                timestamp: now,
                phase_key: key,
            });
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{transitions, WorkoutConfig};

    fn config(work_sec: u32) -> WorkoutConfig {
        WorkoutConfig {
            countdown_sec: 0,
            work_sec,
            rest_sec: 0,
            cooldown_sec: 0,
            rounds: 2,
        }
    }

    #[test]
    fn idle_and_paused_states_emit_nothing() {
        let cfg = config(10);
        let mut tracker = FrameTracker::new(12);
        assert!(tracker.observe(None, 0, true).is_empty());
        assert!(tracker.observe(Some(transitions::idle(&cfg)), 0, true).is_empty());
        let paused = transitions::pause(transitions::begin(&cfg, 0), 100);
        assert!(tracker.observe(Some(paused), 200, true).is_empty());
        assert_eq!(tracker.last_tick_ts, None);
    }

    #[test]
    fn remaining_comes_from_end_instant() {
        let state = transitions::begin(&config(10), 1_000);
        let mut tracker = FrameTracker::new(12);
        let events = tracker.observe(Some(state), 4_321, false);
        assert_eq!(events.progress.unwrap().remaining_ms, 6_679);
        let events = tracker.observe(Some(state), 20_000, false);
        assert_eq!(events.progress.unwrap().remaining_ms, 0);
    }

    #[test]
    fn progress_is_rate_limited() {
        let state = transitions::begin(&config(10), 0);
        let mut tracker = FrameTracker::new(12);
        let fired: Vec<u64> = (0..30)
            .map(|i| i * 16)
            .filter(|&now| tracker.observe(Some(state), now, false).progress.is_some())
            .collect();
        assert_eq!(fired, vec![0, 96, 192, 288, 384]);
    }

    #[test]
    fn progress_never_exceeds_max_fps() {
        let state = transitions::begin(&config(10), 0);
        let mut tracker = FrameTracker::new(12);
        let fired: Vec<u64> = (0..1_000)
            .filter(|&now| tracker.observe(Some(state), now, false).progress.is_some())
            .collect();
        assert_eq!(fired.len(), 12);
        assert_eq!(fired[1], 84);
    }

    #[test]
    fn progress_always_reports_zero() {
        let state = transitions::begin(&config(10), 0);
        let mut tracker = FrameTracker::new(12);
        tracker.observe(Some(state), 9_990, false);
        let events = tracker.observe(Some(state), 10_000, false);
        assert_eq!(events.progress.unwrap().remaining_ms, 0);
    }

    #[test]
    fn completion_fires_once_per_phase_instance() {
        let cfg = config(10);
        let state = transitions::begin(&cfg, 0);
        let mut tracker = FrameTracker::new(12);
        let completions = (0..5)
            .filter(|i| {
                tracker
                    .observe(Some(state), 10_000 + i * 16, true)
                    .complete
                    .is_some()
            })
            .count();
        assert_eq!(completions, 1);

        let next = transitions::advance(state, &cfg, 10_064);
        assert!(tracker.observe(Some(next), 20_064, true).complete.is_some());
    }

    #[test]
    fn completion_survives_reset() {
        let state = transitions::begin(&config(10), 0);
        let mut tracker = FrameTracker::new(12);
        assert!(tracker.observe(Some(state), 10_000, false).complete.is_some());
        tracker.reset();
        assert!(tracker.observe(Some(state), 10_016, false).complete.is_none());
    }

    #[test]
    fn one_second_tick_per_whole_second() {
        let state = transitions::begin(&config(10), 0);
        let mut tracker = FrameTracker::new(12);
        let seconds: Vec<u64> = (1..37)
            .map(|i| i * 270)
            .filter(|&now| now < 10_000)
            .filter_map(|now| tracker.observe(Some(state), now, true).second)
            .map(|tick| tick.remaining_sec)
            .collect();
        assert_eq!(seconds, (1..=10).rev().collect::<Vec<_>>());

        let last = tracker.observe(Some(state), 10_000, true).second.unwrap();
        assert_eq!(last.remaining_sec, 0);
        assert!(tracker.observe(Some(state), 10_270, true).second.is_none());
    }

    #[test]
    fn resume_starts_a_fresh_second_sequence() {
        let cfg = config(10);
        let state = transitions::begin(&cfg, 0);
        let mut tracker = FrameTracker::new(12);
        assert_eq!(
            tracker.observe(Some(state), 500, true).second.unwrap().remaining_sec,
            10
        );
        let paused = transitions::pause(state, 600);
        tracker.observe(Some(paused), 700, true);
        let resumed = transitions::resume(paused, 5_000);
        let tick = tracker.observe(Some(resumed), 5_000, true).second.unwrap();
        assert_eq!(tick.remaining_sec, 10);
        assert_eq!(tracker.second_phase_key, Some(resumed.phase_key()));
    }

    #[test]
    fn malformed_running_state_counts_as_expired() {
        let mut state = transitions::begin(&config(10), 0);
        state.phase_end_ts = None;
        let mut tracker = FrameTracker::new(12);
        let events = tracker.observe(Some(state), 50, false);
        assert_eq!(events.progress.unwrap().remaining_ms, 0);
        assert!(events.complete.is_some());
    }
}
