//! Events emitted by the scheduling engine and the hooks that receive them

use serde::Serialize;

use crate::state::{PhaseKey, RuntimeState};

/// Rate-limited progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressTick {
    pub timestamp: u64,
    pub remaining_ms: u64,
    pub state: RuntimeState,
}

/// Fired once per distinct whole second of a phase instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecondTick {
    pub timestamp: u64,
    pub remaining_sec: u64,
    pub remaining_ms: u64,
    pub state: RuntimeState,
}

/// The current phase instance reached zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseComplete {
    pub timestamp: u64,
    /// Phase instance that completed
    pub phase_key: PhaseKey,
}

type StateAccessor = Box<dyn Fn() -> Option<RuntimeState> + Send + Sync>;
type Handler<E> = Box<dyn Fn(E) + Send + Sync>;

/// Callbacks wiring the engine to its owner
pub struct EngineHooks {
    pub(crate) get_state: StateAccessor,
    pub(crate) on_tick: Handler<ProgressTick>,
    pub(crate) on_phase_complete: Handler<PhaseComplete>,
    pub(crate) on_second_tick: Option<Handler<SecondTick>>,
}

impl EngineHooks {
    pub fn new<S, T, C>(get_state: S, on_tick: T, on_phase_complete: C) -> Self
    where
        S: Fn() -> Option<RuntimeState> + Send + Sync + 'static,
        T: Fn(ProgressTick) + Send + Sync + 'static,
        C: Fn(PhaseComplete) + Send + Sync + 'static,
    {
        Self {
            get_state: Box::new(get_state),
            on_tick: Box::new(on_tick),
            on_phase_complete: Box::new(on_phase_complete),
            on_second_tick: None,
        }
    }

    pub fn with_second_tick<F>(mut self, on_second_tick: F) -> Self
    where
        F: Fn(SecondTick) + Send + Sync + 'static,
    {
        self.on_second_tick = Some(Box::new(on_second_tick));
        self
    }
}

impl std::fmt::Debug for EngineHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHooks")
            .field("on_second_tick", &self.on_second_tick.is_some())
            .finish_non_exhaustive()
    }
}
