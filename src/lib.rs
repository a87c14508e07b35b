//! HIIT Timer - A drift-correcting interval workout timer
//!
//! This library provides the pure phase transition model, the scheduling engine that turns
//! imprecise frame callbacks into exact phase completion and per-second events, and the
//! orchestration and HTTP layers that run a workout on top of them.

pub mod config;
pub mod state;
pub mod engine;
pub mod feedback;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Phase, RuntimeState, WorkoutConfig};
pub use engine::SchedulingEngine;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
