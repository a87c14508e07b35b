//! State management module
//!
//! This module contains the workout data model, the pure transition functions, the
//! orchestrating owner of the current state and the shared application state.

pub mod phase;
pub mod runtime_state;
pub mod transitions;
pub mod settings;
pub mod timer_state;
pub mod workout;
pub mod app_state;

// Re-export main types
pub use phase::{Phase, WorkoutConfig};
pub use runtime_state::{PhaseKey, RuntimeState};
pub use settings::{FeedbackPrefs, FieldError, Settings};
pub use timer_state::{Controls, TimerSnapshot};
pub use workout::{EngineCommand, Outcome, Workout};
pub use app_state::AppState;
