//! Utility functions module
//!
//! This module contains clocks, formatting helpers and signal handling used throughout the
//! application.

pub mod clock;
pub mod format;
pub mod signals;

// Re-export main functions
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use format::format_ms_as_clock;
pub use signals::shutdown_signal;
