//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server. The frame task
//! of the scheduling engine is owned by the engine itself.

pub mod progress_reporter;

// Re-export main functions
pub use progress_reporter::progress_reporter_task;
