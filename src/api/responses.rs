//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{FieldError, Settings, TimerSnapshot};

/// API response structure for workout action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The action changed the workout
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new("applied".to_string(), message, timer)
    }

    /// The action did not apply in the current state
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ignored".to_string(), message, timer)
    }
}

/// Status response with timer and engine information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub settings: Settings,
    pub engine_running: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Settings update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub status: String,
    pub settings: Settings,
    pub timer: TimerSnapshot,
}

/// Rejected settings update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub status: String,
    pub errors: Vec<FieldError>,
}

impl ValidationResponse {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self {
            status: "invalid".to_string(),
            errors,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
