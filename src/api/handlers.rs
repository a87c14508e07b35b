//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use crate::state::{AppState, Outcome, Settings, TimerSnapshot};
use super::responses::{
    ApiResponse, HealthResponse, SettingsResponse, StatusResponse, ValidationResponse,
};

/// Turn the result of a workout action into a JSON response
fn action_response(
    action: &str,
    applied_message: &str,
    result: Result<(Outcome, TimerSnapshot), String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((outcome, timer)) if outcome.applied => {
            info!("{} endpoint called - {}", action, applied_message);
            Ok(Json(ApiResponse::applied(applied_message.to_string(), timer)))
        }
        Ok((_, timer)) => Ok(Json(ApiResponse::ignored(
            format!("Cannot {} in phase {}", action, timer.label),
            timer,
        ))),
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Begin the workout
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    action_response("start", "Workout started", state.start_workout())
}

/// Handle POST /pause - Freeze the current phase
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    action_response("pause", "Workout paused", state.pause_workout())
}

/// Handle POST /resume - Continue a paused phase
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    action_response("resume", "Workout resumed", state.resume_workout())
}

/// Handle POST /skip - End the current phase now
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    action_response("skip", "Phase skipped", state.skip_phase())
}

/// Handle POST /skip-countdown - Jump from the countdown straight into work
pub async fn skip_countdown_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    action_response("skip-countdown", "Countdown skipped", state.skip_countdown())
}

/// Handle POST /restart - Return to the pre-start state
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    action_response("restart", "Workout restarted", state.restart_workout())
}

/// Handle GET /settings - Return the active settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, StatusCode> {
    state.get_settings().map(Json).map_err(|e| {
        error!("Failed to get settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /settings - Validate and apply new settings
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Response {
    if let Err(errors) = settings.validate() {
        info!("Rejected settings update with {} invalid fields", errors.len());
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationResponse::new(errors)),
        )
            .into_response();
    }

    match state.update_settings(settings) {
        Ok(timer) => Json(SettingsResponse {
            status: "saved".to_string(),
            settings,
            timer,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to update settings: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let settings = match state.get_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        settings,
        engine_running: state.engine.is_running(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
