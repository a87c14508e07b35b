use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use hiit_timer::{
    create_router,
    engine::EngineOptions,
    feedback::RecordingFeedback,
    state::{AppState, Settings},
    utils::ManualClock,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let state = AppState::new(
        20554,
        "127.0.0.1".to_string(),
        Settings::default(),
        Arc::new(RecordingFeedback::new()),
        clock.clone(),
        EngineOptions::default(),
    );
    (create_router(Arc::clone(&state)), state, clock)
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (router, _, _) = app();
    let (status, body) = call(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn idle_status_shows_countdown() {
    let (router, _, _) = app();
    let (status, body) = call(&router, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "countdown");
    assert_eq!(body["timer"]["clock"], "00:10");
    assert_eq!(body["timer"]["controls"]["start"], true);
    assert_eq!(body["engine_running"], false);
    assert_eq!(body["settings"]["rounds"], 8);
}

#[tokio::test]
async fn workout_actions_follow_the_model() {
    let (router, state, clock) = app();

    let (_, body) = call(&router, Method::POST, "/pause", None).await;
    assert_eq!(body["status"], "ignored");

    let (status, body) = call(&router, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "applied");
    assert!(state.engine.is_running());

    clock.advance(4_000);
    let (_, body) = call(&router, Method::POST, "/pause", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["remaining_ms"], 6_000);
    assert_eq!(body["timer"]["controls"]["resume"], true);

    let (_, body) = call(&router, Method::POST, "/skip-countdown", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["phase"], "work");
    assert_eq!(body["timer"]["paused"], false);
    assert_eq!(body["timer"]["round_text"], "Round 1 / 8");

    let (_, body) = call(&router, Method::POST, "/skip", None).await;
    assert_eq!(body["timer"]["phase"], "rest");
    assert_eq!(body["timer"]["rounds_completed"], 1);

    let (_, body) = call(&router, Method::POST, "/restart", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["started"], false);
    assert!(!state.engine.is_running());

    let (_, body) = call(&router, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "restart");
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let (router, _, _) = app();
    let mut settings = serde_json::to_value(Settings::default()).unwrap();
    settings["work_sec"] = json!(2);
    let (status, body) = call(&router, Method::PUT, "/settings", Some(settings)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "work_sec");
}

#[tokio::test]
async fn settings_update_rebuilds_idle_timer() {
    let (router, _, _) = app();
    let mut settings = serde_json::to_value(Settings::default()).unwrap();
    settings["countdown_sec"] = json!(0);
    settings["work_sec"] = json!(45);
    let (status, body) = call(&router, Method::PUT, "/settings", Some(settings)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "work");
    assert_eq!(body["timer"]["clock"], "00:45");

    let (_, body) = call(&router, Method::GET, "/settings", None).await;
    assert_eq!(body["work_sec"], 45);
}
