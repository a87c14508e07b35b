//! HIIT Timer - A drift-correcting interval workout timer
//!
//! This is the main entry point for the hiit-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use hiit_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    feedback::TerminalFeedback,
    tasks::progress_reporter_task,
    utils::{shutdown_signal, MonotonicClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("hiit_timer={},tower_http=info", config.log_level()))
        .init();

    let settings = config.settings();
    info!("Starting hiit-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Workout: countdown={}s, work={}s, rest={}s, cooldown={}s, rounds={}",
        settings.workout.countdown_sec,
        settings.workout.work_sec,
        settings.workout.rest_sec,
        settings.workout.cooldown_sec,
        settings.workout.rounds
    );

    // Create application state; the engine is wired to it but idle until a start
    let state = AppState::new(
        config.port,
        config.host.clone(),
        settings,
        Arc::new(TerminalFeedback::new(config.bell)),
        Arc::new(MonotonicClock::new()),
        config.engine_options(),
    );

    // Start the progress reporter background task
    let reporter_state = Arc::clone(&state);
    tokio::spawn(async move {
        progress_reporter_task(reporter_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Begin the workout");
    info!("  POST /pause          - Pause the current phase");
    info!("  POST /resume         - Resume a paused phase");
    info!("  POST /skip           - Skip the current phase");
    info!("  POST /skip-countdown - Skip the get-ready countdown");
    info!("  POST /restart        - Return to the start");
    info!("  GET  /settings       - Show settings");
    info!("  PUT  /settings       - Replace settings");
    info!("  GET  /status         - Check current phase and remaining time");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.engine.stop();
    info!("Server shutdown complete");
    Ok(())
}
