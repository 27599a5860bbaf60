//! Recipe Timer - a state-managed HTTP service for cooking assistance
//!
//! This is the main entry point for the recipe-timer application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use recipe_timer::{
    api::create_router,
    config::Config,
    services::{JsonStore, LogAlerts, LogWakeLock},
    state::AppState,
    tasks::{completion_alert_task, countdown_task, persistence_task, screen_wake_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "recipe_timer={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting recipe-timer v1.0.0");
    info!(
        "Configuration: host={}, port={}, data_dir={}, debounce={}ms",
        config.host,
        config.port,
        config.data_dir.display(),
        config.save_debounce_ms
    );

    // Open the storage directory up front; without it nothing can persist
    let store = match JsonStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    // Create application state, restoring any persisted timers
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store));

    // Start the background tasks
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    let persistence_state = Arc::clone(&state);
    let debounce = config.save_debounce();
    tokio::spawn(async move {
        persistence_task(persistence_state, debounce).await;
    });

    let alerts_state = Arc::clone(&state);
    tokio::spawn(async move {
        completion_alert_task(alerts_state, Arc::new(LogAlerts)).await;
    });

    let wake_state = Arc::clone(&state);
    tokio::spawn(async move {
        screen_wake_task(wake_state, Arc::new(LogWakeLock)).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers/:dish             - Read a dish's timer");
    info!("  POST   /timers/:dish/start       - Start a countdown");
    info!("  POST   /timers/:dish/pause       - Pause a countdown");
    info!("  POST   /timers/:dish/reset       - Discard a timer");
    info!("  POST   /timers/:dish/preset      - Fill inputs from a preset");
    info!("  POST   /timers/:dish/recommended - Fill inputs from the recipe");
    info!("  POST   /timers/:dish/input       - Edit a duration field");
    info!("  DELETE /timers                   - Clear all timers");
    info!("  POST   /finished/clear           - Acknowledge a completion");
    info!("  GET    /progress/:dish           - Cooking progress");
    info!("  GET    /servings/:dish           - Saved serving count");
    info!("  POST   /servings/:dish/scale     - Scale an ingredient list");
    info!("  GET    /status                   - Running overview");
    info!("  GET    /health                   - Health check");

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

    // A debounced write may still be pending; flush before exiting so the
    // last mutations survive the restart
    state.flush();
    info!("Timer state flushed, shutdown complete");

    Ok(())
}
