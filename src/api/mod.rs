//! HTTP API module
//!
//! The boundary the rendering layer talks to. Handlers stay thin: all timer
//! semantics live in the state module.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", delete(clear_all_handler))
        .route("/timers/:dish", get(get_timer_handler))
        .route("/timers/:dish/start", post(start_timer_handler))
        .route("/timers/:dish/pause", post(pause_timer_handler))
        .route("/timers/:dish/reset", post(reset_timer_handler))
        .route("/timers/:dish/preset", post(preset_timer_handler))
        .route("/timers/:dish/recommended", post(recommended_timer_handler))
        .route("/timers/:dish/input", post(input_timer_handler))
        .route("/finished/clear", post(clear_finished_handler))
        .route(
            "/progress/:dish",
            get(get_progress_handler).delete(reset_progress_handler),
        )
        .route("/progress/:dish/complete", post(complete_step_handler))
        .route("/progress/:dish/select", post(select_step_handler))
        .route(
            "/servings/:dish",
            get(get_servings_handler)
                .post(set_servings_handler)
                .delete(reset_servings_handler),
        )
        .route("/servings/:dish/scale", post(scale_ingredients_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
