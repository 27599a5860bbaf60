//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::error;

use crate::state::{servings::scale_ingredients, AppState, Ingredient, InputField};

use super::responses::{
    HealthResponse, MessageResponse, ProgressResponse, ScaledIngredient,
    ScaledIngredientsResponse, ServingsResponse, StatusResponse, TimerResponse, TimerView,
};

/// Body for POST /timers/:dish/start
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

/// Body for POST /timers/:dish/preset and /recommended
#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub minutes: u64,
}

/// Body for POST /timers/:dish/input
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub field: InputField,
    pub value: String,
}

/// Body for POST /progress/:dish/complete
#[derive(Debug, Deserialize)]
pub struct CompleteStepRequest {
    pub step: u32,
    pub total_steps: u32,
}

/// Body for POST /progress/:dish/select
#[derive(Debug, Deserialize)]
pub struct SelectStepRequest {
    pub step: u32,
}

/// Body for POST /servings/:dish
#[derive(Debug, Deserialize)]
pub struct ServingsRequest {
    pub servings: u32,
}

/// Query for GET /servings/:dish
#[derive(Debug, Deserialize)]
pub struct ServingsQuery {
    #[serde(default = "default_original_servings")]
    pub original_servings: u32,
}

fn default_original_servings() -> u32 {
    1
}

/// Body for POST /servings/:dish/scale
#[derive(Debug, Deserialize)]
pub struct ScaleRequest {
    pub original_servings: u32,
    pub ingredients: Vec<Ingredient>,
}

/// Handle GET /timers/:dish - Read a dish's timer state
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.get_timer(&dish) {
        Ok(timer) => Ok(Json(TimerResponse::new(
            "Timer state".to_string(),
            TimerView::new(&dish, timer),
        ))),
        Err(e) => {
            error!("Failed to read timer for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:dish/start - Start a countdown
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<StartRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.start_timer(body.minutes, body.seconds, &dish) {
        Ok((started, timer)) => {
            // A zero-duration start is a silent no-op, not an error
            let message = if started {
                format!("Timer started for {}", dish)
            } else {
                "Timer not started (zero duration)".to_string()
            };
            Ok(Json(TimerResponse::new(message, TimerView::new(&dish, timer))))
        }
        Err(e) => {
            error!("Failed to start timer for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:dish/pause - Pause a countdown, keeping remaining time
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.pause_timer(&dish) {
        Ok(timer) => Ok(Json(TimerResponse::new(
            format!("Timer paused for {}", dish),
            TimerView::new(&dish, timer),
        ))),
        Err(e) => {
            error!("Failed to pause timer for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:dish/reset - Discard a dish's timer entirely
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.reset_timer(&dish) {
        Ok(_removed) => match state.get_timer(&dish) {
            Ok(timer) => Ok(Json(TimerResponse::new(
                format!("Timer reset for {}", dish),
                TimerView::new(&dish, timer),
            ))),
            Err(e) => {
                error!("Failed to read timer after reset for '{}': {}", dish, e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
        Err(e) => {
            error!("Failed to reset timer for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:dish/preset - Fill inputs from a preset duration
pub async fn preset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<PresetRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.set_preset(body.minutes, &dish) {
        Ok(timer) => Ok(Json(TimerResponse::new(
            format!("Preset {} minutes for {}", body.minutes, dish),
            TimerView::new(&dish, timer),
        ))),
        Err(e) => {
            error!("Failed to set preset for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:dish/recommended - Fill inputs from the recipe's
/// recommended duration
pub async fn recommended_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<PresetRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.set_recommended(body.minutes, &dish) {
        Ok(timer) => Ok(Json(TimerResponse::new(
            format!("Recommended {} minutes for {}", body.minutes, dish),
            TimerView::new(&dish, timer),
        ))),
        Err(e) => {
            error!("Failed to set recommended time for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:dish/input - Store a raw duration input edit
pub async fn input_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<InputRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.update_input(body.field, &body.value, &dish) {
        Ok(timer) => Ok(Json(TimerResponse::new(
            "Input updated".to_string(),
            TimerView::new(&dish, timer),
        ))),
        Err(e) => {
            error!("Failed to update input for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /timers - Remove every timer and erase the persisted blob
pub async fn clear_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, StatusCode> {
    match state.clear_all_timers() {
        Ok(()) => Ok(Json(MessageResponse::ok("All timers cleared".to_string()))),
        Err(e) => {
            error!("Failed to clear timers: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /finished/clear - Acknowledge the completion modal
pub async fn clear_finished_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, StatusCode> {
    match state.clear_finished_flag() {
        Ok(()) => Ok(Json(MessageResponse::ok(
            "Finished flag cleared".to_string(),
        ))),
        Err(e) => {
            error!("Failed to clear finished flag: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the running overview
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let any_running = match state.is_any_running() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to read running state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let running_dish = match state.current_running_dish() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to read running dish: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let finished = match state.finished_flag() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to read finished flag: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let timer_count = match state.timers.lock() {
        Ok(timers) => timers.len(),
        Err(e) => {
            error!("Failed to lock timer registry: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        any_running,
        running_dish,
        finished,
        timer_count,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /progress/:dish - Read a dish's cooking progress
pub async fn get_progress_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
) -> Result<Json<ProgressResponse>, StatusCode> {
    match state.get_progress(&dish) {
        Ok(progress) => Ok(Json(ProgressResponse::new(&dish, progress))),
        Err(e) => {
            error!("Failed to read progress for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /progress/:dish/complete - Mark a cooking step complete
pub async fn complete_step_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<CompleteStepRequest>,
) -> Result<Json<ProgressResponse>, StatusCode> {
    match state.complete_step(&dish, body.step, body.total_steps) {
        Ok(progress) => Ok(Json(ProgressResponse::new(&dish, progress))),
        Err(e) => {
            error!("Failed to complete step for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /progress/:dish/select - Jump to a cooking step
pub async fn select_step_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<SelectStepRequest>,
) -> Result<Json<ProgressResponse>, StatusCode> {
    match state.select_step(&dish, body.step) {
        Ok(progress) => Ok(Json(ProgressResponse::new(&dish, progress))),
        Err(e) => {
            error!("Failed to select step for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /progress/:dish - Discard a dish's cooking progress
pub async fn reset_progress_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    match state.reset_progress(&dish) {
        Ok(_removed) => Ok(Json(MessageResponse::ok(format!(
            "Progress reset for {}",
            dish
        )))),
        Err(e) => {
            error!("Failed to reset progress for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /servings/:dish - Read the saved serving count
pub async fn get_servings_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Query(query): Query<ServingsQuery>,
) -> Result<Json<ServingsResponse>, StatusCode> {
    match state.get_servings(&dish, query.original_servings) {
        Ok(servings) => Ok(Json(ServingsResponse { dish, servings })),
        Err(e) => {
            error!("Failed to read servings for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /servings/:dish - Save a serving count
pub async fn set_servings_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<ServingsRequest>,
) -> Result<Json<ServingsResponse>, StatusCode> {
    match state.set_servings(&dish, body.servings) {
        Ok(servings) => Ok(Json(ServingsResponse { dish, servings })),
        Err(e) => {
            error!("Failed to set servings for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /servings/:dish - Forget the saved serving count
pub async fn reset_servings_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    match state.reset_servings(&dish) {
        Ok(_removed) => Ok(Json(MessageResponse::ok(format!(
            "Servings reset for {}",
            dish
        )))),
        Err(e) => {
            error!("Failed to reset servings for '{}': {}", dish, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /servings/:dish/scale - Scale an ingredient list to the
/// dish's saved serving count
pub async fn scale_ingredients_handler(
    State(state): State<Arc<AppState>>,
    Path(dish): Path<String>,
    Json(body): Json<ScaleRequest>,
) -> Result<Json<ScaledIngredientsResponse>, StatusCode> {
    let servings = match state.get_servings(&dish, body.original_servings) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to read servings for '{}': {}", dish, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let scaled = scale_ingredients(&body.ingredients, body.original_servings, servings)
        .into_iter()
        .map(ScaledIngredient::new)
        .collect();

    Ok(Json(ScaledIngredientsResponse {
        dish,
        servings,
        original_servings: body.original_servings,
        ingredients: scaled,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
