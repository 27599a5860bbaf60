//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{format_time, Ingredient, ProgressState, TimerState};

/// A dish timer as presented to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub dish: String,
    pub remaining_seconds: u64,
    /// Zero-padded "MM:SS" rendering of the remaining time
    pub display: String,
    pub is_running: bool,
    pub input_minutes: String,
    pub input_seconds: String,
}

impl TimerView {
    pub fn new(dish: &str, state: TimerState) -> Self {
        Self {
            dish: dish.to_string(),
            display: format_time(state.remaining_seconds),
            remaining_seconds: state.remaining_seconds,
            is_running: state.is_running,
            input_minutes: state.input_minutes,
            input_seconds: state.input_seconds,
        }
    }
}

/// API response structure for timer mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    /// Create a new timer response, deriving the status from the timer
    pub fn new(message: String, timer: TimerView) -> Self {
        let status = if timer.is_running {
            "running"
        } else if timer.remaining_seconds > 0 {
            "paused"
        } else {
            "idle"
        };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Plain acknowledgement for endpoints with no timer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageResponse {
    pub fn ok(message: String) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Service status: the running overview a UI polls for its header bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub any_running: bool,
    pub running_dish: Option<String>,
    /// Unacknowledged completion pending (drives the finish modal)
    pub finished: bool,
    pub timer_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Cooking progress for one dish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub dish: String,
    pub completed_steps: Vec<u32>,
    pub current_step: u32,
    pub steps_done: usize,
}

impl ProgressResponse {
    pub fn new(dish: &str, state: ProgressState) -> Self {
        Self {
            dish: dish.to_string(),
            steps_done: state.completed_steps.len(),
            completed_steps: state.completed_steps,
            current_step: state.current_step,
        }
    }
}

/// Saved serving count for one dish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingsResponse {
    pub dish: String,
    pub servings: u32,
}

/// An ingredient list scaled to a dish's saved serving count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaledIngredientsResponse {
    pub dish: String,
    pub servings: u32,
    pub original_servings: u32,
    pub ingredients: Vec<ScaledIngredient>,
}

/// One scaled ingredient with its recipe-card rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub amount: f64,
    pub display_amount: String,
    pub unit: String,
}

impl ScaledIngredient {
    pub fn new(ingredient: Ingredient) -> Self {
        Self {
            display_amount: crate::state::servings::format_amount(ingredient.amount),
            name: ingredient.name,
            amount: ingredient.amount,
            unit: ingredient.unit,
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
            version: "1.0.0".to_string(),
        }
    }
}
