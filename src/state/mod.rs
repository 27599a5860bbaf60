//! State management module
//!
//! This module contains the timer state machine, the supplemental cooking
//! registries, and the shared application state that owns them.

pub mod app_state;
pub mod progress;
pub mod registry;
pub mod servings;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerEvent};
pub use progress::{ProgressBook, ProgressState};
pub use registry::{InputField, TimerRegistry};
pub use servings::{Ingredient, ServingsBook};
pub use timer_state::{format_time, TimerState};
