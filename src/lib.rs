//! Recipe Timer - a state-managed HTTP service for cooking assistance
//!
//! This library owns a registry of named countdown timers (one per dish),
//! persists it to local JSON storage with debounced writes, restores it on
//! startup, and signals completions to platform collaborators. It also
//! tracks cooking-step progress and serving-count scaling per dish.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::shutdown_signal;
