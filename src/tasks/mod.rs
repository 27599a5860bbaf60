//! Background tasks module
//!
//! This module contains the background tasks that run alongside the HTTP
//! server: the one-second countdown tick, debounced persistence, completion
//! alerts, and the screen wake-lock holder.

pub mod completion;
pub mod countdown;
pub mod persistence;
pub mod screen_wake;

// Re-export main functions
pub use completion::completion_alert_task;
pub use countdown::countdown_task;
pub use persistence::persistence_task;
pub use screen_wake::screen_wake_task;
