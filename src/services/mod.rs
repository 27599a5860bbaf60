//! Platform collaborator seams
//!
//! This module wraps everything outside the timer engine itself: durable
//! storage, completion alerts, and the screen wake lock.

pub mod alerts;
pub mod storage;
pub mod wake;

// Re-export main types
pub use alerts::{CompletionAlerts, LogAlerts, FINISH_VIBRATION_PATTERN};
pub use storage::{JsonStore, PROGRESS_KEY, SERVINGS_KEY, TIMERS_KEY};
pub use wake::{LogWakeLock, WakeLock};
