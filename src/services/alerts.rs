//! Completion alert collaborator (notifications and haptics)

use anyhow::Result;
use tracing::{debug, info};

/// Vibration pattern fired when a timer finishes: pulse, gap, pulse (ms)
pub const FINISH_VIBRATION_PATTERN: [u64; 3] = [200, 100, 200];

/// Platform alert surface invoked when a timer finishes.
///
/// Permission handling is a setup concern: implementations report whether
/// notification permission was already granted, and `notify` is only called
/// when it was. Nothing here ever requests permission.
pub trait CompletionAlerts: Send + Sync {
    /// Whether notification permission has already been granted
    fn permission_granted(&self) -> bool;

    /// Post a system notification
    fn notify(&self, title: &str, body: &str) -> Result<()>;

    /// Fire a haptic pulse pattern (alternating vibrate/pause durations in ms)
    fn vibrate(&self, pattern: &[u64]) -> Result<()>;
}

/// Log-only alerts for headless deployments and tests. A desktop or mobile
/// shell swaps in its own implementation.
#[derive(Debug, Default)]
pub struct LogAlerts;

impl CompletionAlerts for LogAlerts {
    fn permission_granted(&self) -> bool {
        true
    }

    fn notify(&self, title: &str, body: &str) -> Result<()> {
        info!("Notification: {} - {}", title, body);
        Ok(())
    }

    fn vibrate(&self, pattern: &[u64]) -> Result<()> {
        debug!("Vibration pattern requested: {:?}", pattern);
        Ok(())
    }
}
