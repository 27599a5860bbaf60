//! Screen wake-lock collaborator

use anyhow::Result;
use tracing::info;

/// Wake-lock surface held while any timer is counting down.
///
/// The timer engine only reports the running boolean; the screen-wake task
/// translates it into acquire/release calls here, and releases on teardown.
pub trait WakeLock: Send + Sync {
    fn acquire(&self) -> Result<()>;
    fn release(&self) -> Result<()>;
}

/// Log-only wake lock for headless deployments and tests
#[derive(Debug, Default)]
pub struct LogWakeLock;

impl WakeLock for LogWakeLock {
    fn acquire(&self) -> Result<()> {
        info!("Screen wake lock acquired");
        Ok(())
    }

    fn release(&self) -> Result<()> {
        info!("Screen wake lock released");
        Ok(())
    }
}
