//! Screen wake-lock background task

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{services::WakeLock, state::AppState};

/// Background task that holds the screen wake lock while any timer runs.
///
/// The engine only reports the running boolean; this task owns the lock
/// lifecycle and always releases on the way out.
pub async fn screen_wake_task(state: Arc<AppState>, wake: Arc<dyn WakeLock>) {
    info!("Starting screen wake task");

    let mut running_rx = state.running_tx.subscribe();
    let mut held = false;

    loop {
        let running = *running_rx.borrow_and_update();

        if running && !held {
            match wake.acquire() {
                Ok(()) => held = true,
                Err(e) => debug!("Wake lock not available: {}", e),
            }
        } else if !running && held {
            if let Err(e) = wake.release() {
                warn!("Failed to release wake lock: {}", e);
            }
            held = false;
        }

        if running_rx.changed().await.is_err() {
            break;
        }
    }

    // Teardown must not leave the screen pinned awake
    if held {
        if let Err(e) = wake.release() {
            warn!("Failed to release wake lock on shutdown: {}", e);
        }
    }
}
