//! Debounced persistence background task

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that writes dirty state to storage after a quiet window.
///
/// Bursts of mutations (a user typing digits) coalesce into one write: the
/// task sleeps out the debounce after the first dirty mark, then snapshots
/// whatever the registries hold at that moment. State is never captured at
/// schedule time, so the write always observes the latest mutation.
///
/// The final flush on shutdown happens in `main`, after the server stops,
/// so a pending debounce can never lose the last edits.
pub async fn persistence_task(state: Arc<AppState>, debounce: Duration) {
    info!("Starting persistence task (debounce {:?})", debounce);

    loop {
        state.dirty.notified().await;
        sleep(debounce).await;
        debug!("Debounce elapsed, flushing state to storage");
        state.flush();
    }
}
