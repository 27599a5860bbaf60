//! Countdown tick background task

use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that advances running timers once per second.
///
/// The tick interval only exists while at least one timer is running; it is
/// dropped when the running set empties and re-armed on the next start, so a
/// torn-down view never leaves an orphaned tick behind.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut running_rx = state.running_tx.subscribe();

    loop {
        // Park until some timer is running
        while !*running_rx.borrow_and_update() {
            if running_rx.changed().await.is_err() {
                debug!("Running-state channel closed, stopping countdown task");
                return;
            }
        }

        debug!("Timer running, arming one-second tick");
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first interval tick completes immediately; swallow it so the
        // first decrement lands a full second after arming
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick_timers() {
                        Ok(finished) => {
                            for dish in &finished {
                                debug!("Tick finished countdown for '{}'", dish);
                            }
                        }
                        Err(e) => {
                            error!("Tick failed: {}", e);
                            break;
                        }
                    }

                    match state.is_any_running() {
                        Ok(true) => {}
                        Ok(false) => {
                            debug!("No timers running, disarming tick");
                            break;
                        }
                        Err(e) => {
                            error!("Failed to check running timers: {}", e);
                            break;
                        }
                    }
                }

                // A mutation changed the running set; disarm if it emptied
                changed = running_rx.changed() => {
                    if changed.is_err() {
                        debug!("Running-state channel closed, stopping countdown task");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("All timers paused or reset, disarming tick");
                        break;
                    }
                }
            }
        }
    }
}
