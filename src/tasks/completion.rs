//! Completion alert background task

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    services::{CompletionAlerts, FINISH_VIBRATION_PATTERN},
    state::{AppState, TimerEvent},
};

/// Background task that turns finished-timer events into platform alerts.
///
/// The haptic pulse always fires; the notification only goes out when
/// permission was granted ahead of time. Requesting permission is a setup
/// concern and never happens here.
pub async fn completion_alert_task(state: Arc<AppState>, alerts: Arc<dyn CompletionAlerts>) {
    info!("Starting completion alert task");

    let mut events = state.event_tx.subscribe();

    loop {
        match events.recv().await {
            Ok(TimerEvent::Finished { dish }) => {
                if let Err(e) = alerts.vibrate(&FINISH_VIBRATION_PATTERN) {
                    warn!("Haptic feedback failed: {}", e);
                }

                if alerts.permission_granted() {
                    let body = format!("{} timer is complete!", dish);
                    if let Err(e) = alerts.notify("Timer Finished!", &body) {
                        warn!("Failed to post finish notification: {}", e);
                    }
                }
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Completion alerts lagged, {} event(s) dropped", missed);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping completion alert task");
                break;
            }
        }
    }
}
