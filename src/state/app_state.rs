//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, Notify};
use tracing::{debug, info, warn};

use crate::services::{JsonStore, PROGRESS_KEY, SERVINGS_KEY, TIMERS_KEY};

use super::{
    progress::{ProgressBook, ProgressState},
    registry::{InputField, TimerRegistry},
    servings::ServingsBook,
    timer_state::TimerState,
};

/// Events emitted by the timer engine
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// A countdown reached zero
    Finished { dish: String },
}

/// Main application state that owns the timer registry, cooking progress and
/// serving counts, plus the channels the background tasks hang off of.
#[derive(Debug)]
pub struct AppState {
    /// The countdown state machine for all dishes
    pub timers: Arc<Mutex<TimerRegistry>>,
    /// Cooking-step progress per dish
    pub progress: Arc<Mutex<ProgressBook>>,
    /// Saved serving counts per dish
    pub servings: Arc<Mutex<ServingsBook>>,
    /// Durable storage for all three registries
    pub store: JsonStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// One-shot finished flag for the UI modal; only the UI clears it
    finished_flag: Arc<Mutex<bool>>,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for engine events (timer completions)
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Keep one receiver alive to prevent channel closure
    _event_rx: broadcast::Receiver<TimerEvent>,
    /// Channel carrying the "any timer running" boolean
    pub running_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    _running_rx: watch::Receiver<bool>,
    /// Wakes the persistence task after a mutation
    pub dirty: Arc<Notify>,
}

impl AppState {
    /// Create the application state, restoring persisted registries.
    ///
    /// A timer persisted as running resumes counting immediately: the
    /// running watch channel is initialized from the restored registry.
    pub fn new(port: u16, host: String, store: JsonStore) -> Self {
        let timers = load_timers(&store);
        let progress = load_registry::<ProgressBook>(&store, PROGRESS_KEY);
        let servings = load_registry::<ServingsBook>(&store, SERVINGS_KEY);

        let (event_tx, event_rx) = broadcast::channel(100);
        let (running_tx, running_rx) = watch::channel(timers.any_running());

        Self {
            timers: Arc::new(Mutex::new(timers)),
            progress: Arc::new(Mutex::new(progress)),
            servings: Arc::new(Mutex::new(servings)),
            store,
            start_time: Instant::now(),
            port,
            host,
            finished_flag: Arc::new(Mutex::new(false)),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            _event_rx: event_rx,
            running_tx,
            _running_rx: running_rx,
            dirty: Arc::new(Notify::new()),
        }
    }

    /// Apply a mutation to the timer registry and propagate the fallout:
    /// record the action, refresh the running watch, and mark state dirty.
    pub fn update_timers<F, T>(&self, action: &str, updater: F) -> Result<T, String>
    where
        F: FnOnce(&mut TimerRegistry) -> T,
    {
        let mut timers = self
            .timers
            .lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))?;

        let result = updater(&mut timers);
        let any_running = timers.any_running();
        drop(timers); // Release the lock early

        self.record_action(action);
        self.running_tx.send_replace(any_running);
        self.mark_dirty();

        Ok(result)
    }

    /// Get a dish's timer state (always sanitized, never an error for an
    /// unknown dish)
    pub fn get_timer(&self, dish: &str) -> Result<TimerState, String> {
        self.timers
            .lock()
            .map(|timers| timers.get(dish))
            .map_err(|e| format!("Failed to lock timer registry: {}", e))
    }

    /// Start a countdown; returns whether it started plus the resulting state
    pub fn start_timer(
        &self,
        minutes: u64,
        seconds: u64,
        dish: &str,
    ) -> Result<(bool, TimerState), String> {
        info!("Starting timer for '{}': {}m {}s", dish, minutes, seconds);
        let started = self.update_timers("start", |t| t.start(minutes, seconds, dish))?;
        if !started {
            debug!("Ignoring zero-duration start for '{}'", dish);
        }
        Ok((started, self.get_timer(dish)?))
    }

    /// Pause a dish's countdown
    pub fn pause_timer(&self, dish: &str) -> Result<TimerState, String> {
        info!("Pausing timer for '{}'", dish);
        self.update_timers("pause", |t| t.pause(dish))?;
        self.get_timer(dish)
    }

    /// Discard a dish's timer entirely
    pub fn reset_timer(&self, dish: &str) -> Result<bool, String> {
        info!("Resetting timer for '{}'", dish);
        self.update_timers("reset", |t| t.reset(dish))
    }

    /// Remove every timer and erase the persisted blob immediately
    pub fn clear_all_timers(&self) -> Result<(), String> {
        info!("Clearing all timers");
        self.update_timers("clear-all", |t| t.clear())?;
        self.store.remove(TIMERS_KEY);
        self.clear_finished_flag()?;
        Ok(())
    }

    /// Fill a dish's inputs from a preset duration
    pub fn set_preset(&self, minutes: u64, dish: &str) -> Result<TimerState, String> {
        debug!("Preset {}min for '{}'", minutes, dish);
        self.update_timers("preset", |t| t.set_preset(minutes, dish))?;
        self.get_timer(dish)
    }

    /// Fill a dish's inputs from the recipe's recommended duration
    pub fn set_recommended(&self, minutes: u64, dish: &str) -> Result<TimerState, String> {
        debug!("Recommended {}min for '{}'", minutes, dish);
        self.update_timers("recommended", |t| t.set_preset(minutes, dish))?;
        self.get_timer(dish)
    }

    /// Store a raw duration input edit
    pub fn update_input(
        &self,
        field: InputField,
        value: &str,
        dish: &str,
    ) -> Result<TimerState, String> {
        self.update_timers("input", |t| t.update_input(field, value, dish))?;
        self.get_timer(dish)
    }

    /// Advance every running timer by one second and emit completion events.
    ///
    /// Returns the dishes that finished on this tick.
    pub fn tick_timers(&self) -> Result<Vec<String>, String> {
        let mut timers = self
            .timers
            .lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))?;

        let finished = timers.tick();
        let any_running = timers.any_running();
        drop(timers);

        self.running_tx.send_replace(any_running);
        self.mark_dirty();

        for dish in &finished {
            info!("Timer finished for '{}'", dish);
            self.raise_finished_flag()?;
            if let Err(e) = self.event_tx.send(TimerEvent::Finished { dish: dish.clone() }) {
                warn!("Failed to send timer finished event: {}", e);
            }
        }

        Ok(finished)
    }

    /// Whether at least one timer is running
    pub fn is_any_running(&self) -> Result<bool, String> {
        self.timers
            .lock()
            .map(|timers| timers.any_running())
            .map_err(|e| format!("Failed to lock timer registry: {}", e))
    }

    /// Name of a currently running dish, if any
    pub fn current_running_dish(&self) -> Result<Option<String>, String> {
        self.timers
            .lock()
            .map(|timers| timers.running_dish())
            .map_err(|e| format!("Failed to lock timer registry: {}", e))
    }

    /// Whether an unacknowledged timer completion is pending
    pub fn finished_flag(&self) -> Result<bool, String> {
        self.finished_flag
            .lock()
            .map(|flag| *flag)
            .map_err(|e| format!("Failed to lock finished flag: {}", e))
    }

    /// Acknowledge the completion modal (UI-driven)
    pub fn clear_finished_flag(&self) -> Result<(), String> {
        let mut flag = self
            .finished_flag
            .lock()
            .map_err(|e| format!("Failed to lock finished flag: {}", e))?;
        *flag = false;
        Ok(())
    }

    fn raise_finished_flag(&self) -> Result<(), String> {
        let mut flag = self
            .finished_flag
            .lock()
            .map_err(|e| format!("Failed to lock finished flag: {}", e))?;
        *flag = true;
        Ok(())
    }

    /// Get a dish's cooking progress
    pub fn get_progress(&self, dish: &str) -> Result<ProgressState, String> {
        self.progress
            .lock()
            .map(|book| book.get(dish))
            .map_err(|e| format!("Failed to lock progress book: {}", e))
    }

    /// Mark a cooking step complete
    pub fn complete_step(
        &self,
        dish: &str,
        step: u32,
        total_steps: u32,
    ) -> Result<ProgressState, String> {
        info!("Completing step {} of {} for '{}'", step, total_steps, dish);
        let state = self
            .progress
            .lock()
            .map(|mut book| book.complete_step(dish, step, total_steps))
            .map_err(|e| format!("Failed to lock progress book: {}", e))?;
        self.record_action("complete-step");
        self.mark_dirty();
        Ok(state)
    }

    /// Jump to a cooking step without completing anything
    pub fn select_step(&self, dish: &str, step: u32) -> Result<ProgressState, String> {
        let state = self
            .progress
            .lock()
            .map(|mut book| book.select_step(dish, step))
            .map_err(|e| format!("Failed to lock progress book: {}", e))?;
        self.record_action("select-step");
        self.mark_dirty();
        Ok(state)
    }

    /// Discard a dish's cooking progress
    pub fn reset_progress(&self, dish: &str) -> Result<bool, String> {
        info!("Resetting progress for '{}'", dish);
        let removed = self
            .progress
            .lock()
            .map(|mut book| book.reset(dish))
            .map_err(|e| format!("Failed to lock progress book: {}", e))?;
        self.record_action("reset-progress");
        self.mark_dirty();
        Ok(removed)
    }

    /// Saved servings for a dish, defaulting to the recipe's original count
    pub fn get_servings(&self, dish: &str, original_servings: u32) -> Result<u32, String> {
        self.servings
            .lock()
            .map(|book| book.get(dish, original_servings))
            .map_err(|e| format!("Failed to lock servings book: {}", e))
    }

    /// Save a serving count for a dish (clamped to at least one)
    pub fn set_servings(&self, dish: &str, servings: u32) -> Result<u32, String> {
        let saved = self
            .servings
            .lock()
            .map(|mut book| book.set(dish, servings))
            .map_err(|e| format!("Failed to lock servings book: {}", e))?;
        self.record_action("set-servings");
        self.mark_dirty();
        Ok(saved)
    }

    /// Forget a dish's saved serving count
    pub fn reset_servings(&self, dish: &str) -> Result<bool, String> {
        let removed = self
            .servings
            .lock()
            .map(|mut book| book.reset(dish))
            .map_err(|e| format!("Failed to lock servings book: {}", e))?;
        self.record_action("reset-servings");
        self.mark_dirty();
        Ok(removed)
    }

    /// Write every registry to storage, snapshotting current state at write
    /// time. Write failures are logged and swallowed: the in-memory state
    /// stays authoritative for this session.
    pub fn flush(&self) {
        match self.timers.lock() {
            Ok(timers) => {
                let snapshot = timers.export_stamped();
                drop(timers);
                match serde_json::to_string(&snapshot) {
                    Ok(blob) => {
                        if let Err(e) = self.store.set(TIMERS_KEY, &blob) {
                            warn!("Failed to persist timers: {}", e);
                        }
                    }
                    Err(e) => warn!("Failed to serialize timers: {}", e),
                }
            }
            Err(e) => warn!("Failed to lock timer registry for flush: {}", e),
        }

        self.flush_blob(PROGRESS_KEY, &self.progress);
        self.flush_blob(SERVINGS_KEY, &self.servings);
    }

    fn flush_blob<T: serde::Serialize>(&self, key: &str, shared: &Arc<Mutex<T>>) {
        match shared.lock() {
            Ok(value) => match serde_json::to_string(&*value) {
                Ok(blob) => {
                    if let Err(e) = self.store.set(key, &blob) {
                        warn!("Failed to persist '{}': {}", key, e);
                    }
                }
                Err(e) => warn!("Failed to serialize '{}': {}", key, e),
            },
            Err(e) => warn!("Failed to lock '{}' for flush: {}", key, e),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn mark_dirty(&self) {
        self.dirty.notify_one();
    }
}

/// Load the timer registry, discarding the whole blob on any corruption.
///
/// Corruption recovery is all-or-nothing at registry granularity: a single
/// invalid entry discards everything and erases the storage key. No partial
/// repair is attempted.
fn load_timers(store: &JsonStore) -> TimerRegistry {
    let Some(blob) = store.get(TIMERS_KEY) else {
        return TimerRegistry::new();
    };
    match serde_json::from_str::<TimerRegistry>(&blob) {
        Ok(mut registry) if registry.all_valid() => {
            registry.sanitize_all();
            info!("Restored {} persisted timer(s)", registry.len());
            registry
        }
        Ok(_) => {
            warn!("Corrupted timer data in storage, starting fresh");
            store.remove(TIMERS_KEY);
            TimerRegistry::new()
        }
        Err(e) => {
            warn!("Failed to parse persisted timers ({}), starting fresh", e);
            store.remove(TIMERS_KEY);
            TimerRegistry::new()
        }
    }
}

/// Load a supplemental registry blob with the same discard-on-corruption
/// policy as the timers
fn load_registry<T: serde::de::DeserializeOwned + Default>(store: &JsonStore, key: &str) -> T {
    let Some(blob) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&blob) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse persisted '{}' ({}), starting fresh", key, e);
            store.remove(key);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::sync::broadcast::error::TryRecvError;

    fn state_with_store(dir: &std::path::Path) -> AppState {
        let store = JsonStore::open(dir).unwrap();
        AppState::new(0, "127.0.0.1".to_string(), store)
    }

    #[test]
    fn flush_round_trips_all_registries() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());

        state.start_timer(10, 0, "adobo").unwrap();
        state.pause_timer("adobo").unwrap();
        state.complete_step("adobo", 1, 5).unwrap();
        state.set_servings("adobo", 6).unwrap();
        state.flush();

        let restored = state_with_store(dir.path());
        let timer = restored.get_timer("adobo").unwrap();
        assert_eq!(timer.remaining_seconds, 600);
        assert!(!timer.is_running);
        assert_eq!(restored.get_progress("adobo").unwrap().completed_steps, vec![1]);
        assert_eq!(restored.get_servings("adobo", 4).unwrap(), 6);
    }

    #[test]
    fn restored_running_timer_resumes() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());
        state.start_timer(0, 30, "adobo").unwrap();
        state.flush();

        let restored = state_with_store(dir.path());
        assert!(restored.is_any_running().unwrap());
        assert!(*restored.running_tx.subscribe().borrow());
    }

    #[test]
    fn corrupt_timer_blob_is_discarded_and_erased() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store
            .set(
                TIMERS_KEY,
                r#"{"adobo":{"remainingSeconds":"abc","isRunning":true,"inputMinutes":"1","inputSeconds":"0","lastUpdated":0}}"#,
            )
            .unwrap();

        let state = AppState::new(0, "127.0.0.1".to_string(), store.clone());
        let timer = state.get_timer("adobo").unwrap();
        assert_eq!(timer.remaining_seconds, 0);
        assert!(!timer.is_running);
        assert_eq!(store.get(TIMERS_KEY), None);
    }

    #[test]
    fn invalid_entry_discards_the_whole_blob() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        // One fine entry plus one with an empty input field: all-or-nothing
        store
            .set(
                TIMERS_KEY,
                concat!(
                    r#"{"adobo":{"remainingSeconds":60,"isRunning":false,"inputMinutes":"1","inputSeconds":"0","lastUpdated":0},"#,
                    r#""sinigang":{"remainingSeconds":5,"isRunning":false,"inputMinutes":"","inputSeconds":"0","lastUpdated":0}}"#
                ),
            )
            .unwrap();

        let state = AppState::new(0, "127.0.0.1".to_string(), store.clone());
        assert_eq!(state.get_timer("adobo").unwrap().remaining_seconds, 0);
        assert_eq!(store.get(TIMERS_KEY), None);
    }

    #[test]
    fn clear_all_erases_the_persisted_key() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());
        state.start_timer(1, 0, "adobo").unwrap();
        state.flush();
        assert!(state.store.get(TIMERS_KEY).is_some());

        state.clear_all_timers().unwrap();
        assert_eq!(state.store.get(TIMERS_KEY), None);
        assert!(!state.is_any_running().unwrap());
        assert_eq!(state.get_timer("adobo").unwrap().remaining_seconds, 0);
    }

    #[test]
    fn tick_emits_finished_event_and_raises_flag() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());
        let mut events = state.event_tx.subscribe();

        state.start_timer(0, 1, "adobo").unwrap();
        assert!(!state.finished_flag().unwrap());

        let finished = state.tick_timers().unwrap();
        assert_eq!(finished, vec!["adobo".to_string()]);
        assert!(state.finished_flag().unwrap());

        match events.try_recv() {
            Ok(TimerEvent::Finished { dish }) => assert_eq!(dish, "adobo"),
            other => panic!("Expected finished event, got {:?}", other),
        }
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        // Only the UI clears the flag
        state.clear_finished_flag().unwrap();
        assert!(!state.finished_flag().unwrap());
    }

    #[test]
    fn running_watch_tracks_mutations() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());
        let rx = state.running_tx.subscribe();

        assert!(!*rx.borrow());
        state.start_timer(0, 5, "adobo").unwrap();
        assert!(*rx.borrow());
        state.pause_timer("adobo").unwrap();
        assert!(!*rx.borrow());
    }

    #[test]
    fn last_action_is_recorded() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());
        assert_eq!(state.get_last_action().0, None);

        state.start_timer(0, 5, "adobo").unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }

    #[test]
    fn zero_duration_start_is_silent() {
        let dir = tempdir().unwrap();
        let state = state_with_store(dir.path());
        let (started, timer) = state.start_timer(0, 0, "adobo").unwrap();
        assert!(!started);
        assert_eq!(timer.remaining_seconds, 0);
        assert!(!timer.is_running);
    }
}
