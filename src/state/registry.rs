//! Timer registry - the per-dish countdown state machine

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::timer_state::TimerState;

/// Which duration input field an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputField {
    Minutes,
    Seconds,
}

/// Registry of all dish timers, keyed by dish name.
///
/// Entries are created lazily on first write, removed entirely on reset, and
/// serialized as a flat dish -> state map (the persisted `recipeTimers` blob).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerRegistry {
    timers: HashMap<String, TimerState>,
}

impl TimerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }

    /// Get a sanitized copy of a dish's timer state.
    ///
    /// An unknown dish yields the idle default rather than an error.
    pub fn get(&self, dish: &str) -> TimerState {
        self.timers
            .get(dish)
            .cloned()
            .unwrap_or_default()
            .sanitize()
    }

    /// Start a countdown for a dish.
    ///
    /// A zero total duration is a silent no-op; returns whether the timer
    /// actually started. Starting replaces any previous entry for the dish.
    pub fn start(&mut self, minutes: u64, seconds: u64, dish: &str) -> bool {
        if minutes * 60 + seconds == 0 {
            return false;
        }
        self.timers
            .insert(dish.to_string(), TimerState::running(minutes, seconds));
        true
    }

    /// Pause a dish's countdown, keeping the remaining time.
    ///
    /// Pausing a dish with no entry is a no-op (nothing to pause).
    pub fn pause(&mut self, dish: &str) {
        if let Some(timer) = self.timers.get_mut(dish) {
            timer.is_running = false;
        }
    }

    /// Discard a dish's timer entirely; returns whether an entry existed
    pub fn reset(&mut self, dish: &str) -> bool {
        self.timers.remove(dish).is_some()
    }

    /// Remove every timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Fill the input fields from a preset duration (whole minutes).
    ///
    /// Only the inputs change; a countdown already in flight is untouched.
    pub fn set_preset(&mut self, minutes: u64, dish: &str) {
        let timer = self.timers.entry(dish.to_string()).or_default();
        timer.input_minutes = minutes.to_string();
        timer.input_seconds = "0".to_string();
    }

    /// Store a raw duration input edit without validation.
    ///
    /// Bad text is coerced at parse time, not here, so the UI can round-trip
    /// whatever the user is mid-typing.
    pub fn update_input(&mut self, field: InputField, value: &str, dish: &str) {
        let timer = self.timers.entry(dish.to_string()).or_default();
        match field {
            InputField::Minutes => timer.input_minutes = value.to_string(),
            InputField::Seconds => timer.input_seconds = value.to_string(),
        }
    }

    /// Advance every running timer by one second.
    ///
    /// Timers that reach zero stop and are reported back exactly once; all
    /// decrements for one tick land together.
    pub fn tick(&mut self) -> Vec<String> {
        let mut finished = Vec::new();
        for (dish, timer) in self.timers.iter_mut() {
            if !timer.is_running || timer.remaining_seconds == 0 {
                continue;
            }
            if timer.remaining_seconds <= 1 {
                timer.remaining_seconds = 0;
                timer.is_running = false;
                finished.push(dish.clone());
            } else {
                timer.remaining_seconds -= 1;
            }
        }
        finished
    }

    /// Whether at least one timer is running
    pub fn any_running(&self) -> bool {
        self.timers.values().any(|t| t.is_running)
    }

    /// Name of a currently running dish, if any
    pub fn running_dish(&self) -> Option<String> {
        self.timers
            .iter()
            .find(|(_, t)| t.is_running)
            .map(|(dish, _)| dish.clone())
    }

    /// Number of tracked timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether the registry has no timers at all
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Check every entry for structural validity (used once at load)
    pub fn all_valid(&self) -> bool {
        self.timers.values().all(|t| t.is_valid())
    }

    /// Normalize every entry's input fields after a successful load
    pub fn sanitize_all(&mut self) {
        for timer in self.timers.values_mut() {
            let clean = timer.clone().sanitize();
            *timer = clean;
        }
    }

    /// Snapshot for persistence, with `last_updated` stamped at write time
    pub fn export_stamped(&self) -> HashMap<String, TimerState> {
        let now = Utc::now();
        self.timers
            .iter()
            .map(|(dish, timer)| {
                let mut stamped = timer.clone();
                stamped.last_updated = now;
                (dish.clone(), stamped)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_sets_remaining_and_running() {
        let mut registry = TimerRegistry::new();
        assert!(registry.start(2, 5, "adobo"));

        let state = registry.get("adobo");
        assert_eq!(state.remaining_seconds, 125);
        assert!(state.is_running);
        assert_eq!(state.input_minutes, "2");
        assert_eq!(state.input_seconds, "5");
    }

    #[test]
    fn start_with_zero_total_is_a_noop() {
        let mut registry = TimerRegistry::new();
        assert!(!registry.start(0, 0, "adobo"));
        assert!(registry.is_empty());

        let state = registry.get("adobo");
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn unknown_dish_reads_as_idle() {
        let registry = TimerRegistry::new();
        let state = registry.get("sinigang");
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);
        assert_eq!(state.input_minutes, "0");
    }

    #[test]
    fn tick_decrements_each_running_timer_by_one() {
        let mut registry = TimerRegistry::new();
        registry.start(0, 10, "adobo");
        registry.start(0, 5, "sinigang");

        let finished = registry.tick();
        assert!(finished.is_empty());
        assert_eq!(registry.get("adobo").remaining_seconds, 9);
        assert_eq!(registry.get("sinigang").remaining_seconds, 4);
    }

    #[test]
    fn tick_reports_finish_exactly_once() {
        let mut registry = TimerRegistry::new();
        registry.start(0, 3, "adobo");

        assert!(registry.tick().is_empty());
        assert!(registry.tick().is_empty());
        assert_eq!(registry.tick(), vec!["adobo".to_string()]);

        let state = registry.get("adobo");
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);

        // Further ticks never re-report a finished timer
        assert!(registry.tick().is_empty());
    }

    #[test]
    fn pause_keeps_remaining_time() {
        let mut registry = TimerRegistry::new();
        registry.start(1, 0, "adobo");
        registry.tick();
        registry.pause("adobo");

        let state = registry.get("adobo");
        assert!(!state.is_running);
        assert_eq!(state.remaining_seconds, 59);

        // Paused timers are skipped by the tick
        registry.tick();
        assert_eq!(registry.get("adobo").remaining_seconds, 59);
    }

    #[test]
    fn pause_on_missing_dish_creates_nothing() {
        let mut registry = TimerRegistry::new();
        registry.pause("ghost");
        assert!(registry.is_empty());
    }

    #[test]
    fn reset_discards_the_entry() {
        let mut registry = TimerRegistry::new();
        registry.start(5, 0, "adobo");
        assert!(registry.reset("adobo"));
        assert!(!registry.reset("adobo"));

        let state = registry.get("adobo");
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn preset_only_touches_inputs() {
        let mut registry = TimerRegistry::new();
        registry.start(0, 30, "adobo");
        registry.set_preset(10, "adobo");

        let state = registry.get("adobo");
        assert_eq!(state.input_minutes, "10");
        assert_eq!(state.input_seconds, "0");
        assert_eq!(state.remaining_seconds, 30);
        assert!(state.is_running);
    }

    #[test]
    fn update_input_stores_raw_text() {
        let mut registry = TimerRegistry::new();
        registry.update_input(InputField::Minutes, "1x", "adobo");
        registry.update_input(InputField::Seconds, "", "adobo");

        // Reads sanitize the blank field, parsing coerces the junk one
        let state = registry.get("adobo");
        assert_eq!(state.input_minutes, "1x");
        assert_eq!(state.input_seconds, "0");
        assert_eq!(state.input_total_seconds(), 0);
    }

    #[test]
    fn update_input_never_touches_a_running_countdown() {
        let mut registry = TimerRegistry::new();
        registry.start(0, 45, "adobo");
        registry.update_input(InputField::Minutes, "99", "adobo");
        assert_eq!(registry.get("adobo").remaining_seconds, 45);
        assert!(registry.get("adobo").is_running);
    }

    #[test]
    fn running_queries_track_state() {
        let mut registry = TimerRegistry::new();
        assert!(!registry.any_running());
        assert_eq!(registry.running_dish(), None);

        registry.start(1, 0, "adobo");
        assert!(registry.any_running());
        assert_eq!(registry.running_dish(), Some("adobo".to_string()));

        registry.pause("adobo");
        assert!(!registry.any_running());
    }

    #[test]
    fn clear_empties_everything() {
        let mut registry = TimerRegistry::new();
        registry.start(1, 0, "adobo");
        registry.set_preset(5, "sinigang");
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.any_running());
    }

    #[test]
    fn serde_round_trip_preserves_states() {
        let mut registry = TimerRegistry::new();
        registry.start(10, 0, "adobo");
        registry.set_preset(25, "lechon");
        registry.pause("adobo");

        let blob = serde_json::to_string(&registry).unwrap();
        let restored: TimerRegistry = serde_json::from_str(&blob).unwrap();

        for dish in ["adobo", "lechon"] {
            let before = registry.get(dish);
            let after = restored.get(dish);
            assert_eq!(before.remaining_seconds, after.remaining_seconds);
            assert_eq!(before.is_running, after.is_running);
            assert_eq!(before.input_minutes, after.input_minutes);
            assert_eq!(before.input_seconds, after.input_seconds);
        }
    }

    #[test]
    fn corrupt_blob_fails_to_parse() {
        let blob = r#"{"adobo":{"remainingSeconds":"abc","isRunning":false,"inputMinutes":"1","inputSeconds":"0","lastUpdated":0}}"#;
        assert!(serde_json::from_str::<TimerRegistry>(blob).is_err());

        let negative = r#"{"adobo":{"remainingSeconds":-5,"isRunning":false,"inputMinutes":"1","inputSeconds":"0","lastUpdated":0}}"#;
        assert!(serde_json::from_str::<TimerRegistry>(negative).is_err());
    }

    #[test]
    fn empty_input_entry_fails_validation() {
        let blob = r#"{"adobo":{"remainingSeconds":5,"isRunning":false,"inputMinutes":"","inputSeconds":"0","lastUpdated":0}}"#;
        let registry: TimerRegistry = serde_json::from_str(blob).unwrap();
        assert!(!registry.all_valid());
    }

    #[test]
    fn preset_then_full_countdown_scenario() {
        let mut registry = TimerRegistry::new();
        registry.set_preset(10, "adobo");
        assert_eq!(registry.get("adobo").input_total_seconds(), 600);

        registry.start(10, 0, "adobo");

        let mut finishes = 0;
        for _ in 0..600 {
            finishes += registry.tick().len();
        }

        let state = registry.get("adobo");
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);
        assert_eq!(finishes, 1);
    }

    #[test]
    fn export_stamped_refreshes_timestamps_without_mutating() {
        let mut registry = TimerRegistry::new();
        registry.start(1, 0, "adobo");
        let original_stamp = registry.get("adobo").last_updated;

        let snapshot = registry.export_stamped();
        assert!(snapshot["adobo"].last_updated >= original_stamp);
        assert_eq!(snapshot["adobo"].remaining_seconds, 60);
        assert_eq!(registry.get("adobo").last_updated, original_stamp);
    }
}
