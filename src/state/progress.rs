//! Cooking-step progress tracking per dish

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress through a recipe's step list.
///
/// Steps are 1-based; `completed_steps` keeps completion order, which the UI
/// uses to strike steps through as they are done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub completed_steps: Vec<u32>,
    pub current_step: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

impl ProgressState {
    /// Fresh progress: nothing done, standing on step 1
    pub fn new() -> Self {
        Self {
            completed_steps: Vec::new(),
            current_step: 1,
            last_updated: Utc::now(),
        }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-dish progress records, persisted as the `cookingProgress` blob
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressBook {
    entries: HashMap<String, ProgressState>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get a dish's progress; unknown dishes read as fresh progress
    pub fn get(&self, dish: &str) -> ProgressState {
        self.entries.get(dish).cloned().unwrap_or_default()
    }

    /// Mark a step complete and advance to the next one.
    ///
    /// Completing an already-completed step does not duplicate it; the
    /// current step never advances past `total_steps`.
    pub fn complete_step(&mut self, dish: &str, step: u32, total_steps: u32) -> ProgressState {
        let entry = self.entries.entry(dish.to_string()).or_default();
        if !entry.completed_steps.contains(&step) {
            entry.completed_steps.push(step);
        }
        entry.current_step = (entry.current_step + 1).min(total_steps.max(1));
        entry.last_updated = Utc::now();
        entry.clone()
    }

    /// Jump to a specific step without completing anything
    pub fn select_step(&mut self, dish: &str, step: u32) -> ProgressState {
        let entry = self.entries.entry(dish.to_string()).or_default();
        entry.current_step = step.max(1);
        entry.last_updated = Utc::now();
        entry.clone()
    }

    /// Discard a dish's progress; returns whether an entry existed
    pub fn reset(&mut self, dish: &str) -> bool {
        self.entries.remove(dish).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_dish_starts_fresh() {
        let book = ProgressBook::new();
        let state = book.get("adobo");
        assert!(state.completed_steps.is_empty());
        assert_eq!(state.current_step, 1);
    }

    #[test]
    fn completing_a_step_advances() {
        let mut book = ProgressBook::new();
        let state = book.complete_step("adobo", 1, 5);
        assert_eq!(state.completed_steps, vec![1]);
        assert_eq!(state.current_step, 2);
    }

    #[test]
    fn completing_twice_does_not_duplicate() {
        let mut book = ProgressBook::new();
        book.complete_step("adobo", 1, 5);
        let state = book.complete_step("adobo", 1, 5);
        assert_eq!(state.completed_steps, vec![1]);
        // The pointer still moves, matching a user re-tapping complete
        assert_eq!(state.current_step, 3);
    }

    #[test]
    fn current_step_is_capped_at_total() {
        let mut book = ProgressBook::new();
        book.complete_step("adobo", 1, 2);
        let state = book.complete_step("adobo", 2, 2);
        assert_eq!(state.current_step, 2);
    }

    #[test]
    fn select_jumps_without_completing() {
        let mut book = ProgressBook::new();
        let state = book.select_step("adobo", 4);
        assert_eq!(state.current_step, 4);
        assert!(state.completed_steps.is_empty());

        // Step numbering is 1-based, zero is clamped up
        assert_eq!(book.select_step("adobo", 0).current_step, 1);
    }

    #[test]
    fn reset_removes_the_record() {
        let mut book = ProgressBook::new();
        book.complete_step("adobo", 1, 5);
        assert!(book.reset("adobo"));
        assert!(!book.reset("adobo"));
        assert_eq!(book.get("adobo").current_step, 1);
    }

    #[test]
    fn serde_round_trip() {
        let mut book = ProgressBook::new();
        book.complete_step("adobo", 1, 5);
        book.complete_step("adobo", 2, 5);

        let blob = serde_json::to_string(&book).unwrap();
        let restored: ProgressBook = serde_json::from_str(&blob).unwrap();
        let state = restored.get("adobo");
        assert_eq!(state.completed_steps, vec![1, 2]);
        assert_eq!(state.current_step, 3);
    }
}
