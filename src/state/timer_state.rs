//! Per-dish timer state structure and field handling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countdown state for a single dish timer.
///
/// The input fields are kept as raw text so the UI can represent an
/// empty-editing state; they are normalized to "0" before any arithmetic.
/// `last_updated` is stamped when the registry is persisted and is advisory
/// only (no drift correction on restore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub is_running: bool,
    pub input_minutes: String,
    pub input_seconds: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

impl TimerState {
    /// Create an idle timer state (nothing armed, nothing running)
    pub fn idle() -> Self {
        Self {
            remaining_seconds: 0,
            is_running: false,
            input_minutes: "0".to_string(),
            input_seconds: "0".to_string(),
            last_updated: Utc::now(),
        }
    }

    /// Create a running timer state from an explicit duration
    pub fn running(minutes: u64, seconds: u64) -> Self {
        Self {
            remaining_seconds: minutes * 60 + seconds,
            is_running: true,
            input_minutes: minutes.to_string(),
            input_seconds: seconds.to_string(),
            last_updated: Utc::now(),
        }
    }

    /// Total duration currently entered in the input fields, in seconds
    pub fn input_total_seconds(&self) -> u64 {
        parse_duration_field(&self.input_minutes) * 60 + parse_duration_field(&self.input_seconds)
    }

    /// Coerce invalid fields back to safe defaults.
    ///
    /// Reads must never hand out an empty input string even if the state was
    /// tampered with after load, so every read path goes through this.
    pub fn sanitize(mut self) -> Self {
        if self.input_minutes.trim().is_empty() {
            self.input_minutes = "0".to_string();
        }
        if self.input_seconds.trim().is_empty() {
            self.input_seconds = "0".to_string();
        }
        self
    }

    /// Check whether a persisted entry is structurally valid.
    ///
    /// Empty input strings mark the whole persisted blob as corrupt; a
    /// non-numeric or negative `remainingSeconds` already fails
    /// deserialization before this runs.
    pub fn is_valid(&self) -> bool {
        !self.input_minutes.is_empty() && !self.input_seconds.is_empty()
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Parse a raw duration input field, coercing anything non-numeric to 0
pub fn parse_duration_field(value: &str) -> u64 {
    value.trim().parse().unwrap_or(0)
}

/// Format a second count as zero-padded "MM:SS" (minutes unbounded)
pub fn format_time(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_both_fields() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(600), "10:00");
    }

    #[test]
    fn format_time_does_not_wrap_minutes() {
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(6001), "100:01");
    }

    #[test]
    fn parse_duration_field_coerces_garbage_to_zero() {
        assert_eq!(parse_duration_field("15"), 15);
        assert_eq!(parse_duration_field(" 7 "), 7);
        assert_eq!(parse_duration_field(""), 0);
        assert_eq!(parse_duration_field("abc"), 0);
        assert_eq!(parse_duration_field("-3"), 0);
    }

    #[test]
    fn sanitize_restores_blank_inputs() {
        let mut state = TimerState::idle();
        state.input_minutes = "".to_string();
        state.input_seconds = "  ".to_string();
        let state = state.sanitize();
        assert_eq!(state.input_minutes, "0");
        assert_eq!(state.input_seconds, "0");
    }

    #[test]
    fn input_total_handles_raw_text() {
        let mut state = TimerState::idle();
        state.input_minutes = "2".to_string();
        state.input_seconds = "30".to_string();
        assert_eq!(state.input_total_seconds(), 150);

        state.input_seconds = "oops".to_string();
        assert_eq!(state.input_total_seconds(), 120);
    }

    #[test]
    fn persisted_layout_is_camel_case_with_millis() {
        let state = TimerState::running(1, 30);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["remainingSeconds"], 90);
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["inputMinutes"], "1");
        assert!(json["lastUpdated"].is_i64());
    }
}
