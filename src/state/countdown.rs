//! Countdown state structure and lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::SleepDuration;

/// Lifecycle phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Cancelled,
    Expired,
}

/// A snapshot of the countdown, published once per second while running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownState {
    pub phase: Phase,
    /// The committed countdown length
    pub duration: SleepDuration,
    /// Whole seconds until the sleep request fires
    pub remaining_seconds: u64,
    /// When the countdown was armed; informational only
    pub armed_at: Option<DateTime<Utc>>,
    /// Sleep failures recorded for observer visibility
    pub errors: Vec<String>,
}

impl CountdownState {
    /// The idle state: default duration, nothing remaining, no history.
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            duration: SleepDuration::default(),
            remaining_seconds: 0,
            armed_at: None,
            errors: Vec::new(),
        }
    }

    /// A freshly armed countdown for the given duration.
    pub fn armed(duration: SleepDuration) -> Self {
        Self {
            phase: Phase::Running,
            duration,
            remaining_seconds: duration.total_seconds(),
            armed_at: Some(Utc::now()),
            errors: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Record a sleep failure for observer visibility.
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Remaining time rendered as zero-padded `HH:MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        let hours = self.remaining_seconds / 3600;
        let minutes = (self.remaining_seconds % 3600) / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_state_has_default_fields() {
        let state = CountdownState::idle();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.duration, SleepDuration::default());
        assert_eq!(state.remaining_seconds, 0);
        assert!(state.armed_at.is_none());
        assert!(state.errors.is_empty());
    }

    #[test]
    fn armed_state_counts_from_total() {
        let state = CountdownState::armed(SleepDuration::new(0, 2, 5));
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.remaining_seconds, 125);
        assert!(state.armed_at.is_some());
    }

    #[test]
    fn formats_remaining_as_hh_mm_ss() {
        let cases = [
            (0, "00:00:00"),
            (5, "00:00:05"),
            (61, "00:01:01"),
            (3600, "01:00:00"),
            (86399, "23:59:59"),
        ];

        for (remaining_seconds, expected) in cases {
            let state = CountdownState {
                remaining_seconds,
                ..CountdownState::idle()
            };
            assert_eq!(state.formatted_remaining(), expected);
        }
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Running).unwrap(), "\"running\"");
        assert_eq!(serde_json::to_string(&Phase::Expired).unwrap(), "\"expired\"");
    }
}
