//! Duration resolution from user input
//!
//! A countdown length can arrive two ways: as three already-bounded integers
//! (the structured flags) or as three raw strings (free-text entry). The
//! resolver normalizes either into a [`SleepDuration`], rejecting free-text
//! input that does not parse or that falls outside the structured ranges.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

/// A committed countdown length in hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepDuration {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl SleepDuration {
    /// Create a duration from pre-bounded components.
    pub const fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Total countdown length in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }

    pub fn as_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.total_seconds())
    }
}

impl Default for SleepDuration {
    /// The initial selection: 0 hours, 0 minutes, 1 second.
    fn default() -> Self {
        Self::new(0, 0, 1)
    }
}

impl std::fmt::Display for SleepDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} hours, {} minutes, {} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Which input surface produced the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Structured,
    FreeText,
}

/// Raw duration input, tagged with the surface it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationInput {
    Structured {
        hours: u32,
        minutes: u32,
        seconds: u32,
    },
    FreeText {
        hours: String,
        minutes: String,
        seconds: String,
    },
}

impl DurationInput {
    pub fn mode(&self) -> InputMode {
        match self {
            DurationInput::Structured { .. } => InputMode::Structured,
            DurationInput::FreeText { .. } => InputMode::FreeText,
        }
    }
}

/// Errors produced when free-text input cannot be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A free-text field is not a non-negative integer
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    /// A free-text field exceeds the range the pickers allow
    #[error("{field} must be at most {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Resolve raw input into a [`SleepDuration`].
///
/// Structured input is already bounded by the CLI value parsers and always
/// succeeds. Free-text fields must each parse as a non-negative integer and
/// are held to the same ranges as the structured surface (hours 0-23,
/// minutes and seconds 0-59); a failure leaves the caller's prior duration
/// untouched.
pub fn resolve(input: &DurationInput) -> Result<SleepDuration, ValidationError> {
    match input {
        DurationInput::Structured {
            hours,
            minutes,
            seconds,
        } => Ok(SleepDuration::new(*hours, *minutes, *seconds)),
        DurationInput::FreeText {
            hours,
            minutes,
            seconds,
        } => {
            let hours = parse_field("hours", hours, MAX_HOURS)?;
            let minutes = parse_field("minutes", minutes, MAX_MINUTES)?;
            let seconds = parse_field("seconds", seconds, MAX_SECONDS)?;
            Ok(SleepDuration::new(hours, minutes, seconds))
        }
    }
}

fn parse_field(field: &'static str, raw: &str, max: u32) -> Result<u32, ValidationError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })?;

    if value > max {
        return Err(ValidationError::OutOfRange { field, value, max });
    }

    Ok(value)
}
