//! Configuration and CLI argument handling

use clap::Parser;

use crate::duration::{DurationInput, MAX_HOURS, MAX_MINUTES, MAX_SECONDS};

/// CLI argument parsing structure
///
/// Two duration surfaces mirror the two entry modes: the structured flags
/// are bounded up front, while `--input` passes three raw fields through to
/// the resolver for validation.
#[derive(Debug, Parser)]
#[command(name = "doze")]
#[command(about = "A countdown timer that puts the machine to sleep when it runs out")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Countdown hours (structured entry)
    #[arg(short = 'H', long, default_value_t = 0,
          value_parser = clap::value_parser!(u32).range(..=MAX_HOURS as i64))]
    pub hours: u32,

    /// Countdown minutes (structured entry)
    #[arg(short = 'M', long, default_value_t = 0,
          value_parser = clap::value_parser!(u32).range(..=MAX_MINUTES as i64))]
    pub minutes: u32,

    /// Countdown seconds (structured entry)
    #[arg(short = 'S', long, default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..=MAX_SECONDS as i64))]
    pub seconds: u32,

    /// Free-text entry: three raw fields, validated before the timer arms
    #[arg(long, num_args = 3, value_names = ["HOURS", "MINUTES", "SECONDS"])]
    pub input: Option<Vec<String>>,

    /// Emit state snapshots as JSON lines instead of formatted text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// The duration input surface the user filled in.
    ///
    /// Free-text entry takes precedence when present; otherwise the bounded
    /// structured flags apply.
    pub fn duration_input(&self) -> DurationInput {
        match self.input.as_deref() {
            Some([hours, minutes, seconds]) => DurationInput::FreeText {
                hours: hours.clone(),
                minutes: minutes.clone(),
                seconds: seconds.clone(),
            },
            _ => DurationInput::Structured {
                hours: self.hours,
                minutes: self.minutes,
                seconds: self.seconds,
            },
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::InputMode;

    #[test]
    fn defaults_to_one_second_structured() {
        let config = Config::try_parse_from(["doze"]).unwrap();
        let input = config.duration_input();
        assert_eq!(input.mode(), InputMode::Structured);
        assert_eq!(
            input,
            DurationInput::Structured {
                hours: 0,
                minutes: 0,
                seconds: 1,
            }
        );
    }

    #[test]
    fn structured_flags_are_bounded() {
        assert!(Config::try_parse_from(["doze", "--hours", "24"]).is_err());
        assert!(Config::try_parse_from(["doze", "--minutes", "60"]).is_err());
        assert!(Config::try_parse_from(["doze", "--seconds", "0"]).is_err());
        assert!(Config::try_parse_from(["doze", "--hours", "23", "--minutes", "59"]).is_ok());
    }

    #[test]
    fn free_text_passes_raw_fields_through() {
        let config = Config::try_parse_from(["doze", "--input", "1", "0", "a"]).unwrap();
        assert_eq!(
            config.duration_input(),
            DurationInput::FreeText {
                hours: "1".to_string(),
                minutes: "0".to_string(),
                seconds: "a".to_string(),
            }
        );
    }
}
