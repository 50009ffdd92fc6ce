//! Clock configuration loaded from the environment or a config file.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding an RFC 3339 timestamp to pin the clock at.
pub const FIXED_TIME_VAR: &str = "TIMEKEEPER_FIXED_TIME";
/// Environment variable holding the timezone override in minutes east of UTC.
pub const TZ_OFFSET_VAR: &str = "TIMEKEEPER_TZ_OFFSET_MINUTES";
/// Environment variable enabling fake sleep.
pub const FAKE_SLEEP_VAR: &str = "TIMEKEEPER_FAKE_SLEEP";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Initial clock settings. Every field is optional; an empty configuration
/// leaves the clock in real mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Instant to pin "now" at.
    pub fixed_time: Option<DateTime<Utc>>,
    /// Local offset override, in minutes east of UTC.
    pub timezone_offset_minutes: Option<i32>,
    /// Whether sleeps advance the clock instead of waiting.
    pub fake_sleep: bool,
}

impl ClockConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a malformed value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a malformed value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let fixed_time = read(FIXED_TIME_VAR)
            .map(|value| {
                DateTime::parse_from_rfc3339(&value)
                    .map(|parsed| parsed.with_timezone(&Utc))
                    .map_err(|_| ConfigError::InvalidFixedTime {
                        variable: FIXED_TIME_VAR,
                        value,
                    })
            })
            .transpose()?;

        let timezone_offset_minutes = read(TZ_OFFSET_VAR)
            .map(|value| {
                value.parse::<i32>().map_err(|_| ConfigError::InvalidOffset {
                    variable: TZ_OFFSET_VAR,
                    value,
                })
            })
            .transpose()?;

        let fake_sleep = match read(FAKE_SLEEP_VAR) {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                variable: FAKE_SLEEP_VAR,
                value,
            })?,
        };

        let config = Self {
            fixed_time,
            timezone_offset_minutes,
            fake_sleep,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured offset is within ±24h.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OffsetOutOfRange` otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timezone_offset().map(|_| ())
    }

    /// Returns the configured offset override, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OffsetOutOfRange` if the offset is a day or more.
    pub fn timezone_offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.timezone_offset_minutes
            .map(|minutes| {
                if minutes.unsigned_abs() >= MINUTES_PER_DAY {
                    return Err(ConfigError::OffsetOutOfRange { minutes });
                }
                FixedOffset::east_opt(minutes * 60).ok_or(ConfigError::OffsetOutOfRange { minutes })
            })
            .transpose()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
