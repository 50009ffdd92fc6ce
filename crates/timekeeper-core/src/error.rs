//! Configuration error types.
//!
//! Clock operations themselves never fail; only loading a [`ClockConfig`]
//! can.
//!
//! [`ClockConfig`]: crate::config::ClockConfig

use thiserror::Error;

/// Error raised while loading or validating clock configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A fixed time that is not an RFC 3339 timestamp.
    #[error("{variable} must be an RFC 3339 timestamp, got {value:?}")]
    InvalidFixedTime {
        /// The variable that held the value.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An offset that is not a whole number of minutes.
    #[error("{variable} must be a whole number of minutes, got {value:?}")]
    InvalidOffset {
        /// The variable that held the value.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An offset of a day or more in either direction.
    #[error("timezone offset of {minutes} minutes is outside the ±24h range")]
    OffsetOutOfRange {
        /// The rejected offset.
        minutes: i32,
    },

    /// A flag that is not a recognized boolean.
    #[error("{variable} must be a boolean, got {value:?}")]
    InvalidFlag {
        /// The variable that held the value.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },
}
