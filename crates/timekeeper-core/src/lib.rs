//! Timekeeper Core — a mockable source of "now".
//!
//! Production code asks a [`ClockHandle`] (or the process-wide instance in
//! [`global`]) for the time instead of the operating system. Tests pin the
//! clock, override the timezone offset and turn sleeps into instant clock
//! advances, all without waiting on the wall clock.

pub mod clock;
pub mod config;
pub mod error;
pub mod global;
pub mod handle;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use config::ClockConfig;
pub use error::ConfigError;
pub use handle::ClockHandle;
pub use state::{ClockState, SleepMode};
