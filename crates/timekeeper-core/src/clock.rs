//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

use crate::handle::ClockHandle;

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
///
/// Ignores every override; use [`ClockHandle`] where tests need to pin or
/// advance time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl Clock for ClockHandle {
    fn now(&self) -> DateTime<Utc> {
        self.now_utc()
    }
}
