//! Test clocks — deterministic `Clock` implementations for tests.

use chrono::{DateTime, FixedOffset, Utc};
use timekeeper_core::clock::Clock;
use timekeeper_core::handle::ClockHandle;

const REFERENCE_UNIX_SECS: i64 = 1_768_471_200;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// 2026-01-15T10:00:00Z, the timestamp shared across the test suites.
    #[must_use]
    pub fn reference() -> Self {
        Self(DateTime::from_timestamp(REFERENCE_UNIX_SECS, 0).unwrap_or_default())
    }

    /// A mutable handle pinned at this clock's instant, for tests that also
    /// need to move time or override the offset.
    #[must_use]
    pub fn to_handle(self) -> ClockHandle {
        let handle = ClockHandle::new();
        handle.set_fixed_time(self.0);
        handle
    }

    /// A pinned handle whose local time is evaluated at `offset`.
    #[must_use]
    pub fn to_handle_at(self, offset: FixedOffset) -> ClockHandle {
        let handle = self.to_handle();
        handle.set_timezone_offset(offset);
        handle
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
