//! Clock state: the single value every handle reads and replaces.
//!
//! A [`ClockState`] is plain `Copy` data. Handles never mutate it field by
//! field in front of readers; they swap the whole value under a lock, so any
//! reader holds one coherent snapshot.

use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};

/// How `sleep` behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepMode {
    /// Wait for the full duration using host facilities.
    #[default]
    Real,
    /// Return almost immediately and advance the fixed instant instead.
    Fake,
}

/// Snapshot of the mockable clock configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    /// Pinned "now". `None` means host time.
    pub fixed_instant: Option<DateTime<Utc>>,
    /// Override of the host's local offset.
    pub timezone_offset: Option<FixedOffset>,
    /// Blocking behavior of `sleep` and `sleep_async`.
    pub sleep_mode: SleepMode,
    /// Shift applied to host time while no instant is pinned.
    pub skew: TimeDelta,
}

impl Default for ClockState {
    fn default() -> Self {
        Self {
            fixed_instant: None,
            timezone_offset: None,
            sleep_mode: SleepMode::Real,
            skew: TimeDelta::zero(),
        }
    }
}

impl ClockState {
    /// Returns `true` when "now" is pinned.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.fixed_instant.is_some()
    }

    /// Resolves UTC "now" against a host sample.
    #[must_use]
    pub fn utc_at(&self, host: &HostSample) -> DateTime<Utc> {
        match self.fixed_instant {
            Some(instant) => instant,
            None => saturating_add(host.utc, self.skew),
        }
    }

    /// Resolves the active offset against a host sample.
    #[must_use]
    pub fn offset_at(&self, host: &HostSample) -> FixedOffset {
        self.timezone_offset.unwrap_or(host.offset)
    }
}

/// One reading of the host clock: UTC time and the local offset in force at
/// that moment, taken from a single system query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSample {
    /// Host UTC time.
    pub utc: DateTime<Utc>,
    /// Host local offset.
    pub offset: FixedOffset,
}

impl HostSample {
    /// Samples the host clock.
    #[must_use]
    pub fn now() -> Self {
        let local = Local::now();
        Self {
            utc: local.with_timezone(&Utc),
            offset: *local.offset(),
        }
    }
}

/// Adds `delta`, clamping to the representable range instead of overflowing.
#[must_use]
pub fn saturating_add(instant: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    instant.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Converts a sleep duration to a signed delta, saturating at the maximum.
#[must_use]
pub fn delta_from_std(duration: std::time::Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
