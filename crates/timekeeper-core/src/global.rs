//! Default process-wide clock.
//!
//! Convenience call sites that cannot receive an injected [`ClockHandle`]
//! use these free functions. They all operate on one lazily created handle,
//! so every caller in the process shares the same view of time. Tests that
//! mutate it must call [`reset`] afterwards.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};

use crate::config::ClockConfig;
use crate::error::ConfigError;
use crate::handle::ClockHandle;

static GLOBAL_CLOCK: LazyLock<ClockHandle> = LazyLock::new(ClockHandle::new);

/// Returns the process-wide handle.
#[must_use]
pub fn handle() -> &'static ClockHandle {
    &GLOBAL_CLOCK
}

/// Applies `config` to the process-wide clock.
///
/// # Errors
///
/// Returns `ConfigError` if the configuration fails validation.
pub fn install(config: &ClockConfig) -> Result<(), ConfigError> {
    handle().apply_config(config)
}

/// See [`ClockHandle::now_utc`].
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    handle().now_utc()
}

/// See [`ClockHandle::now_local`].
#[must_use]
pub fn now_local() -> NaiveDateTime {
    handle().now_local()
}

/// See [`ClockHandle::now_utc_with_offset`].
#[must_use]
pub fn now_utc_with_offset() -> DateTime<FixedOffset> {
    handle().now_utc_with_offset()
}

/// See [`ClockHandle::now_local_with_offset`].
#[must_use]
pub fn now_local_with_offset() -> DateTime<FixedOffset> {
    handle().now_local_with_offset()
}

/// See [`ClockHandle::timezone_offset`].
#[must_use]
pub fn timezone_offset() -> FixedOffset {
    handle().timezone_offset()
}

/// See [`ClockHandle::set_fixed_time`].
pub fn set_fixed_time(instant: DateTime<Utc>) {
    handle().set_fixed_time(instant);
}

/// See [`ClockHandle::set_fixed_local_time`].
pub fn set_fixed_local_time(local: NaiveDateTime) {
    handle().set_fixed_local_time(local);
}

/// See [`ClockHandle::set_time_relative`].
pub fn set_time_relative(delta: TimeDelta) {
    handle().set_time_relative(delta);
}

/// See [`ClockHandle::set_skewed_time`].
pub fn set_skewed_time(target: DateTime<Utc>) {
    handle().set_skewed_time(target);
}

/// See [`ClockHandle::skew`].
#[must_use]
pub fn skew() -> TimeDelta {
    handle().skew()
}

/// See [`ClockHandle::set_skew`].
pub fn set_skew(skew: TimeDelta) {
    handle().set_skew(skew);
}

/// See [`ClockHandle::advance`].
pub fn advance(delta: TimeDelta) -> DateTime<Utc> {
    handle().advance(delta)
}

/// See [`ClockHandle::set_timezone_offset`].
pub fn set_timezone_offset(offset: FixedOffset) {
    handle().set_timezone_offset(offset);
}

/// See [`ClockHandle::enable_fake_sleep`].
pub fn enable_fake_sleep() {
    handle().enable_fake_sleep();
}

/// See [`ClockHandle::reset`].
pub fn reset() {
    handle().reset();
}

/// See [`ClockHandle::sleep`].
pub fn sleep(duration: Duration) {
    handle().sleep(duration);
}

/// See [`ClockHandle::sleep_async`].
pub async fn sleep_async(duration: Duration) {
    handle().sleep_async(duration).await;
}
