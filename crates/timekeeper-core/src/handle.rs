//! Shared, injectable handle over a mockable clock.
//!
//! A [`ClockHandle`] is cheap to clone; every clone observes and mutates the
//! same [`ClockState`]. Application code receives a handle (or a
//! `&dyn Clock`) through explicit wiring, and tests drive time through the
//! setters below instead of waiting on the wall clock.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};

use crate::config::ClockConfig;
use crate::error::ConfigError;
use crate::state::{ClockState, HostSample, SleepMode, delta_from_std, saturating_add};

/// Real pause taken by a blocking fake sleep, so spinning callers still yield
/// the CPU.
const FAKE_SLEEP_PAUSE: Duration = Duration::from_millis(1);

/// Handle to a shared mockable clock.
#[derive(Debug, Clone, Default)]
pub struct ClockHandle {
    state: Arc<RwLock<ClockState>>,
}

impl ClockHandle {
    /// Creates a clock in real mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock and applies `config` to it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn from_config(config: &ClockConfig) -> Result<Self, ConfigError> {
        let handle = Self::new();
        handle.apply_config(config)?;
        Ok(handle)
    }

    /// Returns the default process-wide handle.
    #[must_use]
    pub fn global() -> &'static ClockHandle {
        crate::global::handle()
    }

    /// Applies `config` in a single atomic update. Fields the configuration
    /// leaves unset are not touched.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation; the
    /// clock is left unchanged in that case.
    pub fn apply_config(&self, config: &ClockConfig) -> Result<(), ConfigError> {
        let offset = config.timezone_offset()?;
        let host = HostSample::now();
        self.update(|state| {
            if let Some(instant) = config.fixed_time {
                state.fixed_instant = Some(instant);
            }
            if offset.is_some() {
                state.timezone_offset = offset;
            }
            if config.fake_sleep {
                let now = state.utc_at(&host);
                state.sleep_mode = SleepMode::Fake;
                state.fixed_instant.get_or_insert(now);
            }
        });
        tracing::debug!(?config, "clock configuration applied");
        Ok(())
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ClockState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` when "now" is pinned to a fixed instant.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.snapshot().is_fixed()
    }

    /// Returns the active sleep mode.
    #[must_use]
    pub fn sleep_mode(&self) -> SleepMode {
        self.snapshot().sleep_mode
    }

    /// Returns the shift applied to host time while the clock is running.
    #[must_use]
    pub fn skew(&self) -> TimeDelta {
        self.snapshot().skew
    }

    /// Current UTC time: the fixed instant if set, otherwise host time.
    #[must_use]
    pub fn now_utc(&self) -> DateTime<Utc> {
        self.read().0
    }

    /// Current local wall time under the active offset.
    #[must_use]
    pub fn now_local(&self) -> NaiveDateTime {
        self.now_local_with_offset().naive_local()
    }

    /// Current UTC time as an offset-aware timestamp with a zero offset.
    #[must_use]
    pub fn now_utc_with_offset(&self) -> DateTime<FixedOffset> {
        self.now_utc().fixed_offset()
    }

    /// Current time paired with the active offset.
    ///
    /// The instant and the offset come from the same snapshot, so
    /// `naive_local()` equals [`now_local`](Self::now_local) and `offset()`
    /// equals [`timezone_offset`](Self::timezone_offset) for that moment.
    #[must_use]
    pub fn now_local_with_offset(&self) -> DateTime<FixedOffset> {
        let (utc, offset) = self.read();
        utc.with_timezone(&offset)
    }

    /// The override offset if set, otherwise the host's current local offset.
    #[must_use]
    pub fn timezone_offset(&self) -> FixedOffset {
        self.read().1
    }

    /// Pins "now" to `instant`, replacing any prior fixed instant.
    pub fn set_fixed_time(&self, instant: DateTime<Utc>) {
        self.update(|state| state.fixed_instant = Some(instant));
        tracing::debug!(%instant, "fixed time set");
    }

    /// Pins "now" to a local wall time, converted to UTC with the offset
    /// active at the moment of the call.
    pub fn set_fixed_local_time(&self, local: NaiveDateTime) {
        let host = HostSample::now();
        let instant = self.update(|state| {
            let offset = state.offset_at(&host);
            let instant = local_to_utc(local, offset);
            state.fixed_instant = Some(instant);
            instant
        });
        tracing::debug!(%local, %instant, "fixed local time set");
    }

    /// Pins "now" to the current UTC time plus `delta`.
    ///
    /// The delta is always applied to UTC "now"; callers reasoning in local
    /// time get the same result because the offset is added afterwards.
    pub fn set_time_relative(&self, delta: TimeDelta) {
        let host = HostSample::now();
        let instant = self.update(|state| {
            let instant = saturating_add(state.utc_at(&host), delta);
            state.fixed_instant = Some(instant);
            instant
        });
        tracing::debug!(%delta, %instant, "fixed time set relative to now");
    }

    /// Unpins the clock and shifts host time so that "now" reads `target` at
    /// this moment, then keeps advancing with the wall clock.
    pub fn set_skewed_time(&self, target: DateTime<Utc>) {
        let host = HostSample::now();
        let skew = target.signed_duration_since(host.utc);
        self.update(|state| {
            state.fixed_instant = None;
            state.skew = skew;
        });
        tracing::debug!(%target, %skew, "running clock skewed");
    }

    /// Sets the shift applied to host time. Has no visible effect while a
    /// fixed instant is pinned.
    pub fn set_skew(&self, skew: TimeDelta) {
        self.update(|state| state.skew = skew);
        tracing::debug!(%skew, "clock skew set");
    }

    /// Overrides the local offset. The fixed instant, if any, is unchanged.
    pub fn set_timezone_offset(&self, offset: FixedOffset) {
        self.update(|state| state.timezone_offset = Some(offset));
        tracing::debug!(%offset, "timezone offset set");
    }

    /// Moves the clock by `delta` without waiting, pinning it at the current
    /// time first if it is running. Returns the new fixed instant.
    pub fn advance(&self, delta: TimeDelta) -> DateTime<Utc> {
        let host = HostSample::now();
        self.update(|state| advance_state(state, &host, delta))
    }

    /// Switches to fake sleep. A running clock is pinned at its current time
    /// so later sleeps have a baseline to advance from.
    pub fn enable_fake_sleep(&self) {
        let host = HostSample::now();
        let baseline = self.update(|state| {
            let now = state.utc_at(&host);
            state.sleep_mode = SleepMode::Fake;
            *state.fixed_instant.get_or_insert(now)
        });
        tracing::debug!(%baseline, "fake sleep enabled");
    }

    /// Restores real-mode defaults: no fixed instant, no offset override, no
    /// skew, real sleep.
    pub fn reset(&self) {
        self.update(|state| *state = ClockState::default());
        tracing::debug!("clock reset to real time");
    }

    /// Blocks the calling thread for `duration`, or, in fake mode, advances
    /// the clock by `duration` and returns almost immediately.
    pub fn sleep(&self, duration: Duration) {
        if self.advance_if_fake(duration) {
            std::thread::sleep(FAKE_SLEEP_PAUSE);
        } else {
            std::thread::sleep(duration);
        }
    }

    /// Suspends the current task for `duration`, or, in fake mode, advances
    /// the clock by `duration` and yields once.
    pub async fn sleep_async(&self, duration: Duration) {
        if self.advance_if_fake(duration) {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }

    /// Checks the mode and, in fake mode, advances the clock under the same
    /// write lock. The lock is released before any real wait.
    fn advance_if_fake(&self, duration: Duration) -> bool {
        let host = HostSample::now();
        let advanced = self.update(|state| {
            (state.sleep_mode == SleepMode::Fake)
                .then(|| advance_state(state, &host, delta_from_std(duration)))
        });
        match advanced {
            Some(instant) => {
                tracing::trace!(?duration, %instant, "fake sleep advanced clock");
                true
            }
            None => false,
        }
    }

    fn read(&self) -> (DateTime<Utc>, FixedOffset) {
        let state = self.snapshot();
        let host = HostSample::now();
        (state.utc_at(&host), state.offset_at(&host))
    }

    fn update<R>(&self, f: impl FnOnce(&mut ClockState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *state)
    }
}

fn advance_state(state: &mut ClockState, host: &HostSample, delta: TimeDelta) -> DateTime<Utc> {
    let instant = saturating_add(state.utc_at(host), delta);
    state.fixed_instant = Some(instant);
    instant
}

fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    saturating_add(local.and_utc(), -shift)
}
