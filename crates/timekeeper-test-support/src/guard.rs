//! Serialized access to the process-wide clock.
//!
//! The global clock is shared by every test in a binary, and the test
//! harness runs tests on parallel threads. A test that mutates the global
//! clock holds a [`GlobalClockGuard`] for its whole body; the guard resets
//! the clock when acquired and again when dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};

use timekeeper_core::global;
use timekeeper_core::handle::ClockHandle;

static GLOBAL_CLOCK_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive, self-resetting access to the process-wide clock.
#[derive(Debug)]
pub struct GlobalClockGuard {
    _lock: MutexGuard<'static, ()>,
}

impl GlobalClockGuard {
    /// Blocks until no other test holds the global clock, then resets it.
    ///
    /// A test that panicked while holding the guard does not poison later
    /// tests; the clock is reset either way.
    #[must_use]
    pub fn acquire() -> Self {
        let lock = GLOBAL_CLOCK_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        global::reset();
        Self { _lock: lock }
    }

    /// The process-wide handle, for code under test that takes an injected
    /// clock.
    #[must_use]
    pub fn clock(&self) -> &'static ClockHandle {
        global::handle()
    }
}

impl Drop for GlobalClockGuard {
    fn drop(&mut self) {
        global::reset();
    }
}
