//! Shared test clocks and utilities for Timekeeper consumers.

mod clock;
mod guard;

pub use clock::FixedClock;
pub use guard::GlobalClockGuard;
