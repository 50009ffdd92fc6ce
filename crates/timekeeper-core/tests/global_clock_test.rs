//! Behavior of the process-wide clock as seen through the free functions.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};
use timekeeper_core::global;
use timekeeper_core::{Clock, ClockConfig, SleepMode};
use timekeeper_test_support::{FixedClock, GlobalClockGuard};

fn assert_close(actual: DateTime<Utc>, expected: DateTime<Utc>, tolerance_ms: i64) {
    let diff = (actual - expected).num_milliseconds().abs();
    assert!(diff <= tolerance_ms, "{actual} is {diff}ms away from {expected}");
}

#[test]
fn test_global_clock_reads_host_time() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();

    // Act
    let utc = global::now_utc();
    let local = global::now_local();
    let offset_utc = global::now_utc_with_offset();
    let offset_local = global::now_local_with_offset();

    // Assert
    assert_close(utc, Utc::now(), 50);
    assert!((Local::now().naive_local() - local).num_milliseconds().abs() <= 50);
    assert_close(offset_utc.with_timezone(&Utc), Utc::now(), 50);
    assert_close(offset_local.with_timezone(&Utc), Utc::now(), 50);
    assert_eq!(global::timezone_offset(), *Local::now().offset());
    assert_eq!(*offset_local.offset(), global::timezone_offset());
}

#[test]
fn test_global_sleep_blocks_then_fake_sleep_advances() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();
    let started = Instant::now();

    // Act
    global::sleep(Duration::from_millis(250));

    // Assert
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(245), "slept {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1000), "slept {elapsed:?}");

    // Arrange
    global::enable_fake_sleep();
    let before = global::now_utc();
    let started = Instant::now();

    // Act
    global::sleep(Duration::from_millis(1000));

    // Assert
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(global::now_utc() - before, TimeDelta::milliseconds(1000));
}

#[tokio::test]
async fn test_global_sleep_async_waits_then_fake_sleep_advances() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();
    let started = Instant::now();

    // Act
    global::sleep_async(Duration::from_millis(250)).await;

    // Assert
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(245), "slept {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1000), "slept {elapsed:?}");

    // Arrange
    global::enable_fake_sleep();
    let before = global::now_utc();
    let started = Instant::now();

    // Act
    global::sleep_async(Duration::from_millis(1000)).await;

    // Assert
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(global::now_utc() - before, TimeDelta::milliseconds(1000));
}

#[test]
fn test_global_timezone_override() {
    // Arrange
    let guard = GlobalClockGuard::acquire();
    let fixed = FixedClock::reference();
    let plus_one = FixedOffset::east_opt(3600).unwrap();
    global::set_fixed_time(fixed.0);

    // Act
    global::set_timezone_offset(plus_one);

    // Assert
    assert_eq!(global::now_utc(), fixed.0);
    assert_eq!(global::now_utc_with_offset(), fixed.0);
    assert_eq!(global::now_local(), (fixed.0 + TimeDelta::hours(1)).naive_utc());
    assert_eq!(global::now_local_with_offset(), fixed.0.with_timezone(&plus_one));
    assert_eq!(*global::now_local_with_offset().offset(), plus_one);
    assert_eq!(global::timezone_offset(), plus_one);
    assert_eq!(guard.clock().now(), fixed.0);
}

#[test]
fn test_global_fixed_local_time() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();
    let local = Local::now();

    // Act
    global::set_fixed_local_time(local.naive_local());

    // Assert
    assert_eq!(global::now_local(), local.naive_local());
    assert_eq!(global::now_local_with_offset().naive_local(), local.naive_local());
    assert_eq!(global::now_utc(), local.with_timezone(&Utc));
    assert_eq!(global::timezone_offset(), *local.offset());
}

#[test]
fn test_global_fixed_utc_time() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();
    let utc = Utc::now();

    // Act
    global::set_fixed_time(utc);

    // Assert
    assert_eq!(global::now_utc(), utc);
    assert_eq!(global::now_utc_with_offset(), utc);
    assert_eq!(
        global::now_local(),
        utc.with_timezone(&global::timezone_offset()).naive_local()
    );
}

#[test]
fn test_global_time_relative_is_frozen() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();

    // Act
    global::set_time_relative(TimeDelta::minutes(-5));
    let pinned = global::now_utc();
    std::thread::sleep(Duration::from_millis(100));

    // Assert
    assert_close(pinned, Utc::now() - TimeDelta::minutes(5), 150);
    assert_eq!(global::now_utc(), pinned);
}

#[test]
fn test_global_skewed_time_keeps_running() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();

    // Act
    global::set_skewed_time(Utc::now() - TimeDelta::minutes(5));

    // Assert
    assert_close(global::now_utc(), Utc::now() - TimeDelta::minutes(5), 50);
    std::thread::sleep(Duration::from_millis(500));
    assert_close(global::now_utc(), Utc::now() - TimeDelta::minutes(5), 50);
    assert_eq!(global::timezone_offset(), *Local::now().offset());
}

#[test]
fn test_install_applies_configuration() {
    // Arrange
    let guard = GlobalClockGuard::acquire();
    let fixed = FixedClock::reference();
    let config = ClockConfig {
        fixed_time: Some(fixed.0),
        timezone_offset_minutes: Some(-120),
        fake_sleep: true,
    };

    // Act
    global::install(&config).unwrap();

    // Assert
    assert_eq!(global::now_utc(), fixed.0);
    assert_eq!(global::timezone_offset(), FixedOffset::west_opt(7200).unwrap());
    assert_eq!(guard.clock().sleep_mode(), SleepMode::Fake);
}

#[test]
fn test_reset_returns_to_host_time() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();
    global::set_fixed_time(FixedClock::reference().0);
    global::set_timezone_offset(FixedOffset::east_opt(5 * 3600).unwrap());
    global::enable_fake_sleep();

    // Act
    global::reset();

    // Assert
    assert_close(global::now_utc(), Utc::now(), 50);
    assert_eq!(global::timezone_offset(), *Local::now().offset());
    assert_eq!(global::handle().sleep_mode(), SleepMode::Real);
}

#[test]
fn test_global_skew_and_advance() {
    // Arrange
    let _guard = GlobalClockGuard::acquire();

    // Act
    global::set_skew(TimeDelta::hours(-1));

    // Assert
    assert_eq!(global::skew(), TimeDelta::hours(-1));
    assert_close(global::now_utc(), Utc::now() - TimeDelta::hours(1), 50);

    // Act
    let advanced = global::advance(TimeDelta::minutes(10));

    // Assert
    assert_eq!(global::now_utc(), advanced);
    assert_close(advanced, Utc::now() - TimeDelta::minutes(50), 50);
}
