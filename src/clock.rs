//! Wall-clock sources for retry time budgets.
//!
//! Policies read the current time through the [`Clock`] trait so the elapsed-time
//! budget can be driven deterministically in tests (see
//! [`ManualClock`](crate::testing::ManualClock)).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of the current wall-clock time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> SystemTime;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// Truncate a timestamp to whole seconds since the Unix epoch.
///
/// Times before the epoch map to negative values.
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            // Floor, not truncate toward zero.
            if before.subsec_nanos() > 0 {
                -secs.saturating_add(1)
            } else {
                -secs
            }
        }
    }
}

/// Convert whole epoch seconds back to a timestamp.
///
/// Returns `None` if the platform cannot represent the time.
pub fn from_unix_seconds(secs: i64) -> Option<SystemTime> {
    let offset = Duration::from_secs(secs.unsigned_abs());
    if secs >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}

#[cfg(test)]
mod clock_tests {
    use super::*;

    #[test]
    fn test_unix_seconds_truncates() {
        let t = UNIX_EPOCH + Duration::from_millis(1_700_000_000_999);
        assert_eq!(unix_seconds(t), 1_700_000_000);
    }

    #[test]
    fn test_unix_seconds_before_epoch_floors() {
        let t = UNIX_EPOCH - Duration::from_millis(1_500);
        assert_eq!(unix_seconds(t), -2);
        assert_eq!(unix_seconds(UNIX_EPOCH - Duration::from_secs(3)), -3);
    }

    #[test]
    fn test_round_trip_whole_seconds() {
        for secs in [-10i64, 0, 1, 1_700_000_000] {
            assert_eq!(unix_seconds(from_unix_seconds(secs).unwrap()), secs);
        }
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(unix_seconds(SystemClock.now()) > 0);
    }
}
