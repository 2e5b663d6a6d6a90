//! Testing utilities for code that drives a [`RetryPolicy`](crate::RetryPolicy).
//!
//! # Examples
//!
//! ## ManualClock
//!
//! ```rust
//! use resumable_retry::testing::ManualClock;
//! use resumable_retry::{RetryConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! let clock = ManualClock::at_unix_seconds(1_700_000_000);
//! let mut policy = RetryPolicy::with_clock(
//!     RetryConfig::default().with_max_retry_time(Duration::from_secs(60)),
//!     clock.clone(),
//! );
//!
//! assert!(policy.admit().is_ok());
//! clock.advance(Duration::from_secs(61));
//! assert!(policy.admit().unwrap_err().is_time());
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::clock::{from_unix_seconds, Clock};

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another to
/// the policy.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a clock frozen at whole epoch seconds.
    ///
    /// Falls back to the epoch if the platform cannot represent `secs`.
    pub fn at_unix_seconds(secs: i64) -> Self {
        Self::new(from_unix_seconds(secs).unwrap_or(UNIX_EPOCH))
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Jump to an absolute time, forwards or backwards.
    pub fn set(&self, to: SystemTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
