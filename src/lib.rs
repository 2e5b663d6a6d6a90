//! # resumable-retry
//!
//! A retry policy that decides, on each attempt, whether another attempt is allowed
//! and how long to wait before making it.
//!
//! The policy is a decision oracle: it does not run work concurrently, schedule
//! timers or retry automatically. The caller owns the loop, sleeps the returned
//! delay and runs the work.
//!
//! ## Quick Example
//!
//! ```rust
//! use resumable_retry::{RetryConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! let mut policy = RetryPolicy::new(
//!     RetryConfig::default()
//!         .with_max_retry_count(10)
//!         .with_max_retry_time(Duration::from_secs(300))
//!         .with_min_delay(Duration::from_secs(1))
//!         .with_max_delay(Duration::from_secs(30))
//!         .with_factor(2.0),
//! );
//!
//! match policy.admit() {
//!     Ok(admission) => {
//!         assert_eq!(admission.attempt, 1);
//!         assert_eq!(admission.delay, Duration::from_secs(1));
//!     }
//!     Err(rejection) => panic!("unexpected: {}", rejection),
//! }
//!
//! // Persist and resume later.
//! let checkpoint = policy.checkpoint();
//! assert_eq!(checkpoint.retried_count, 1);
//! ```
//!
//! ## Features
//!
//! - `jitter` (default): randomize delays with `rand`
//! - `tracing` (default): emit `tracing` events on admission and rejection
//! - `serde`: `Serialize`/`Deserialize` for [`RetryConfig`] and [`RetryCheckpoint`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod clock;
pub mod retry;
pub mod testing;

// Re-exports
pub use backoff::Backoff;
pub use clock::{Clock, SystemClock};
pub use retry::{
    Admission, AttemptError, ConfigError, PolicyStatus, Rejection, RetryCheckpoint, RetryConfig,
    RetryPolicy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::Backoff;
    pub use crate::retry::{
        Admission, AttemptError, Rejection, RetryCheckpoint, RetryConfig, RetryPolicy,
    };
}
