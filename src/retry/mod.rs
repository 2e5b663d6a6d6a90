//! Retry decisions for caller-driven retry loops.
//!
//! A [`RetryPolicy`] tracks one retry sequence: when it started and how many
//! attempts it has used. The caller asks it once per attempt whether to go ahead
//! and how long to wait; the policy never sleeps, spawns or retries by itself.
//!
//! - **Two budgets**: an attempt ceiling and an elapsed-time budget, each optional,
//!   checked time first
//! - **Backoff**: exponential delay curve with optional jitter (see [`Backoff`](crate::Backoff))
//! - **Resumable**: the whole sequence state is a [`RetryCheckpoint`] that can be
//!   stored and fed back after a restart
//!
//! # Quick Start
//!
//! ```rust
//! use resumable_retry::{AttemptError, RetryConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! let mut policy = RetryPolicy::new(
//!     RetryConfig::default()
//!         .with_max_retry_count(5)
//!         .with_min_delay(Duration::from_millis(100))
//!         .with_factor(2.0),
//! );
//!
//! let mut failures = 0;
//! let outcome = loop {
//!     match policy.attempt(|admission| {
//!         // std::thread::sleep(admission.delay);
//!         if admission.attempt < 3 {
//!             Err("transient failure")
//!         } else {
//!             Ok("done")
//!         }
//!     }) {
//!         Ok(value) => break Ok(value),
//!         Err(AttemptError::Work(_)) => failures += 1,
//!         Err(AttemptError::Rejected(rejection)) => break Err(rejection),
//!     }
//! };
//!
//! assert_eq!(outcome, Ok("done"));
//! assert_eq!(failures, 2);
//! ```
//!
//! # Jitter Support
//!
//! Enable the `jitter` feature (on by default) to randomize delays:
//!
//! ```toml
//! resumable-retry = { version = "...", features = ["jitter"] }
//! ```
//!
//! # Error Types
//!
//! - [`Rejection`]: the policy refused the attempt; stop retrying
//! - [`AttemptError`]: a rejection, or the work's own error unchanged
//! - [`ConfigError`]: a curve setting that is accepted but probably wrong

mod checkpoint;
mod config;
mod error;
mod policy;

pub use checkpoint::RetryCheckpoint;
pub use config::{RetryConfig, DEFAULT_FACTOR, DEFAULT_MIN_DELAY};
pub use error::{AttemptError, ConfigError, Rejection};
pub use policy::{Admission, PolicyStatus, RetryPolicy};

#[cfg(test)]
mod tests;
