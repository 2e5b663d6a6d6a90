//! Retry policy configuration.

use std::time::Duration;

use super::checkpoint::RetryCheckpoint;
use super::error::ConfigError;

/// Default floor delay between attempts.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(3);

/// Default backoff growth factor (constant delay).
pub const DEFAULT_FACTOR: f64 = 1.0;

/// Configuration for a [`RetryPolicy`](crate::RetryPolicy).
///
/// Every field is independently optional; unset fields keep their defaults:
///
/// | field              | default              |
/// |--------------------|----------------------|
/// | `first_retry_time` | now, at construction |
/// | `retried_count`    | 0                    |
/// | `max_retry_count`  | 0 (unlimited)        |
/// | `max_retry_time`   | zero (unlimited)     |
/// | `min_delay`        | 3s                   |
/// | `max_delay`        | zero (unbounded)     |
/// | `factor`           | 1.0                  |
/// | `jitter`           | false                |
///
/// # Examples
///
/// ```rust
/// use resumable_retry::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::default()
///     .with_max_retry_count(10)
///     .with_max_retry_time(Duration::from_secs(600))
///     .with_min_delay(Duration::from_secs(5))
///     .with_max_delay(Duration::from_secs(10 * 3600))
///     .with_factor(2.0);
///
/// assert_eq!(config.max_retry_count, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Epoch seconds of the first attempt. `None` or a non-positive value means
    /// "now" at construction.
    pub first_retry_time: Option<i64>,
    /// Attempts already consumed. Negative values are treated as 0.
    pub retried_count: i64,
    /// Ceiling on attempts; 0 is unlimited.
    pub max_retry_count: u64,
    /// Ceiling on wall-clock time since the first attempt; zero is unlimited.
    pub max_retry_time: Duration,
    /// Floor delay, and the delay of the first attempt.
    pub min_delay: Duration,
    /// Ceiling delay; zero is unbounded.
    pub max_delay: Duration,
    /// Multiplicative growth per attempt.
    pub factor: f64,
    /// Randomize delays between the floor and the computed delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            first_retry_time: None,
            retried_count: 0,
            max_retry_count: 0,
            max_retry_time: Duration::ZERO,
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: Duration::ZERO,
            factor: DEFAULT_FACTOR,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Set the first attempt timestamp (epoch seconds).
    pub fn with_first_retry_time(mut self, secs: i64) -> Self {
        self.first_retry_time = Some(secs);
        self
    }

    /// Set the number of attempts already consumed.
    pub fn with_retried_count(mut self, n: i64) -> Self {
        self.retried_count = n;
        self
    }

    /// Set the attempt ceiling (0 = unlimited).
    pub fn with_max_retry_count(mut self, n: u64) -> Self {
        self.max_retry_count = n;
        self
    }

    /// Set the elapsed-time budget (zero = unlimited).
    pub fn with_max_retry_time(mut self, d: Duration) -> Self {
        self.max_retry_time = d;
        self
    }

    /// Set the floor delay.
    pub fn with_min_delay(mut self, d: Duration) -> Self {
        self.min_delay = d;
        self
    }

    /// Set the ceiling delay (zero = unbounded).
    pub fn with_max_delay(mut self, d: Duration) -> Self {
        self.max_delay = d;
        self
    }

    /// Set the growth factor.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Enable or disable jitter.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, the flag is kept but
    /// delays are not randomized.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Continue a persisted sequence.
    ///
    /// Overwrites `first_retry_time` and `retried_count`; limits and curve are kept.
    pub fn resume(mut self, checkpoint: RetryCheckpoint) -> Self {
        self.first_retry_time = Some(checkpoint.first_retry_time);
        self.retried_count = checkpoint.retried_count;
        self
    }

    /// The attempt ceiling, or `None` when unlimited.
    pub fn max_retry_count(&self) -> Option<u64> {
        (self.max_retry_count > 0).then_some(self.max_retry_count)
    }

    /// The time budget, or `None` when unlimited.
    pub fn max_retry_time(&self) -> Option<Duration> {
        (!self.max_retry_time.is_zero()).then_some(self.max_retry_time)
    }

    /// Check the delay curve for values that are accepted but probably unintended.
    ///
    /// A policy built from an invalid config still works: the floor wins over a
    /// shrinking factor and the ceiling wins over the floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.factor.is_finite() {
            return Err(ConfigError::NonFiniteFactor(self.factor));
        }
        if self.factor < 1.0 {
            return Err(ConfigError::FactorBelowOne(self.factor));
        }
        if !self.max_delay.is_zero() && self.max_delay < self.min_delay {
            return Err(ConfigError::MaxDelayBelowMinDelay {
                min_delay: self.min_delay,
                max_delay: self.max_delay,
            });
        }
        Ok(())
    }
}
