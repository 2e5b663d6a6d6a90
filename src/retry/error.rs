//! Error types for retry decisions.

use std::time::Duration;

/// Why a policy refused to admit another attempt.
///
/// Both variants are terminal for the current limits: once returned, every later
/// call on the same policy is rejected the same way.
///
/// # Examples
///
/// ```rust
/// use resumable_retry::{Rejection, RetryConfig, RetryPolicy};
///
/// let mut policy = RetryPolicy::new(RetryConfig::default().with_max_retry_count(1));
/// assert!(policy.admit().is_ok());
///
/// match policy.admit() {
///     Err(Rejection::MaxRetryCountExceeded { max_retry_count, .. }) => {
///         assert_eq!(max_retry_count, 1);
///     }
///     other => panic!("expected count rejection, got {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The attempt budget is exhausted.
    MaxRetryCountExceeded {
        /// The configured ceiling.
        max_retry_count: u64,
        /// Attempts consumed when the check ran.
        retried_count: u64,
    },
    /// The elapsed-time budget is exhausted.
    MaxRetryTimeExceeded {
        /// The configured budget.
        max_retry_time: Duration,
        /// Wall-clock time since the first attempt when the check ran.
        elapsed: Duration,
    },
}

impl Rejection {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// ```
    /// use resumable_retry::Rejection;
    ///
    /// let r = Rejection::MaxRetryCountExceeded { max_retry_count: 3, retried_count: 3 };
    /// assert_eq!(r.as_label(), "max_retry_count_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::MaxRetryCountExceeded { .. } => "max_retry_count_exceeded",
            Self::MaxRetryTimeExceeded { .. } => "max_retry_time_exceeded",
        }
    }

    /// Returns true if the attempt budget ran out.
    pub fn is_count(&self) -> bool {
        matches!(self, Self::MaxRetryCountExceeded { .. })
    }

    /// Returns true if the time budget ran out.
    pub fn is_time(&self) -> bool {
        matches!(self, Self::MaxRetryTimeExceeded { .. })
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxRetryCountExceeded {
                max_retry_count,
                retried_count,
            } => write!(
                f,
                "max retry count exceeded: {} of {} attempts used",
                retried_count, max_retry_count
            ),
            Self::MaxRetryTimeExceeded {
                max_retry_time,
                elapsed,
            } => write!(
                f,
                "max retry time exceeded: {:?} elapsed, budget {:?}",
                elapsed, max_retry_time
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Error returned by [`RetryPolicy::attempt`](crate::RetryPolicy::attempt).
///
/// Either the policy rejected the attempt before running the work, or the work
/// ran and failed. Work errors are carried unchanged.
///
/// # Examples
///
/// ```rust
/// use resumable_retry::{AttemptError, RetryConfig, RetryPolicy};
///
/// let mut policy = RetryPolicy::new(RetryConfig::default().with_max_retry_count(1));
///
/// let first: Result<(), _> = policy.attempt(|_| Err("connection refused"));
/// assert_eq!(first, Err(AttemptError::Work("connection refused")));
///
/// let second: Result<(), AttemptError<&str>> = policy.attempt(|_| Ok(()));
/// assert!(second.unwrap_err().is_rejected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError<E> {
    /// The policy refused the attempt; the work was not invoked.
    Rejected(Rejection),
    /// The work ran and returned this error.
    Work(E),
}

impl<E> AttemptError<E> {
    /// Returns true if the policy refused the attempt.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns true if the work itself failed.
    pub fn is_work(&self) -> bool {
        matches!(self, Self::Work(_))
    }

    /// Get the rejection if present.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Work(_) => None,
        }
    }

    /// Extract the work error if present.
    pub fn into_work(self) -> Option<E> {
        match self {
            Self::Work(e) => Some(e),
            Self::Rejected(_) => None,
        }
    }
}

impl<E> From<Rejection> for AttemptError<E> {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl<E: std::fmt::Display> std::fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(r) => write!(f, "{}", r),
            Self::Work(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for AttemptError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Work(e) => Some(e),
        }
    }
}

/// A configuration value that makes no sense for a backoff curve.
///
/// Reported by [`RetryConfig::validate`](crate::RetryConfig::validate).
/// Construction itself never fails; these are advisory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The growth factor is NaN or infinite.
    NonFiniteFactor(f64),
    /// The growth factor would shrink delays.
    FactorBelowOne(f64),
    /// The ceiling is set but lower than the floor.
    MaxDelayBelowMinDelay {
        /// Configured floor.
        min_delay: Duration,
        /// Configured ceiling.
        max_delay: Duration,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteFactor(factor) => write!(f, "backoff factor {} is not finite", factor),
            Self::FactorBelowOne(factor) => {
                write!(f, "backoff factor {} is below 1.0", factor)
            }
            Self::MaxDelayBelowMinDelay {
                min_delay,
                max_delay,
            } => write!(
                f,
                "max delay {:?} is below min delay {:?}",
                max_delay, min_delay
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
