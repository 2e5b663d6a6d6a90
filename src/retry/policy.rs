//! The retry decision state machine.

use std::time::{Duration, SystemTime};

use super::checkpoint::RetryCheckpoint;
use super::config::RetryConfig;
use super::error::{AttemptError, Rejection};
use crate::backoff::Backoff;
use crate::clock::{from_unix_seconds, unix_seconds, Clock, SystemClock};

/// One retry sequence for one logical operation.
///
/// The policy never sleeps and never retries on its own. The caller asks it, once
/// per attempt, whether another attempt is allowed and how long to wait first:
///
/// 1. Time budget: if `max_retry_time` is set and more than that has passed since
///    `first_retry_time`, the attempt is rejected with
///    [`Rejection::MaxRetryTimeExceeded`].
/// 2. Count budget: otherwise, if `max_retry_count` is set and already reached, the
///    attempt is rejected with [`Rejection::MaxRetryCountExceeded`].
/// 3. Otherwise the attempt is admitted, `retried_count` goes up by one and the
///    caller receives the backoff delay for this position in the sequence.
///
/// Both checks are evaluated fresh on every call. Once either budget is spent,
/// every later call is rejected; a new sequence needs a new policy.
///
/// Not safe to share between concurrent retry loops; each logical operation owns
/// its own instance.
///
/// # Examples
///
/// ```rust
/// use resumable_retry::{RetryConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let mut policy = RetryPolicy::new(
///     RetryConfig::default()
///         .with_max_retry_count(3)
///         .with_min_delay(Duration::from_secs(5))
///         .with_factor(2.0),
/// );
///
/// let mut delays = Vec::new();
/// while let Ok(admission) = policy.admit() {
///     delays.push(admission.delay);
///     // sleep(admission.delay); do_work();
/// }
///
/// assert_eq!(
///     delays,
///     vec![Duration::from_secs(5), Duration::from_secs(10), Duration::from_secs(20)]
/// );
/// assert_eq!(policy.retried_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy<C = SystemClock> {
    first_retry_time: i64,
    retried_count: u64,
    max_retry_count: u64,
    max_retry_time: Duration,
    backoff: Backoff,
    clock: C,
}

/// An admitted attempt, handed to the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Epoch seconds of the sequence's first attempt.
    pub first_retry_time: i64,
    /// 1-indexed number of this attempt, counting any resumed attempts.
    pub attempt: u64,
    /// Backoff delay for this attempt.
    pub delay: Duration,
}

/// Whether a policy would admit another attempt right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    /// Attempts may still be admitted.
    Open,
    /// A budget is spent.
    Closed(Rejection),
}

impl PolicyStatus {
    /// Returns true if attempts may still be admitted.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl RetryPolicy<SystemClock> {
    /// Create a policy that reads the system clock.
    pub fn new(config: RetryConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for RetryPolicy<SystemClock> {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl<C: Clock> RetryPolicy<C> {
    /// Create a policy with an explicit time source.
    ///
    /// An unset or non-positive `first_retry_time` becomes the clock's current
    /// time, and a negative `retried_count` becomes 0.
    pub fn with_clock(config: RetryConfig, clock: C) -> Self {
        let first_retry_time = match config.first_retry_time {
            Some(secs) if secs > 0 => secs,
            _ => unix_seconds(clock.now()),
        };
        let retried_count = u64::try_from(config.retried_count).unwrap_or(0);

        Self {
            first_retry_time,
            retried_count,
            max_retry_count: config.max_retry_count,
            max_retry_time: config.max_retry_time,
            backoff: Backoff::new(
                config.min_delay,
                config.max_delay,
                config.factor,
                config.jitter,
            ),
            clock,
        }
    }

    /// Epoch seconds of the sequence's first attempt.
    pub fn first_retry_time(&self) -> i64 {
        self.first_retry_time
    }

    /// Attempts consumed so far, including any the sequence was resumed with.
    pub fn retried_count(&self) -> u64 {
        self.retried_count
    }

    /// The attempt ceiling, or `None` when unlimited.
    pub fn max_retry_count(&self) -> Option<u64> {
        (self.max_retry_count > 0).then_some(self.max_retry_count)
    }

    /// The time budget, or `None` when unlimited.
    pub fn max_retry_time(&self) -> Option<Duration> {
        (!self.max_retry_time.is_zero()).then_some(self.max_retry_time)
    }

    /// The delay curve.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// The state to persist for resuming this sequence later.
    pub fn checkpoint(&self) -> RetryCheckpoint {
        RetryCheckpoint {
            first_retry_time: self.first_retry_time,
            retried_count: i64::try_from(self.retried_count).unwrap_or(i64::MAX),
        }
    }

    /// Wall-clock time since the first attempt; zero if the clock is behind it.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(self.clock.now())
    }

    /// The delay the next admitted attempt would receive.
    pub fn next_delay(&self) -> Duration {
        self.backoff.delay_for_attempt(self.retried_count)
    }

    /// Evaluate both budgets without consuming an attempt.
    pub fn status(&self) -> PolicyStatus {
        match self.check() {
            Ok(()) => PolicyStatus::Open,
            Err(rejection) => PolicyStatus::Closed(rejection),
        }
    }

    /// Decide whether another attempt may run.
    ///
    /// On admission the attempt is counted and its delay returned; the caller is
    /// expected to wait that long and then run the work. A rejection leaves the
    /// policy unchanged.
    pub fn admit(&mut self) -> Result<Admission, Rejection> {
        if let Err(rejection) = self.check() {
            #[cfg(feature = "tracing")]
            tracing::info!(
                "retry rejected ({}) after {} attempts: {}",
                rejection.as_label(),
                self.retried_count,
                rejection
            );
            return Err(rejection);
        }

        let delay = self.backoff.delay_for_attempt(self.retried_count);
        self.retried_count = self.retried_count.saturating_add(1);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "retry attempt {} admitted with delay {:?}",
            self.retried_count,
            delay
        );

        Ok(Admission {
            first_retry_time: self.first_retry_time,
            attempt: self.retried_count,
            delay,
        })
    }

    /// Admit an attempt and run `work` with it.
    ///
    /// If the policy rejects the attempt, `work` is not invoked and the rejection is
    /// returned. Otherwise the work's result is returned unchanged, success or
    /// failure; a failure does not affect the policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resumable_retry::{AttemptError, RetryConfig, RetryPolicy};
    ///
    /// let mut policy = RetryPolicy::new(RetryConfig::default().with_max_retry_count(2));
    ///
    /// let result: Result<u64, AttemptError<String>> =
    ///     policy.attempt(|admission| Ok(admission.attempt));
    /// assert_eq!(result, Ok(1));
    /// ```
    pub fn attempt<T, E, F>(&mut self, work: F) -> Result<T, AttemptError<E>>
    where
        F: FnOnce(Admission) -> Result<T, E>,
    {
        let admission = self.admit()?;
        work(admission).map_err(AttemptError::Work)
    }

    fn check(&self) -> Result<(), Rejection> {
        if !self.max_retry_time.is_zero() {
            let now = self.clock.now();
            if self.time_exceeded(now) {
                return Err(Rejection::MaxRetryTimeExceeded {
                    max_retry_time: self.max_retry_time,
                    elapsed: self.elapsed_at(now),
                });
            }
        }

        if self.max_retry_count > 0 && self.retried_count >= self.max_retry_count {
            return Err(Rejection::MaxRetryCountExceeded {
                max_retry_count: self.max_retry_count,
                retried_count: self.retried_count,
            });
        }

        Ok(())
    }

    // now - max_retry_time > first_retry_time, both in whole epoch seconds.
    fn time_exceeded(&self, now: SystemTime) -> bool {
        now.checked_sub(self.max_retry_time)
            .is_some_and(|budget_start| unix_seconds(budget_start) > self.first_retry_time)
    }

    fn elapsed_at(&self, now: SystemTime) -> Duration {
        from_unix_seconds(self.first_retry_time)
            .and_then(|first| now.duration_since(first).ok())
            .unwrap_or(Duration::ZERO)
    }
}
