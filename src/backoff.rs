//! Exponential backoff delay generator.
//!
//! [`Backoff`] maps an attempt index to a wait duration. It is parameterized by:
//! - `min_delay`: the floor, and the delay of the first attempt;
//! - `max_delay`: the ceiling (`Duration::ZERO` means unbounded);
//! - `factor`: the multiplicative growth per attempt;
//! - `jitter`: whether to randomize each delay.
//!
//! The delay for attempt `n` (0-indexed) is `min_delay × factor^n`, clamped to
//! `[min_delay, max_delay]`. Because the base delay is derived purely from the attempt
//! number, a sequence can be reproduced from any position without replaying it.
//!
//! # Example
//!
//! ```rust
//! use resumable_retry::Backoff;
//! use std::time::Duration;
//!
//! let mut backoff = Backoff::new(
//!     Duration::from_secs(5),
//!     Duration::from_secs(60),
//!     2.0,
//!     false,
//! );
//!
//! assert_eq!(backoff.next_delay(), Duration::from_secs(5));
//! assert_eq!(backoff.next_delay(), Duration::from_secs(10));
//! assert_eq!(backoff.next_delay(), Duration::from_secs(20));
//!
//! // Same position, no replay needed.
//! assert_eq!(backoff.delay_for_attempt(2), Duration::from_secs(20));
//! // 5s × 2^4 = 80s → capped at 60s
//! assert_eq!(backoff.delay_for_attempt(4), Duration::from_secs(60));
//! ```

use std::time::Duration;

/// Backoff delay generator.
///
/// Holds the curve parameters and a cursor for the stateful
/// [`next_delay`](Backoff::next_delay) / [`Iterator`] interface. The pure
/// [`delay_for_attempt`](Backoff::delay_for_attempt) ignores the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    min_delay: Duration,
    max_delay: Duration,
    factor: f64,
    jitter: bool,
    attempts: u64,
}

impl Backoff {
    /// Create a generator positioned at attempt 0.
    ///
    /// `max_delay` of zero leaves the curve unbounded.
    pub fn new(min_delay: Duration, max_delay: Duration, factor: f64, jitter: bool) -> Self {
        Self {
            min_delay,
            max_delay,
            factor,
            jitter,
            attempts: 0,
        }
    }

    /// The floor delay.
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// The ceiling delay, or `None` when unbounded.
    pub fn max_delay(&self) -> Option<Duration> {
        if self.max_delay.is_zero() {
            None
        } else {
            Some(self.max_delay)
        }
    }

    /// The growth factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Whether delays are randomized.
    pub fn jitter(&self) -> bool {
        self.jitter
    }

    /// Number of delays produced by [`next_delay`](Backoff::next_delay) since
    /// construction or the last [`reset`](Backoff::reset).
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Rewind the cursor to attempt 0.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Produce the delay at the cursor and advance it.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay_for_attempt(self.attempts);
        self.attempts = self.attempts.saturating_add(1);
        delay
    }

    /// Compute the delay for attempt `attempt` (0-indexed).
    ///
    /// Equivalent to the value a fresh generator would return from its
    /// `attempt + 1`th call to [`next_delay`](Backoff::next_delay). With jitter
    /// disabled the result is deterministic.
    ///
    /// # Notes
    /// - A factor of 1.0 keeps the delay constant at `min_delay`.
    /// - A factor below 1.0 (or NaN) never takes the delay under `min_delay`.
    /// - Overflowing products saturate to `max_delay`, or `Duration::MAX` when unbounded.
    pub fn delay_for_attempt(&self, attempt: u64) -> Duration {
        let capped = self.cap(self.base_delay(attempt));
        self.apply_jitter(capped)
    }

    fn base_delay(&self, attempt: u64) -> Duration {
        if attempt == 0 || self.factor == 1.0 {
            return self.min_delay;
        }
        let exp = attempt.min(i32::MAX as u64) as i32;
        let min_secs = self.min_delay.as_secs_f64();
        let secs = min_secs * self.factor.powi(exp);

        if secs.is_nan() || secs <= min_secs {
            self.min_delay
        } else {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        }
    }

    fn cap(&self, delay: Duration) -> Duration {
        if self.max_delay.is_zero() {
            delay
        } else {
            delay.min(self.max_delay)
        }
    }

    #[cfg(feature = "jitter")]
    fn apply_jitter(&self, delay: Duration) -> Duration {
        use rand::Rng;

        let floor = self.min_delay.min(delay);
        if !self.jitter || delay <= floor {
            return delay;
        }
        let secs = rand::rng().random_range(floor.as_secs_f64()..=delay.as_secs_f64());
        Duration::try_from_secs_f64(secs)
            .unwrap_or(delay)
            .clamp(floor, delay)
    }

    #[cfg(not(feature = "jitter"))]
    fn apply_jitter(&self, delay: Duration) -> Duration {
        delay
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}

#[cfg(test)]
mod backoff_tests {
    use super::*;

    #[test]
    fn test_first_delay_is_min() {
        let backoff = Backoff::new(Duration::from_secs(3), Duration::ZERO, 2.0, false);
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_secs(3));
    }

    #[test]
    fn test_doubling_sequence() {
        let backoff = Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(10 * 3600),
            2.0,
            false,
        );
        let delays: Vec<_> = backoff.take(5).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(20),
                Duration::from_secs(40),
                Duration::from_secs(80),
            ]
        );
    }

    #[test]
    fn test_constant_factor() {
        let backoff = Backoff::new(Duration::from_millis(500), Duration::ZERO, 1.0, false);
        for attempt in 0..10 {
            assert_eq!(
                backoff.delay_for_attempt(attempt),
                Duration::from_millis(500),
                "attempt {} should be constant at 500ms",
                attempt
            );
        }
    }

    #[test]
    fn test_capped_at_max() {
        let backoff = Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(10 * 3600),
            2.0,
            false,
        );
        // 5s × 2^20 is well past 10h
        assert_eq!(backoff.delay_for_attempt(20), Duration::from_secs(10 * 3600));
    }

    #[test]
    fn test_min_above_max_is_capped() {
        let backoff = Backoff::new(Duration::from_secs(10), Duration::from_secs(5), 2.0, false);
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_secs(5));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_secs(5));
    }

    #[test]
    fn test_unbounded_overflow_saturates() {
        let backoff = Backoff::new(Duration::from_secs(1), Duration::ZERO, 10.0, false);
        assert_eq!(backoff.delay_for_attempt(u64::MAX), Duration::MAX);
    }

    #[test]
    fn test_bounded_overflow_saturates_to_max() {
        let backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(30), 10.0, false);
        assert_eq!(backoff.delay_for_attempt(10_000), Duration::from_secs(30));
    }

    #[test]
    fn test_factor_below_one_floors_at_min() {
        let backoff = Backoff::new(Duration::from_secs(4), Duration::ZERO, 0.5, false);
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_secs(4));

        let nan = Backoff::new(Duration::from_secs(4), Duration::ZERO, f64::NAN, false);
        assert_eq!(nan.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn test_next_delay_advances_and_reset_rewinds() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::ZERO, 3.0, false);
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(3));
        assert_eq!(backoff.attempts(), 2);

        backoff.reset();
        assert_eq!(backoff.attempts(), 0);
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_positional_matches_replay() {
        let backoff = Backoff::new(Duration::from_millis(250), Duration::from_secs(60), 1.5, false);
        for n in 0..30u64 {
            let mut fresh = backoff.clone();
            for _ in 0..n {
                fresh.next_delay();
            }
            assert_eq!(fresh.next_delay(), backoff.delay_for_attempt(n));
        }
    }

    #[test]
    fn test_accessors() {
        let backoff = Backoff::new(Duration::from_secs(1), Duration::ZERO, 2.0, true);
        assert_eq!(backoff.min_delay(), Duration::from_secs(1));
        assert_eq!(backoff.max_delay(), None);
        assert_eq!(backoff.factor(), 2.0);
        assert!(backoff.jitter());
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_jitter_stays_within_bounds() {
        let backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(30), 2.0, true);

        for attempt in 0..15 {
            let ceiling = Duration::from_millis(100 * 2u64.pow(attempt as u32)).min(Duration::from_secs(30));
            for _ in 0..20 {
                let delay = backoff.delay_for_attempt(attempt);
                assert!(
                    delay >= Duration::from_millis(100) && delay <= ceiling,
                    "attempt {}: delay {:?} outside [100ms, {:?}]",
                    attempt,
                    delay,
                    ceiling
                );
            }
        }
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_jitter_first_attempt_is_min() {
        let backoff = Backoff::new(Duration::from_secs(2), Duration::ZERO, 2.0, true);
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_secs(2));
    }
}
