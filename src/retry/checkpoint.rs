//! Persisted retry sequence state.

/// The externally visible state of a retry sequence.
///
/// Callers store this (for example next to a failed job) and feed it back through
/// [`RetryConfig::resume`](crate::RetryConfig::resume) to continue the same
/// sequence after a restart. With the `serde` feature the wire names are
/// `firstRetryTime` and `retriedCount`.
///
/// # Examples
///
/// ```rust
/// use resumable_retry::{RetryCheckpoint, RetryConfig, RetryPolicy};
///
/// let mut policy = RetryPolicy::new(RetryConfig::default().with_first_retry_time(1_700_000_000));
/// policy.admit().unwrap();
/// let saved = policy.checkpoint();
/// assert_eq!(saved, RetryCheckpoint { first_retry_time: 1_700_000_000, retried_count: 1 });
///
/// let resumed = RetryPolicy::new(RetryConfig::default().resume(saved));
/// assert_eq!(resumed.retried_count(), 1);
/// assert_eq!(resumed.first_retry_time(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RetryCheckpoint {
    /// Epoch seconds of the sequence's first attempt.
    pub first_retry_time: i64,
    /// Attempts already consumed.
    pub retried_count: i64,
}
