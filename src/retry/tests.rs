//! Scenario tests for retry sequences.

use super::*;
use crate::testing::ManualClock;
use std::cell::Cell;
use std::time::Duration;

const START: i64 = 1_700_000_000;

#[test]
fn test_max_retry_count_scenario() {
    let clock = ManualClock::at_unix_seconds(START);
    let mut policy =
        RetryPolicy::with_clock(RetryConfig::default().with_max_retry_count(10), clock);

    let invoked = Cell::new(0u64);
    let mut seen = Vec::new();

    for call in 1..=20u64 {
        let result: Result<(), AttemptError<()>> = policy.attempt(|admission| {
            invoked.set(invoked.get() + 1);
            seen.push(admission.attempt);
            Ok(())
        });

        if call <= 10 {
            assert!(result.is_ok(), "call {} should be admitted", call);
            assert_eq!(policy.retried_count(), call);
        } else {
            assert_eq!(
                result,
                Err(AttemptError::Rejected(Rejection::MaxRetryCountExceeded {
                    max_retry_count: 10,
                    retried_count: 10,
                }))
            );
        }
    }

    assert_eq!(invoked.get(), 10);
    assert_eq!(seen, (1..=10).collect::<Vec<_>>());
    assert_eq!(policy.retried_count(), 10);
}

#[test]
fn test_max_retry_time_scenario() {
    let clock = ManualClock::at_unix_seconds(START);
    let mut policy = RetryPolicy::with_clock(
        RetryConfig::default().with_max_retry_time(Duration::from_secs(1)),
        clock.clone(),
    );

    let mut admitted = 0;
    let mut first_rejection_at = None;

    // One call every 100ms for 5s.
    for tick in 0..50u64 {
        let elapsed = Duration::from_millis(100 * tick);
        let result: Result<(), AttemptError<()>> = policy.attempt(|_| Ok(()));

        match result {
            Ok(()) => {
                assert!(
                    first_rejection_at.is_none(),
                    "admitted at {:?} after a rejection",
                    elapsed
                );
                admitted += 1;
            }
            Err(err) => {
                assert!(err.rejection().unwrap().is_time());
                assert!(elapsed > Duration::from_secs(1), "rejected at {:?}", elapsed);
                first_rejection_at.get_or_insert(elapsed);
            }
        }

        clock.advance(Duration::from_millis(100));
    }

    // Whole-second resolution: 0ms through 1900ms are admitted.
    assert_eq!(admitted, 20);
    assert_eq!(first_rejection_at, Some(Duration::from_millis(2000)));
    assert_eq!(policy.retried_count(), 20);
}

#[test]
fn test_time_and_count_scenario() {
    let clock = ManualClock::at_unix_seconds(START);
    let mut policy = RetryPolicy::with_clock(
        RetryConfig::default()
            .with_max_retry_time(Duration::from_secs(1))
            .with_max_retry_count(10),
        clock.clone(),
    );

    let mut rejections = Vec::new();
    for _ in 0..50 {
        if let Err(rejection) = policy.admit() {
            rejections.push(rejection);
        }
        clock.advance(Duration::from_millis(100));
    }

    // Count runs out after the 900ms call; time takes over from 2000ms.
    assert_eq!(policy.retried_count(), 10);
    assert!(rejections[..10].iter().all(Rejection::is_count));
    assert!(rejections[10..].iter().all(Rejection::is_time));
    assert_eq!(rejections.len(), 40);
}

#[test]
fn test_backoff_sequence_doubles_to_cap() {
    let mut policy = RetryPolicy::new(
        RetryConfig::default()
            .with_first_retry_time(START)
            .with_retried_count(0)
            .with_min_delay(Duration::from_secs(5))
            .with_max_delay(Duration::from_secs(10 * 3600))
            .with_factor(2.0),
    );

    let mut delays = Vec::new();
    for _ in 0..20 {
        let delay = policy
            .attempt(|admission| Ok::<_, ()>(admission.delay))
            .unwrap();
        delays.push(delay);
    }

    assert_eq!(delays[0], Duration::from_secs(5));
    for pair in delays.windows(2) {
        let doubled = (pair[0] * 2).min(Duration::from_secs(10 * 3600));
        assert_eq!(pair[1], doubled);
    }
    assert_eq!(delays[19], Duration::from_secs(10 * 3600));
}

#[test]
fn test_work_errors_do_not_close_policy() {
    let mut policy = RetryPolicy::new(RetryConfig::default().with_max_retry_count(3));

    for attempt in 1..=3u64 {
        let result: Result<(), _> = policy.attempt(|_| Err(format!("failure {}", attempt)));
        assert_eq!(
            result.unwrap_err().into_work(),
            Some(format!("failure {}", attempt))
        );
    }

    assert!(matches!(
        policy.status(),
        PolicyStatus::Closed(Rejection::MaxRetryCountExceeded { .. })
    ));
}

#[test]
fn test_resume_after_restart() {
    let config = RetryConfig::default()
        .with_max_retry_count(5)
        .with_min_delay(Duration::from_secs(2))
        .with_factor(3.0);

    let clock = ManualClock::at_unix_seconds(START);
    let mut before = RetryPolicy::with_clock(config.clone(), clock.clone());
    let uninterrupted: Vec<_> = {
        let mut reference = before.clone();
        std::iter::from_fn(|| reference.admit().ok().map(|a| a.delay)).collect()
    };

    let mut delays = vec![before.admit().unwrap().delay, before.admit().unwrap().delay];
    let saved = before.checkpoint();
    drop(before);

    clock.advance(Duration::from_secs(120));
    let mut after = RetryPolicy::with_clock(config.resume(saved), clock);
    assert_eq!(after.first_retry_time(), START);
    while let Ok(admission) = after.admit() {
        delays.push(admission.delay);
    }

    assert_eq!(delays, uninterrupted);
    assert_eq!(after.retried_count(), 5);
}
