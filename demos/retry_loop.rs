//! Retry Loop Example
//!
//! Drives a flaky operation with a retry policy, sleeping the delay the policy
//! hands back, then persists and resumes the sequence.
//!
//! Run with: cargo run --example retry_loop

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use resumable_retry::{AttemptError, RetryCheckpoint, RetryConfig, RetryPolicy};

fn config() -> RetryConfig {
    RetryConfig::default()
        .with_max_retry_count(6)
        .with_max_retry_time(Duration::from_secs(30))
        .with_min_delay(Duration::from_millis(50))
        .with_max_delay(Duration::from_millis(400))
        .with_factor(2.0)
        .with_jitter(true)
}

/// Fails until the fourth call.
fn flaky(calls: &AtomicU32) -> Result<&'static str, String> {
    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
    if n < 4 {
        Err(format!("upstream unavailable (call {})", n))
    } else {
        Ok("payload")
    }
}

// ==================== Retry Until Success ====================

fn example_retry_until_success() {
    tracing::info!("=== Example 1: retry until success ===");

    let calls = AtomicU32::new(0);
    let mut policy = RetryPolicy::new(config());

    loop {
        let result = policy.attempt(|admission| {
            tracing::info!(
                "attempt {} (sequence started at {}), waiting {:?}",
                admission.attempt,
                admission.first_retry_time,
                admission.delay
            );
            thread::sleep(admission.delay);
            flaky(&calls)
        });

        match result {
            Ok(value) => {
                tracing::info!("succeeded with {:?} after {} attempts", value, policy.retried_count());
                break;
            }
            Err(AttemptError::Work(e)) => tracing::warn!("attempt failed: {}", e),
            Err(AttemptError::Rejected(rejection)) => {
                tracing::error!("giving up: {}", rejection);
                break;
            }
        }
    }
}

// ==================== Resume After Restart ====================

fn example_resume() {
    tracing::info!("=== Example 2: persist and resume ===");

    let mut policy = RetryPolicy::new(config());
    for _ in 0..3 {
        if let Ok(admission) = policy.admit() {
            tracing::info!("admitted attempt {} before restart", admission.attempt);
        }
    }

    let saved: RetryCheckpoint = policy.checkpoint();
    tracing::info!("persisted {:?}", saved);
    drop(policy);

    let mut resumed = RetryPolicy::new(config().resume(saved));
    loop {
        match resumed.admit() {
            Ok(admission) => tracing::info!(
                "admitted attempt {} after restart, delay {:?}",
                admission.attempt,
                admission.delay
            ),
            Err(rejection) => {
                tracing::info!("sequence closed: {} ({})", rejection, rejection.as_label());
                break;
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    example_retry_until_success();
    example_resume();
}
