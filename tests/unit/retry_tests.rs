/*!
 * Tests for the retry controller
 */

use ai_translate::translation::retry::{with_retry, RetryPolicy, DEFAULT_INITIAL_BACKOFF};
use std::sync::atomic::{AtomicU32, Ordering};
use crate::common;

/// Test that each invocation gets a fresh attempt budget
#[test]
fn test_withRetry_consecutiveCalls_shouldNotShareAttempts() {
    let policy = RetryPolicy::new(2).with_initial_backoff(common::NO_BACKOFF);
    let calls = AtomicU32::new(0);

    for _ in 0..3 {
        let result: Result<(), String> = tokio_test::block_on(with_retry(&policy, "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        }));
        assert!(result.is_err());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

/// Test that a single configured attempt never retries
#[test]
fn test_withRetry_singleAttempt_shouldCallOnce() {
    let policy = RetryPolicy::new(1);
    let calls = AtomicU32::new(0);

    let result: Result<(), &str> = tokio_test::block_on(with_retry(&policy, "op", || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err("down") }
    }));

    assert_eq!(result, Err("down"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Test the default schedule
#[test]
fn test_retryPolicy_default_shouldStartAtTwoSeconds() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts(), 3);
    assert_eq!(policy.initial_backoff(), DEFAULT_INITIAL_BACKOFF);
    assert_eq!(policy, RetryPolicy::new(-1));
}
