//! Retry policy tests
//!
//! Backoff schedules are checked on a paused tokio clock so that elapsed
//! time is exact.

use llmv_application::{Retried, RetryPolicy};
use llmv_domain::{ProbeError, ProbeErrorKind};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_operation_is_attempted_max_times() {
    let policy = RetryPolicy::new(4, secs(2), secs(16));
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let retried: Retried<(), ProbeError> = policy
        .run(&CancellationToken::new(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProbeError::transport("connection reset")) }
        })
        .await;

    let elapsed = started.elapsed();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(retried.attempts, 4);
    assert!(!retried.cancelled);
    assert!(elapsed >= secs(14), "elapsed {elapsed:?}");
    assert!(elapsed <= secs(14 + 16), "elapsed {elapsed:?}");

    // the last classified error comes back unchanged
    let error = retried.result.unwrap_err();
    assert_eq!(error.kind, ProbeErrorKind::Transport);
    assert_eq!(error.message, "connection reset");
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_after_failures_with_growing_backoff() {
    let policy = RetryPolicy::new(5, secs(1), secs(8));
    let stamps = Mutex::new(Vec::new());

    let retried = policy
        .run(&CancellationToken::new(), |attempt| {
            stamps.lock().unwrap().push(Instant::now());
            async move {
                if attempt < 4 {
                    Err(ProbeError::from_status(503, "unavailable"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

    assert_eq!(retried.result.unwrap(), 4);
    assert_eq!(retried.attempts, 4);

    let stamps = stamps.into_inner().unwrap();
    let gaps: Vec<Duration> = stamps.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(gaps.len(), 3);
    for (gap, expected) in gaps.iter().zip([secs(1), secs(2), secs(4)]) {
        assert!(*gap >= expected, "gap {gap:?} shorter than {expected:?}");
    }
    assert!(gaps.windows(2).all(|w| w[1] >= w[0]));
}

#[tokio::test]
async fn test_non_retryable_errors_stop_immediately() {
    let policy = RetryPolicy::new(5, Duration::from_millis(1), Duration::from_millis(10));
    for error in [
        ProbeError::from_status(401, "unauthorized"),
        ProbeError::from_status(403, "forbidden"),
        ProbeError::from_status(404, "no such model"),
        ProbeError::from_status(400, "bad request"),
        ProbeError::malformed("not json"),
        ProbeError::circuit_open("openai"),
    ] {
        let calls = AtomicU32::new(0);
        let retried: Retried<(), ProbeError> = policy
            .run(&CancellationToken::new(), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                let error = error.clone();
                async move { Err(error) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "{error}");
        assert_eq!(retried.attempts, 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_backoff_sleep() {
    let policy = RetryPolicy::new(3, secs(10), secs(60));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(secs(1)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let retried: Retried<(), ProbeError> = policy
        .run(&cancel, |_| async { Err(ProbeError::timeout("deadline exceeded")) })
        .await;

    assert!(retried.cancelled);
    assert_eq!(retried.attempts, 1);
    assert!(started.elapsed() < secs(10));
    assert_eq!(retried.result.unwrap_err().kind, ProbeErrorKind::Timeout);
}

#[test]
fn test_base_backoff_doubles_and_caps() {
    let policy = RetryPolicy::new(10, secs(2), secs(16));
    let backoffs: Vec<_> = (1..=6).map(|attempt| policy.base_backoff(attempt)).collect();
    assert_eq!(
        backoffs,
        vec![secs(2), secs(4), secs(8), secs(16), secs(16), secs(16)]
    );
    assert_eq!(policy.base_backoff(64), secs(16));
}

#[test]
fn test_jitter_stays_within_fraction() {
    let policy = RetryPolicy::new(5, secs(2), secs(60)).with_jitter(0.2);
    for _ in 0..200 {
        let delay = policy.delay_for(2, None);
        assert!(delay >= Duration::from_millis(3200), "{delay:?}");
        assert!(delay <= Duration::from_millis(4800), "{delay:?}");
    }
}

#[test]
fn test_rate_limited_backoff_honors_retry_after() {
    let policy = RetryPolicy::new(5, secs(1), secs(16)).with_rate_limit_multiplier(2.0);

    let with_header = ProbeError::from_status(429, "slow down").with_retry_after_secs(5);
    assert_eq!(policy.delay_for(1, Some(&with_header)), secs(5));

    let without_header = ProbeError::from_status(429, "slow down");
    assert_eq!(policy.delay_for(1, Some(&without_header)), secs(2));

    let excessive = ProbeError::from_status(429, "slow down").with_retry_after_secs(600);
    assert_eq!(policy.delay_for(1, Some(&excessive)), secs(16));

    let server = ProbeError::from_status(502, "bad gateway");
    assert_eq!(policy.delay_for(1, Some(&server)), secs(1));
}

#[test]
fn test_validate_rejects_unusable_settings() {
    assert!(RetryPolicy::default().validate().is_ok());
    assert!(RetryPolicy::new(0, secs(1), secs(2)).validate().is_err());
    assert!(RetryPolicy::new(3, secs(5), secs(2)).validate().is_err());
    assert!(RetryPolicy::new(3, secs(1), secs(2)).with_jitter(1.5).validate().is_err());
    assert!(
        RetryPolicy::new(3, secs(1), secs(2))
            .with_rate_limit_multiplier(0.5)
            .validate()
            .is_err()
    );
}

#[test]
fn test_jitter_never_undercuts_retry_after() {
    let policy = RetryPolicy::default().with_jitter(0.5);
    let rate_limited = ProbeError::from_status(429, "slow down").with_retry_after_secs(5);
    for _ in 0..500 {
        let delay = policy.delay_for(1, Some(&rate_limited));
        assert!(delay >= secs(5), "{delay:?}");
        assert!(delay <= policy.max_backoff, "{delay:?}");
    }
}
