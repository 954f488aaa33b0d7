//! Circuit breaker state machine tests
//!
//! Time-dependent cases run on a paused tokio clock.

use llmv_application::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerRegistry};
use llmv_domain::{CircuitFailurePolicy, CircuitState, ProbeErrorKind, ProviderId};
use std::sync::Arc;
use std::time::Duration;

fn breaker(config: CircuitBreakerConfig) -> Arc<CircuitBreaker> {
    Arc::new(CircuitBreaker::new(ProviderId::new("openai"), config))
}

fn default_breaker() -> Arc<CircuitBreaker> {
    breaker(CircuitBreakerConfig::new(5, Duration::from_secs(60)))
}

fn fail(breaker: &Arc<CircuitBreaker>, kind: ProbeErrorKind, times: usize) {
    for _ in 0..times {
        breaker.try_acquire().unwrap().record_failure(kind);
    }
}

#[tokio::test(start_paused = true)]
async fn test_opens_after_threshold_and_recovers_after_timeout() {
    let breaker = default_breaker();

    fail(&breaker, ProbeErrorKind::Transport, 4);
    assert_eq!(breaker.state(), CircuitState::Closed);
    fail(&breaker, ProbeErrorKind::Transport, 1);
    assert_eq!(breaker.state(), CircuitState::Open);

    let rejected = breaker.try_acquire().unwrap_err();
    assert_eq!(rejected.kind, ProbeErrorKind::CircuitOpen);

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(breaker.state(), CircuitState::HalfOpen);

    let trial = breaker.try_acquire().unwrap();
    assert!(trial.is_trial());
    trial.record_success();

    assert_eq!(breaker.state(), CircuitState::Closed);
    assert_eq!(breaker.snapshot().failure_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_stays_open_until_timeout_elapses() {
    let breaker = default_breaker();
    fail(&breaker, ProbeErrorKind::ServerError, 5);

    tokio::time::advance(Duration::from_secs(59)).await;
    assert_eq!(breaker.state(), CircuitState::Open);
    assert!(breaker.try_acquire().is_err());
    assert_eq!(breaker.metrics().rejected_requests, 1);
}

#[tokio::test(start_paused = true)]
async fn test_trial_failure_reopens_and_restarts_timeout() {
    let breaker = default_breaker();
    fail(&breaker, ProbeErrorKind::Timeout, 5);
    tokio::time::advance(Duration::from_secs(61)).await;

    breaker
        .try_acquire()
        .unwrap()
        .record_failure(ProbeErrorKind::Transport);
    assert_eq!(breaker.state(), CircuitState::Open);

    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(breaker.state(), CircuitState::Open);

    tokio::time::advance(Duration::from_secs(31)).await;
    assert_eq!(breaker.state(), CircuitState::HalfOpen);
    assert_eq!(breaker.metrics().circuit_opened_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_half_open_trial_is_exclusive() {
    let breaker = default_breaker();
    fail(&breaker, ProbeErrorKind::Transport, 5);
    tokio::time::advance(Duration::from_secs(61)).await;

    let trial = breaker.try_acquire().unwrap();
    for _ in 0..10 {
        let rejected = breaker.try_acquire().unwrap_err();
        assert_eq!(rejected.kind, ProbeErrorKind::CircuitOpen);
    }

    // an abandoned trial frees the slot without a verdict
    drop(trial);
    assert_eq!(breaker.state(), CircuitState::HalfOpen);
    let next = breaker.try_acquire().unwrap();
    assert!(next.is_trial());
}

#[tokio::test]
async fn test_concurrent_callers_get_one_trial() {
    let breaker = breaker(CircuitBreakerConfig::new(1, Duration::ZERO));
    fail(&breaker, ProbeErrorKind::Transport, 1);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let breaker = Arc::clone(&breaker);
            std::thread::spawn(move || breaker.try_acquire().ok().map(|permit| {
                let trial = permit.is_trial();
                std::mem::forget(permit);
                trial
            }))
        })
        .collect();
    let admitted: Vec<bool> = handles
        .into_iter()
        .filter_map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(admitted, vec![true]);
}

#[tokio::test(start_paused = true)]
async fn test_success_in_closed_clears_failures() {
    let breaker = default_breaker();
    fail(&breaker, ProbeErrorKind::Transport, 4);
    breaker.try_acquire().unwrap().record_success();
    fail(&breaker, ProbeErrorKind::Transport, 4);
    assert_eq!(breaker.state(), CircuitState::Closed);
    assert_eq!(breaker.snapshot().failure_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_failures_outside_window_are_forgotten() {
    let breaker = breaker(
        CircuitBreakerConfig::new(5, Duration::from_secs(60))
            .with_failure_window(Duration::from_secs(10)),
    );
    fail(&breaker, ProbeErrorKind::Transport, 4);
    tokio::time::advance(Duration::from_secs(11)).await;
    fail(&breaker, ProbeErrorKind::Transport, 1);
    assert_eq!(breaker.state(), CircuitState::Closed);
    assert_eq!(breaker.snapshot().failure_count, 1);
}

#[tokio::test]
async fn test_auth_errors_not_counted_by_default() {
    let breaker = default_breaker();
    fail(&breaker, ProbeErrorKind::AuthError, 20);
    fail(&breaker, ProbeErrorKind::NotFound, 20);
    fail(&breaker, ProbeErrorKind::InvalidRequest, 20);
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_auth_errors_counted_when_configured() {
    let policy = CircuitFailurePolicy {
        count_auth_errors: true,
        ..CircuitFailurePolicy::default()
    };
    let breaker = breaker(
        CircuitBreakerConfig::new(5, Duration::from_secs(60)).with_failure_policy(policy),
    );
    fail(&breaker, ProbeErrorKind::AuthError, 5);
    assert_eq!(breaker.state(), CircuitState::Open);
}

#[tokio::test]
async fn test_rate_limited_counted_unless_excluded() {
    let counting = default_breaker();
    fail(&counting, ProbeErrorKind::RateLimited, 5);
    assert_eq!(counting.state(), CircuitState::Open);

    let policy = CircuitFailurePolicy {
        count_rate_limited: false,
        ..CircuitFailurePolicy::default()
    };
    let lenient = breaker(
        CircuitBreakerConfig::new(5, Duration::from_secs(60)).with_failure_policy(policy),
    );
    fail(&lenient, ProbeErrorKind::RateLimited, 5);
    assert_eq!(lenient.state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_late_success_does_not_close_open_circuit() {
    let breaker = default_breaker();
    let in_flight = breaker.try_acquire().unwrap();
    fail(&breaker, ProbeErrorKind::Transport, 5);
    in_flight.record_success();
    assert_eq!(breaker.state(), CircuitState::Open);
}

#[tokio::test]
async fn test_reset_closes_circuit() {
    let breaker = default_breaker();
    fail(&breaker, ProbeErrorKind::Transport, 5);
    breaker.reset();
    assert_eq!(breaker.state(), CircuitState::Closed);
    assert!(breaker.try_acquire().is_ok());
}

#[tokio::test]
async fn test_registry_creates_breakers_lazily() {
    let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig::new(2, Duration::from_secs(60)));
    assert_eq!(registry.state("unknown"), CircuitState::Closed);

    let id = ProviderId::new("groq");
    let first = registry.breaker(&id);
    let second = registry.breaker(&id);
    assert!(Arc::ptr_eq(&first, &second));

    fail(&first, ProbeErrorKind::Transport, 2);
    assert_eq!(registry.state("groq"), CircuitState::Open);
    assert_eq!(registry.state("other"), CircuitState::Closed);

    registry.breaker(&ProviderId::new("anthropic"));
    let ids: Vec<_> = registry
        .snapshots()
        .into_iter()
        .map(|s| s.provider_id.to_string())
        .collect();
    assert_eq!(ids, vec!["anthropic", "groq"]);
}
