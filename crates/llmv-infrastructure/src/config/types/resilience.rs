//! Circuit breaker and retry configuration

use llmv_application::{CircuitBreakerConfig, RetryPolicy};
use llmv_domain::CircuitFailurePolicy;
use llmv_domain::constants::{
    CIRCUIT_BREAKER_FAILURE_THRESHOLD, CIRCUIT_BREAKER_FAILURE_WINDOW_SECS,
    CIRCUIT_BREAKER_OPEN_TIMEOUT_SECS, RETRY_INITIAL_BACKOFF_MS, RETRY_JITTER,
    RETRY_MAX_ATTEMPTS, RETRY_MAX_BACKOFF_MS, RETRY_RATE_LIMIT_MULTIPLIER,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resilience configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Circuit breaker settings, shared by every provider
    pub circuit_breaker: CircuitBreakerSettings,
    /// Retry settings
    pub retry: RetrySettings,
}

/// Circuit breaker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerSettings {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Failures older than this no longer count
    pub failure_window_secs: u64,
    /// Time spent Open before a trial is admitted
    pub open_timeout_secs: u64,
    /// Count 401/403 as failures
    pub count_auth_errors: bool,
    /// Count 429 as failures
    pub count_rate_limited: bool,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        let policy = CircuitFailurePolicy::default();
        Self {
            failure_threshold: CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            failure_window_secs: CIRCUIT_BREAKER_FAILURE_WINDOW_SECS,
            open_timeout_secs: CIRCUIT_BREAKER_OPEN_TIMEOUT_SECS,
            count_auth_errors: policy.count_auth_errors,
            count_rate_limited: policy.count_rate_limited,
        }
    }
}

impl CircuitBreakerSettings {
    /// Engine configuration
    pub fn to_breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig::new(self.failure_threshold, Duration::from_secs(self.open_timeout_secs))
            .with_failure_window(Duration::from_secs(self.failure_window_secs))
            .with_failure_policy(CircuitFailurePolicy {
                count_auth_errors: self.count_auth_errors,
                count_rate_limited: self.count_rate_limited,
            })
    }
}

/// Retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts per probe, first attempt included
    pub max_attempts: u32,
    /// Backoff before the second attempt
    pub initial_backoff_ms: u64,
    /// Upper bound of any backoff
    pub max_backoff_ms: u64,
    /// Relative jitter in [0, 1]
    pub jitter: f64,
    /// Backoff multiplier for 429s without `Retry-After`
    pub rate_limit_backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            initial_backoff_ms: RETRY_INITIAL_BACKOFF_MS,
            max_backoff_ms: RETRY_MAX_BACKOFF_MS,
            jitter: RETRY_JITTER,
            rate_limit_backoff_multiplier: RETRY_RATE_LIMIT_MULTIPLIER,
        }
    }
}

impl RetrySettings {
    /// Engine retry policy
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
        .with_jitter(self.jitter)
        .with_rate_limit_multiplier(self.rate_limit_backoff_multiplier)
    }
}
