//! Retry Policy
//!
//! Exponential backoff with jitter around any operation whose failures
//! carry a [`ProbeError`] classification. Only retryable kinds (transport,
//! timeout, 429, 5xx) are retried; everything else surfaces on the first
//! attempt. Backoff sleeps end immediately when the run is cancelled.

use llmv_domain::constants::{
    RETRY_INITIAL_BACKOFF_MS, RETRY_JITTER, RETRY_MAX_ATTEMPTS, RETRY_MAX_BACKOFF_MS,
    RETRY_RATE_LIMIT_MULTIPLIER,
};
use llmv_domain::error::{Error, Result};
use llmv_domain::{ProbeError, ProbeErrorKind, ProbeOutcome};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Failure types the retry policy can classify
pub trait Retryable {
    /// The classified failure, if any
    fn probe_error(&self) -> Option<&ProbeError>;
}

impl Retryable for ProbeError {
    fn probe_error(&self) -> Option<&ProbeError> {
        Some(self)
    }
}

impl Retryable for ProbeOutcome {
    fn probe_error(&self) -> Option<&ProbeError> {
        self.error.as_ref()
    }
}

/// Result of a retried operation
#[derive(Debug)]
pub struct Retried<T, E> {
    /// Success value, or the last failure unchanged
    pub result: std::result::Result<T, E>,
    /// Attempts made, first try included
    pub attempts: u32,
    /// Whether a backoff sleep was cut short by cancellation
    pub cancelled: bool,
}

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total tries, first attempt included
    pub max_attempts: u32,
    /// Backoff after the first failed attempt
    pub initial_backoff: Duration,
    /// Backoff ceiling
    pub max_backoff: Duration,
    /// Random spread applied to each backoff, as a ± fraction
    pub jitter: f64,
    /// Extra backoff factor for 429 responses without `Retry-After`
    pub rate_limit_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(RETRY_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(RETRY_MAX_BACKOFF_MS),
            jitter: RETRY_JITTER,
            rate_limit_multiplier: RETRY_RATE_LIMIT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Create a policy without jitter
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
            jitter: 0.0,
            rate_limit_multiplier: RETRY_RATE_LIMIT_MULTIPLIER,
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Set the jitter fraction
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Set the rate-limit backoff multiplier
    #[must_use]
    pub fn with_rate_limit_multiplier(mut self, multiplier: f64) -> Self {
        self.rate_limit_multiplier = multiplier;
        self
    }

    /// Reject unusable settings
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_argument("retry max_attempts must be at least 1"));
        }
        if self.initial_backoff > self.max_backoff {
            return Err(Error::invalid_argument(
                "retry initial_backoff must not exceed max_backoff",
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(Error::invalid_argument("retry jitter must be within [0, 1]"));
        }
        if !self.rate_limit_multiplier.is_finite() || self.rate_limit_multiplier < 1.0 {
            return Err(Error::invalid_argument(
                "retry rate_limit_multiplier must be at least 1.0",
            ));
        }
        Ok(())
    }

    /// Deterministic backoff after failed attempt `attempt` (1-based)
    ///
    /// `initial_backoff · 2^(attempt-1)`, capped at `max_backoff`.
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .checked_mul(1u32 << exponent)
            .map_or(self.max_backoff, |backoff| backoff.min(self.max_backoff))
    }

    /// Delay before the next attempt after `error` on attempt `attempt`
    ///
    /// Jitter spreads the computed backoff only; a `Retry-After` value is a
    /// floor applied afterwards. `max_backoff` caps both.
    pub fn delay_for(&self, attempt: u32, error: Option<&ProbeError>) -> Duration {
        let mut delay = self.base_backoff(attempt);
        let mut floor = Duration::ZERO;
        if let Some(error) = error.filter(|e| e.kind == ProbeErrorKind::RateLimited) {
            match error.retry_after() {
                Some(requested) => floor = requested,
                None => delay = delay.mul_f64(self.rate_limit_multiplier),
            }
        }
        self.apply_jitter(delay).max(floor).min(self.max_backoff)
    }

    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let factor = 1.0 + rand::rng().random_range(-self.jitter..=self.jitter);
        delay.mul_f64(factor.max(0.0))
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    ///
    /// `operation` receives the 1-based attempt number. The last failure is
    /// returned unchanged when attempts are exhausted.
    pub async fn run<T, E, F, Fut>(&self, cancel: &CancellationToken, mut operation: F) -> Retried<T, E>
    where
        E: Retryable,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match operation(attempt).await {
                Ok(value) => {
                    return Retried {
                        result: Ok(value),
                        attempts: attempt,
                        cancelled: false,
                    };
                }
                Err(error) => error,
            };

            let retryable = error.probe_error().is_some_and(ProbeError::is_retryable);
            if !retryable || attempt >= max_attempts {
                return Retried {
                    result: Err(error),
                    attempts: attempt,
                    cancelled: false,
                };
            }

            let delay = self.delay_for(attempt, error.probe_error());
            debug!(
                attempt,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                kind = ?error.probe_error().map(|e| e.kind),
                "retrying after classified failure"
            );
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Retried {
                        result: Err(error),
                        attempts: attempt,
                        cancelled: true,
                    };
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
