//! Circuit Breaker Module
//!
//! Per-provider state machine that short-circuits calls to providers that
//! are currently failing.
//!
//! ```text
//!            failures >= threshold (within window)
//!   Closed ─────────────────────────────────────────► Open
//!     ▲                                              │  ▲
//!     │ trial succeeds            open_timeout elapses │  │ trial fails
//!     │                                              ▼  │
//!     └──────────────────────────────────────────── HalfOpen
//! ```
//!
//! Each breaker guards its state with its own mutex, so transitions are
//! linearizable per provider while unrelated providers never contend.
//! Callers obtain a [`CircuitPermit`] before the network call and report
//! the outcome through it; a half-open trial permit is exclusive.

use crate::telemetry::record_circuit_transition;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use llmv_domain::constants::{
    CIRCUIT_BREAKER_FAILURE_THRESHOLD, CIRCUIT_BREAKER_FAILURE_WINDOW_SECS,
    CIRCUIT_BREAKER_OPEN_TIMEOUT_SECS,
};
use llmv_domain::{
    CircuitFailurePolicy, CircuitSnapshot, CircuitState, ProbeError, ProbeErrorKind, ProbeOutcome,
    ProviderId,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Circuit breaker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Number of failures inside the window that opens the circuit
    pub failure_threshold: u32,
    /// Rolling window in which failures are counted
    pub failure_window: Duration,
    /// Time to wait before admitting a trial request
    pub open_timeout: Duration,
    /// Which ambiguous failure kinds are counted
    pub failure_policy: CircuitFailurePolicy,
}

impl CircuitBreakerConfig {
    /// Create a configuration with explicit threshold and timeout
    pub fn new(failure_threshold: u32, open_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            open_timeout,
            ..Self::default()
        }
    }

    /// Set the rolling failure window
    #[must_use]
    pub fn with_failure_window(mut self, window: Duration) -> Self {
        self.failure_window = window;
        self
    }

    /// Set the failure classification policy
    #[must_use]
    pub fn with_failure_policy(mut self, policy: CircuitFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            failure_window: Duration::from_secs(CIRCUIT_BREAKER_FAILURE_WINDOW_SECS),
            open_timeout: Duration::from_secs(CIRCUIT_BREAKER_OPEN_TIMEOUT_SECS),
            failure_policy: CircuitFailurePolicy::default(),
        }
    }
}

/// Circuit breaker counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitBreakerMetrics {
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub rejected_requests: u64,
    pub circuit_opened_count: u32,
    pub circuit_closed_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Closed,
    Open { opened_at: Instant },
    HalfOpen { trial_in_flight: bool },
}

#[derive(Debug)]
struct BreakerState {
    phase: Phase,
    failures: VecDeque<Instant>,
    last_transition_at: Option<DateTime<Utc>>,
    metrics: CircuitBreakerMetrics,
}

/// How the breaker should read a finished call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Healthy,
    Failure,
    NoVerdict,
}

/// Circuit breaker for one provider
#[derive(Debug)]
pub struct CircuitBreaker {
    provider_id: ProviderId,
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Create a closed breaker
    pub fn new(provider_id: ProviderId, config: CircuitBreakerConfig) -> Self {
        Self {
            provider_id,
            config,
            state: Mutex::new(BreakerState {
                phase: Phase::Closed,
                failures: VecDeque::new(),
                last_transition_at: None,
                metrics: CircuitBreakerMetrics::default(),
            }),
        }
    }

    /// Provider guarded by this breaker
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Active configuration
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Effective state
    ///
    /// An open circuit whose timeout has elapsed reports `HalfOpen`: the
    /// next caller will be admitted as the trial.
    pub fn state(&self) -> CircuitState {
        let state = self.lock();
        self.effective_state(&state, Instant::now())
    }

    fn effective_state(&self, state: &BreakerState, now: Instant) -> CircuitState {
        match state.phase {
            Phase::Closed => CircuitState::Closed,
            Phase::Open { opened_at } if now.duration_since(opened_at) >= self.config.open_timeout => {
                CircuitState::HalfOpen
            }
            Phase::Open { .. } => CircuitState::Open,
            Phase::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    /// Read-only view of the circuit
    pub fn snapshot(&self) -> CircuitSnapshot {
        let state = self.lock();
        let now = Instant::now();
        let failure_count = state
            .failures
            .iter()
            .filter(|at| now.duration_since(**at) < self.config.failure_window)
            .count();
        CircuitSnapshot {
            provider_id: self.provider_id.clone(),
            state: self.effective_state(&state, now),
            failure_count: u32::try_from(failure_count).unwrap_or(u32::MAX),
            last_transition_at: state.last_transition_at,
        }
    }

    /// Counters since creation
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        self.lock().metrics.clone()
    }

    /// Ask to make a call
    ///
    /// Closed circuits always admit. An open circuit admits exactly one
    /// trial once `open_timeout` has elapsed; every other caller gets a
    /// [`ProbeErrorKind::CircuitOpen`] error and must not touch the network.
    pub fn try_acquire(self: &Arc<Self>) -> Result<CircuitPermit, ProbeError> {
        let mut state = self.lock();
        let now = Instant::now();
        match state.phase {
            Phase::Closed => Ok(CircuitPermit::new(Arc::clone(self), false)),
            Phase::Open { opened_at } if now.duration_since(opened_at) >= self.config.open_timeout => {
                self.transition(&mut state, Phase::HalfOpen {
                    trial_in_flight: true,
                });
                Ok(CircuitPermit::new(Arc::clone(self), true))
            }
            Phase::HalfOpen {
                trial_in_flight: false,
            } => {
                state.phase = Phase::HalfOpen {
                    trial_in_flight: true,
                };
                Ok(CircuitPermit::new(Arc::clone(self), true))
            }
            Phase::Open { .. } | Phase::HalfOpen { .. } => {
                state.metrics.rejected_requests += 1;
                Err(ProbeError::circuit_open(&self.provider_id))
            }
        }
    }

    /// Force the circuit closed and forget failures
    pub fn reset(&self) {
        let mut state = self.lock();
        state.failures.clear();
        if state.phase != Phase::Closed {
            self.transition(&mut state, Phase::Closed);
        }
    }

    fn verdict(&self, outcome: &ProbeOutcome) -> Verdict {
        match outcome.error_kind() {
            None => Verdict::Healthy,
            Some(kind) if kind.is_synthetic() => Verdict::NoVerdict,
            Some(kind) if kind.counts_as_circuit_failure(&self.config.failure_policy) => {
                Verdict::Failure
            }
            // the provider answered: it is reachable even if the request was refused
            Some(_) => Verdict::Healthy,
        }
    }

    fn settle(&self, trial: bool, verdict: Verdict) {
        let mut state = self.lock();
        let now = Instant::now();
        match (state.phase, verdict) {
            (_, Verdict::NoVerdict) => {
                if trial && matches!(state.phase, Phase::HalfOpen { .. }) {
                    state.phase = Phase::HalfOpen {
                        trial_in_flight: false,
                    };
                }
            }
            (Phase::Closed, Verdict::Healthy) => {
                state.metrics.successful_requests += 1;
                state.failures.clear();
            }
            (Phase::Closed, Verdict::Failure) => {
                state.metrics.failed_requests += 1;
                state.failures.push_back(now);
                let window = self.config.failure_window;
                while state
                    .failures
                    .front()
                    .is_some_and(|at| now.duration_since(*at) >= window)
                {
                    state.failures.pop_front();
                }
                if state.failures.len() >= self.config.failure_threshold as usize {
                    warn!(
                        provider = %self.provider_id,
                        failures = state.failures.len(),
                        "Circuit breaker {} transitioning to Open",
                        self.provider_id
                    );
                    self.transition(&mut state, Phase::Open { opened_at: now });
                }
            }
            (Phase::HalfOpen { .. }, Verdict::Healthy) if trial => {
                state.metrics.successful_requests += 1;
                state.failures.clear();
                info!(provider = %self.provider_id, "Circuit breaker {} transitioning to Closed", self.provider_id);
                self.transition(&mut state, Phase::Closed);
            }
            (Phase::HalfOpen { .. }, Verdict::Failure) if trial => {
                state.metrics.failed_requests += 1;
                warn!(
                    provider = %self.provider_id,
                    "Circuit breaker {} failing in Half-Open, transitioning back to Open",
                    self.provider_id
                );
                self.transition(&mut state, Phase::Open { opened_at: now });
            }
            // late results of calls admitted before the circuit opened
            (Phase::Open { .. } | Phase::HalfOpen { .. }, _) => {
                debug!(provider = %self.provider_id, ?verdict, "ignoring stale call result");
            }
        }
    }

    fn transition(&self, state: &mut BreakerState, to: Phase) {
        state.phase = to;
        state.last_transition_at = Some(Utc::now());
        let reported = match to {
            Phase::Closed => {
                state.metrics.circuit_closed_count += 1;
                CircuitState::Closed
            }
            Phase::Open { .. } => {
                state.metrics.circuit_opened_count += 1;
                CircuitState::Open
            }
            Phase::HalfOpen { .. } => {
                info!(provider = %self.provider_id, "Circuit breaker {} transitioning to Half-Open", self.provider_id);
                CircuitState::HalfOpen
            }
        };
        record_circuit_transition(&self.provider_id, reported);
    }
}

/// Admission to make one call through a breaker
///
/// Report the result with [`CircuitPermit::record`]. Dropping an unreported
/// permit gives no verdict; a dropped trial frees the half-open slot.
#[must_use = "report the call result through the permit"]
#[derive(Debug)]
pub struct CircuitPermit {
    breaker: Arc<CircuitBreaker>,
    trial: bool,
    settled: bool,
}

impl CircuitPermit {
    fn new(breaker: Arc<CircuitBreaker>, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    /// Whether this permit is the exclusive half-open trial
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Report a probe outcome
    pub fn record(mut self, outcome: &ProbeOutcome) {
        let verdict = self.breaker.verdict(outcome);
        self.settled = true;
        self.breaker.settle(self.trial, verdict);
    }

    /// Report a success
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.settle(self.trial, Verdict::Healthy);
    }

    /// Report a failure of the given kind
    pub fn record_failure(mut self, kind: ProbeErrorKind) {
        let verdict = if kind.is_synthetic() {
            Verdict::NoVerdict
        } else if kind.counts_as_circuit_failure(&self.breaker.config.failure_policy) {
            Verdict::Failure
        } else {
            Verdict::Healthy
        };
        self.settled = true;
        self.breaker.settle(self.trial, verdict);
    }
}

impl Drop for CircuitPermit {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.settle(self.trial, Verdict::NoVerdict);
        }
    }
}

/// Breakers for every provider, created on first use
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: DashMap<ProviderId, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    /// Create a registry applying `config` to new breakers
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// Default configuration for new breakers
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Breaker of a provider, created closed on first use
    pub fn breaker(&self, provider_id: &ProviderId) -> Arc<CircuitBreaker> {
        if let Some(breaker) = self.breakers.get(provider_id) {
            return Arc::clone(breaker.value());
        }
        let entry = self
            .breakers
            .entry(provider_id.clone())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(provider_id.clone(), self.config)));
        Arc::clone(entry.value())
    }

    /// Install a breaker with a provider-specific configuration
    pub fn configure(&self, provider_id: &ProviderId, config: CircuitBreakerConfig) {
        self.breakers.insert(
            provider_id.clone(),
            Arc::new(CircuitBreaker::new(provider_id.clone(), config)),
        );
    }

    /// Effective state; providers never seen are closed
    pub fn state(&self, provider_id: &str) -> CircuitState {
        self.breakers
            .get(provider_id)
            .map_or(CircuitState::Closed, |breaker| breaker.state())
    }

    /// Snapshots of every known breaker
    pub fn snapshots(&self) -> Vec<CircuitSnapshot> {
        let mut snapshots: Vec<_> = self
            .breakers
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
        snapshots
    }
}
