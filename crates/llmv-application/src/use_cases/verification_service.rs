//! Verification Service Use Case
//!
//! Runs existence, responsiveness and feature probes for many
//! (provider, model) targets under a fixed-size worker pool. Every probe
//! attempt passes through the provider's rate limiter and circuit breaker,
//! is bounded by a deadline, and is retried according to the
//! [`RetryPolicy`]. Each outcome is reported back to the breaker and the
//! latency tracker whether it succeeded or not.
//!
//! The service always produces exactly one [`VerificationResult`] per
//! input target. Provider-side failures end up inside the result; only
//! contract violations are returned as `Err`.

use crate::domain_services::policy::VerificationPolicy;
use crate::domain_services::scoring::ScoringEngine;
use crate::domain_services::verification::VerificationServiceInterface;
use crate::registry::ProviderRegistry;
use crate::resilience::{CircuitBreakerRegistry, RateLimiterRegistry, RetryPolicy};
use crate::routing::LatencyTracker;
use crate::telemetry;
use async_trait::async_trait;
use llmv_domain::constants::PROVIDER_REQUEST_TIMEOUT_SECS;
use llmv_domain::error::{Error, Result};
use llmv_domain::{
    Capability, CircuitState, ModelMetadata, ModelMetadataProvider, ModelRef, ProbeError,
    ProbeErrorKind, ProbeExecutor, ProbeKind, ProbeOutcome, Provider, ScoreWeights,
    VerificationResult, VerificationResultRepository, VerificationStatus,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Per-run verification settings
#[derive(Debug, Clone)]
pub struct VerificationSettings {
    /// Feature probes run after a successful existence probe
    pub features: Vec<Capability>,
    /// Upper bound of a single probe attempt
    pub probe_timeout: Duration,
    /// Decides the terminal status of reachable targets
    pub policy: VerificationPolicy,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            features: Capability::default_probe_set(),
            probe_timeout: Duration::from_secs(PROVIDER_REQUEST_TIMEOUT_SECS),
            policy: VerificationPolicy::relaxed(),
        }
    }
}

/// Scoring applied to every responsive result
#[derive(Clone)]
pub struct InlineScoring {
    pub engine: ScoringEngine,
    pub catalog: Arc<dyn ModelMetadataProvider>,
    pub weights: ScoreWeights,
}

/// Result of one retried probe
struct ProbeRun {
    outcome: ProbeOutcome,
    cancelled: bool,
}

/// Verification service implementation - the verification orchestrator
#[derive(Clone)]
pub struct VerificationServiceImpl {
    registry: Arc<ProviderRegistry>,
    executor: Arc<dyn ProbeExecutor>,
    breakers: Arc<CircuitBreakerRegistry>,
    limiters: Arc<RateLimiterRegistry>,
    latency: Arc<LatencyTracker>,
    retry: RetryPolicy,
    settings: VerificationSettings,
    repository: Option<Arc<dyn VerificationResultRepository>>,
    scoring: Option<InlineScoring>,
}

impl VerificationServiceImpl {
    /// Create a verification service with injected dependencies
    pub fn new(
        registry: Arc<ProviderRegistry>,
        executor: Arc<dyn ProbeExecutor>,
        breakers: Arc<CircuitBreakerRegistry>,
        latency: Arc<LatencyTracker>,
    ) -> Self {
        Self {
            registry,
            executor,
            breakers,
            limiters: Arc::new(RateLimiterRegistry::new()),
            latency,
            retry: RetryPolicy::default(),
            settings: VerificationSettings::default(),
            repository: None,
            scoring: None,
        }
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the run settings
    pub fn with_settings(mut self, settings: VerificationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Share rate limiters with other components
    pub fn with_rate_limiters(mut self, limiters: Arc<RateLimiterRegistry>) -> Self {
        self.limiters = limiters;
        self
    }

    /// Persist every finished result
    pub fn with_repository(mut self, repository: Arc<dyn VerificationResultRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Score every responsive result
    pub fn with_scoring(
        mut self,
        engine: ScoringEngine,
        catalog: Arc<dyn ModelMetadataProvider>,
        weights: ScoreWeights,
    ) -> Result<Self> {
        weights.validate()?;
        self.scoring = Some(InlineScoring {
            engine,
            catalog,
            weights,
        });
        Ok(self)
    }

    /// Provider registry
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Circuit breakers fed by this service
    pub fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    /// Latency history fed by this service
    pub fn latency(&self) -> &Arc<LatencyTracker> {
        &self.latency
    }

    /// Active settings
    pub fn settings(&self) -> &VerificationSettings {
        &self.settings
    }

    /// Worker loop: pull targets until the queue drains or the run is cancelled
    async fn run_worker(
        self,
        queue: Arc<Mutex<VecDeque<(usize, ModelRef)>>>,
        slots: Arc<Mutex<Vec<Option<VerificationResult>>>>,
        cancel: CancellationToken,
    ) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            let next = queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            let Some((index, target)) = next else {
                break;
            };
            let result = self.verify_target(target, &cancel).await;
            if let Some(slot) = slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_mut(index)
            {
                *slot = Some(result);
            }
        }
    }

    /// Verify one target and hand the result to telemetry and persistence
    #[instrument(skip_all, fields(model = %target))]
    async fn verify_target(&self, target: ModelRef, cancel: &CancellationToken) -> VerificationResult {
        let mut result = VerificationResult::pending(target);
        self.run_probe_sequence(&mut result, cancel).await;
        self.complete(&result).await;
        result
    }

    async fn run_probe_sequence(&self, result: &mut VerificationResult, cancel: &CancellationToken) {
        let Some(provider) = self
            .registry
            .get(result.target.provider_id.as_str())
            .cloned()
        else {
            let error = ProbeError::invalid_request(format!(
                "provider {} is not registered",
                result.target.provider_id
            ));
            result.finish_with_error(VerificationStatus::Error, error);
            return;
        };

        if cancel.is_cancelled() {
            result.finish_with_error(VerificationStatus::Cancelled, ProbeError::cancelled());
            return;
        }
        if self.breakers.state(provider.id.as_str()) == CircuitState::Open {
            debug!(provider = %provider.id, "circuit open, skipping target");
            result.finish_with_error(VerificationStatus::Error, ProbeError::circuit_open(&provider.id));
            return;
        }

        // Existence gates everything else
        let existence = self
            .run_probe(&provider, result, ProbeKind::Existence, cancel)
            .await;
        if existence.cancelled {
            result.finish_with_error(VerificationStatus::Cancelled, ProbeError::cancelled());
            return;
        }
        if existence.outcome.success {
            result.model_exists = Some(true);
        } else {
            let error = existence
                .outcome
                .error
                .unwrap_or_else(|| ProbeError::malformed("existence probe failed"));
            let status = if error.kind == ProbeErrorKind::NotFound {
                result.model_exists = Some(false);
                VerificationStatus::Failed
            } else {
                Self::status_for(error.kind)
            };
            result.finish_with_error(status, error);
            return;
        }

        let responsiveness = self
            .run_probe(&provider, result, ProbeKind::Responsiveness, cancel)
            .await;
        if responsiveness.cancelled {
            result.finish_with_error(VerificationStatus::Cancelled, ProbeError::cancelled());
            return;
        }
        if responsiveness.outcome.success {
            result.responsive = Some(true);
            result.set_latency(responsiveness.outcome.latency);
        } else {
            result.responsive = Some(false);
            result.error = responsiveness.outcome.error;
        }

        // Features are independent; one failing never stops the next
        for capability in &self.settings.features {
            if cancel.is_cancelled() {
                result.finish_with_error(VerificationStatus::Cancelled, ProbeError::cancelled());
                return;
            }
            let run = self
                .run_probe(&provider, result, ProbeKind::Feature(capability.clone()), cancel)
                .await;
            if run.cancelled {
                result.finish_with_error(VerificationStatus::Cancelled, ProbeError::cancelled());
                return;
            }
            // Short-circuited probes never reached the provider
            if run.outcome.error_kind() == Some(ProbeErrorKind::CircuitOpen) {
                continue;
            }
            result
                .capabilities
                .record(capability.clone(), run.outcome.success);
        }

        if result.responsive == Some(true) {
            self.attach_score(result);
            let status = self.settings.policy.evaluate(result);
            result.finish(status);
        } else {
            let error = result
                .error
                .clone()
                .unwrap_or_else(|| ProbeError::malformed("responsiveness probe failed"));
            result.finish_with_error(Self::status_for(error.kind), error);
        }
    }

    fn attach_score(&self, result: &mut VerificationResult) {
        let Some(scoring) = &self.scoring else {
            return;
        };
        let metadata = scoring
            .catalog
            .metadata(result.model_id())
            .unwrap_or_else(|| ModelMetadata::unknown(result.model_id()));
        match scoring.engine.score(result, &metadata, &scoring.weights) {
            Ok(score) => result.score = Some(score),
            Err(e) => warn!(model = %result.target, error = %e, "Failed to score verification result"),
        }
    }

    /// Terminal status for a target that stopped on a classified failure
    fn status_for(kind: ProbeErrorKind) -> VerificationStatus {
        match kind {
            ProbeErrorKind::Transport | ProbeErrorKind::CircuitOpen | ProbeErrorKind::AuthError => {
                VerificationStatus::Error
            }
            ProbeErrorKind::Cancelled => VerificationStatus::Cancelled,
            _ => VerificationStatus::Failed,
        }
    }

    async fn complete(&self, result: &VerificationResult) {
        telemetry::record_verification_result(result.status);
        debug!(
            model = %result.target,
            status = result.status.as_str(),
            attempts = result.probe_attempts,
            "verification finished"
        );
        // A cancelled marker would hide the last real verification from `latest`
        if result.status == VerificationStatus::Cancelled {
            return;
        }
        if let Some(repository) = &self.repository
            && let Err(e) = repository.save(result).await
        {
            warn!(model = %result.target, error = %e, "Failed to persist verification result");
        }
    }

    /// Run one probe kind through the retry policy
    async fn run_probe(
        &self,
        provider: &Provider,
        result: &mut VerificationResult,
        kind: ProbeKind,
        cancel: &CancellationToken,
    ) -> ProbeRun {
        let target = result.target.clone();
        if cancel.is_cancelled() {
            return ProbeRun {
                outcome: ProbeOutcome::failed(target, kind, Duration::ZERO, ProbeError::cancelled()),
                cancelled: true,
            };
        }
        let retried = self
            .retry
            .run(cancel, |attempt| {
                let target = target.clone();
                let kind = kind.clone();
                async move {
                    let outcome = self.execute_probe(provider, &target, &kind, cancel).await;
                    debug!(attempt, kind = %kind, success = outcome.success, "probe attempt");
                    if outcome.success { Ok(outcome) } else { Err(outcome) }
                }
            })
            .await;
        result.probe_attempts += retried.attempts;
        let outcome = match retried.result {
            Ok(outcome) | Err(outcome) => outcome,
        };
        let cancelled =
            retried.cancelled || outcome.error_kind() == Some(ProbeErrorKind::Cancelled);
        ProbeRun { outcome, cancelled }
    }

    /// One attempt: rate limit, breaker permit, bounded executor call, feedback
    async fn execute_probe(
        &self,
        provider: &Provider,
        target: &ModelRef,
        kind: &ProbeKind,
        cancel: &CancellationToken,
    ) -> ProbeOutcome {
        if let Err(error) = self.limiters.acquire(provider, cancel).await {
            return ProbeOutcome::failed(target.clone(), kind.clone(), Duration::ZERO, error);
        }

        let breaker = self.breakers.breaker(&provider.id);
        let permit = match breaker.try_acquire() {
            Ok(permit) => permit,
            Err(error) => {
                let outcome =
                    ProbeOutcome::failed(target.clone(), kind.clone(), Duration::ZERO, error);
                telemetry::record_probe_attempt(&provider.id, &outcome);
                return outcome;
            }
        };

        let deadline = self.settings.probe_timeout.min(provider.timeouts.request);
        let started = Instant::now();
        let call = self.executor.probe(provider, target, kind, deadline);
        let outcome = match tokio::time::timeout(deadline, call).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => ProbeOutcome::failed(
                target.clone(),
                kind.clone(),
                started.elapsed(),
                ProbeError::invalid_request(e.to_string()),
            ),
            Err(_) => ProbeOutcome::failed(
                target.clone(),
                kind.clone(),
                started.elapsed(),
                ProbeError::timeout(format!("no response within {}ms", deadline.as_millis())),
            ),
        };

        permit.record(&outcome);
        self.latency.record_outcome(&outcome);
        telemetry::record_probe_attempt(&provider.id, &outcome);
        outcome
    }
}

#[async_trait]
impl VerificationServiceInterface for VerificationServiceImpl {
    #[instrument(skip_all, fields(targets = targets.len(), concurrency = concurrency))]
    async fn verify_all(
        &self,
        targets: Vec<ModelRef>,
        concurrency: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<VerificationResult>> {
        if concurrency == 0 {
            return Err(Error::invalid_argument("concurrency must be at least 1"));
        }
        for target in &targets {
            target.validate()?;
        }
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let queue = Arc::new(Mutex::new(
            targets.iter().cloned().enumerate().collect::<VecDeque<_>>(),
        ));
        let slots = Arc::new(Mutex::new(vec![None; targets.len()]));

        let mut workers = JoinSet::new();
        for _ in 0..concurrency {
            workers.spawn(self.clone().run_worker(
                Arc::clone(&queue),
                Arc::clone(&slots),
                cancel.clone(),
            ));
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Verification worker terminated abnormally");
            }
        }

        let slots = std::mem::take(&mut *slots.lock().unwrap_or_else(PoisonError::into_inner));
        let cancelled = cancel.is_cancelled();
        let results: Vec<VerificationResult> = slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| {
                    let marker = if cancelled {
                        VerificationResult::cancelled(target)
                    } else {
                        let mut result = VerificationResult::pending(target);
                        result.finish_with_error(
                            VerificationStatus::Error,
                            ProbeError::new(ProbeErrorKind::Cancelled, "verification worker aborted"),
                        );
                        result
                    };
                    telemetry::record_verification_result(marker.status);
                    marker
                })
            })
            .collect();

        let verified = results.iter().filter(|r| r.is_verified()).count();
        let cancelled_count = results
            .iter()
            .filter(|r| r.status == VerificationStatus::Cancelled)
            .count();
        info!(
            total = results.len(),
            verified,
            cancelled = cancelled_count,
            "Verification run finished"
        );
        Ok(results)
    }

    async fn verify_one(
        &self,
        target: ModelRef,
        cancel: CancellationToken,
    ) -> Result<VerificationResult> {
        target.validate()?;
        Ok(self.verify_target(target, &cancel).await)
    }

    async fn probe_once(
        &self,
        target: &ModelRef,
        kind: &ProbeKind,
        cancel: &CancellationToken,
    ) -> Result<ProbeOutcome> {
        target.validate()?;
        let provider = self
            .registry
            .get(target.provider_id.as_str())
            .cloned()
            .ok_or_else(|| Error::not_found(format!("provider {}", target.provider_id)))?;
        Ok(self.execute_probe(&provider, target, kind, cancel).await)
    }

    #[instrument(skip_all, fields(provider = provider_id))]
    async fn discover_targets(
        &self,
        provider_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModelRef>> {
        let provider = self
            .registry
            .get(provider_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("provider {provider_id}")))?;
        self.limiters.acquire(&provider, cancel).await?;

        let permit = self.breakers.breaker(&provider.id).try_acquire()?;
        let deadline = self.settings.probe_timeout.min(provider.timeouts.request);
        let listed = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ProbeError::cancelled().into()),
            listed = self.executor.list_models(&provider, deadline) => listed,
        };
        let models = match listed {
            Ok(models) => {
                permit.record_success();
                models
            }
            Err(Error::Probe(error)) => {
                permit.record_failure(error.kind);
                return Err(Error::Probe(error));
            }
            Err(e) => return Err(e),
        };

        let mut targets: Vec<ModelRef> = models
            .into_iter()
            .filter(|model| !model.trim().is_empty())
            .map(|model| ModelRef::new(provider.id.clone(), model))
            .collect();
        targets.sort();
        targets.dedup();
        info!(models = targets.len(), "Discovered provider models");
        Ok(targets)
    }
}
