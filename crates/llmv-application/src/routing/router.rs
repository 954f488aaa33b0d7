//! Weighted provider router
//!
//! Picks the preferred provider among functionally equivalent candidates.
//! The router only reads circuit state and latency history; it never
//! mutates either.

use super::latency::LatencyTracker;
use crate::registry::ProviderRegistry;
use crate::resilience::CircuitBreakerRegistry;
use llmv_domain::constants::{ROUTER_HALF_OPEN_FACTOR, ROUTER_REFERENCE_LATENCY_MS};
use llmv_domain::error::{Error, Result};
use llmv_domain::{CircuitState, ModelRef, ProviderId};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Router tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterConfig {
    /// Availability factor applied to half-open providers
    pub half_open_factor: f64,
    /// p95 latency at which the latency factor is exactly 1.0
    pub reference_latency: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            half_open_factor: ROUTER_HALF_OPEN_FACTOR,
            reference_latency: Duration::from_millis(ROUTER_REFERENCE_LATENCY_MS),
        }
    }
}

/// One candidate with the inputs of its effective score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProvider {
    pub provider_id: ProviderId,
    /// weight × availability × latency factor
    pub effective_score: f64,
    pub weight: f64,
    pub availability: f64,
    pub latency_factor: f64,
    pub circuit: CircuitState,
    /// p95 of the latency window, `None` without history
    pub p95_ms: Option<u64>,
    /// Successful samples currently in the latency window
    pub recent_successes: usize,
    /// Position in the provider registry
    pub declaration_index: usize,
}

/// Provider selection interface
pub trait ProviderRouter: Send + Sync {
    /// Best available candidate
    fn select_provider(&self, candidates: &[ProviderId]) -> Result<ProviderId>;

    /// Every candidate ordered best first
    fn rank(&self, candidates: &[ProviderId]) -> Result<Vec<RankedProvider>>;

    /// Providers serving `model_id` among `targets`, ordered best first
    fn rank_for_model(&self, model_id: &str, targets: &[ModelRef]) -> Result<Vec<RankedProvider>> {
        self.rank(&candidates_for_model(model_id, targets)?)
    }

    /// Best available provider serving `model_id`
    fn select_for_model(&self, model_id: &str, targets: &[ModelRef]) -> Result<ProviderId> {
        self.select_provider(&candidates_for_model(model_id, targets)?)
    }
}

/// Providers offering `model_id` in `targets`, first occurrence wins
pub fn candidates_for_model(model_id: &str, targets: &[ModelRef]) -> Result<Vec<ProviderId>> {
    let mut candidates: Vec<ProviderId> = Vec::new();
    for target in targets.iter().filter(|target| target.model_id == model_id) {
        if !candidates.contains(&target.provider_id) {
            candidates.push(target.provider_id.clone());
        }
    }
    if candidates.is_empty() {
        return Err(Error::not_found(format!("no configured provider serves model '{model_id}'")));
    }
    Ok(candidates)
}

/// Router combining static weights, circuit state and p95 latency
pub struct WeightedRouter {
    registry: Arc<ProviderRegistry>,
    breakers: Arc<CircuitBreakerRegistry>,
    latency: Arc<LatencyTracker>,
    config: RouterConfig,
}

impl WeightedRouter {
    /// Create a router over shared health state
    pub fn new(
        registry: Arc<ProviderRegistry>,
        breakers: Arc<CircuitBreakerRegistry>,
        latency: Arc<LatencyTracker>,
        config: RouterConfig,
    ) -> Self {
        Self {
            registry,
            breakers,
            latency,
            config,
        }
    }

    fn availability(&self, circuit: CircuitState) -> f64 {
        match circuit {
            CircuitState::Closed => 1.0,
            CircuitState::HalfOpen => self.config.half_open_factor,
            CircuitState::Open => 0.0,
        }
    }

    /// 1.0 at the reference p95, approaching 2.0 for very fast providers and
    /// 0.0 for very slow ones; neutral when there is no history
    fn latency_factor(&self, p95: Option<Duration>) -> f64 {
        let Some(p95) = p95 else {
            return 1.0;
        };
        let reference = self.config.reference_latency.as_secs_f64();
        if reference <= 0.0 {
            return 1.0;
        }
        2.0 * reference / (reference + p95.as_secs_f64())
    }

    fn compare(a: &RankedProvider, b: &RankedProvider) -> Ordering {
        b.effective_score
            .total_cmp(&a.effective_score)
            .then_with(|| b.recent_successes.cmp(&a.recent_successes))
            .then_with(|| a.declaration_index.cmp(&b.declaration_index))
    }
}

impl ProviderRouter for WeightedRouter {
    fn select_provider(&self, candidates: &[ProviderId]) -> Result<ProviderId> {
        let ranked = self.rank(candidates)?;
        let best = ranked
            .into_iter()
            .find(|candidate| candidate.effective_score > 0.0)
            .ok_or_else(|| {
                Error::no_available_provider(
                    "every candidate has an open circuit or zero weight",
                )
            })?;
        debug!(
            provider = %best.provider_id,
            score = best.effective_score,
            "selected provider"
        );
        Ok(best.provider_id)
    }

    fn rank(&self, candidates: &[ProviderId]) -> Result<Vec<RankedProvider>> {
        if candidates.is_empty() {
            return Err(Error::invalid_argument("candidate list must not be empty"));
        }
        let mut ranked = Vec::with_capacity(candidates.len());
        for provider_id in candidates {
            let provider = self
                .registry
                .get(provider_id.as_str())
                .ok_or_else(|| Error::not_found(format!("provider '{provider_id}'")))?;
            let snapshot = self.latency.snapshot(provider_id);
            let circuit = self.breakers.state(provider_id.as_str());
            let availability = self.availability(circuit);
            let latency_factor = self.latency_factor(snapshot.p95);
            ranked.push(RankedProvider {
                provider_id: provider_id.clone(),
                effective_score: provider.weight * availability * latency_factor,
                weight: provider.weight,
                availability,
                latency_factor,
                circuit,
                p95_ms: snapshot.p95.map(|p95| u64::try_from(p95.as_millis()).unwrap_or(u64::MAX)),
                recent_successes: snapshot.success_count,
                declaration_index: self.registry.position(provider_id.as_str()).unwrap_or(usize::MAX),
            });
        }
        ranked.sort_by(Self::compare);
        Ok(ranked)
    }
}

impl std::fmt::Debug for WeightedRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedRouter")
            .field("providers", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}
