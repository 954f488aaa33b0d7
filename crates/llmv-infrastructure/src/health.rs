//! Periodic provider health checks
//!
//! Every round sends one existence probe per provider that declares a
//! `health_check_model`. Probes go through the verification service, so
//! their outcomes feed the provider's circuit breaker and latency history
//! exactly like verification traffic.

use crate::logging::log_health_check;
use chrono::{DateTime, Utc};
use llmv_application::{CircuitBreakerRegistry, ProviderRegistry, VerificationServiceInterface};
use llmv_domain::{CircuitState, ModelRef, ProbeKind, ProviderId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Health of one provider after a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHealth {
    /// Checked provider
    pub provider_id: ProviderId,
    /// Probed model
    pub model_id: String,
    /// Whether the existence probe passed
    pub healthy: bool,
    /// Round-trip time in milliseconds
    pub latency_ms: u64,
    /// Circuit state after the probe
    pub circuit: CircuitState,
    /// Failure detail
    pub error: Option<String>,
    /// When the probe finished
    pub checked_at: DateTime<Utc>,
}

/// Background health checker
#[derive(Clone)]
pub struct HealthChecker {
    service: Arc<dyn VerificationServiceInterface>,
    registry: Arc<ProviderRegistry>,
    breakers: Arc<CircuitBreakerRegistry>,
    interval: Duration,
}

impl HealthChecker {
    /// Create a checker
    pub fn new(
        service: Arc<dyn VerificationServiceInterface>,
        registry: Arc<ProviderRegistry>,
        breakers: Arc<CircuitBreakerRegistry>,
        interval: Duration,
    ) -> Self {
        Self {
            service,
            registry,
            breakers,
            interval,
        }
    }

    /// Time between rounds
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe every provider with a health check model once
    pub async fn check_once(&self, cancel: &CancellationToken) -> Vec<ProviderHealth> {
        let mut report = Vec::new();
        for provider in self.registry.iter() {
            let Some(model) = provider.health_check_model.as_deref() else {
                continue;
            };
            if cancel.is_cancelled() {
                break;
            }
            let target = ModelRef::new(provider.id.clone(), model);
            let (healthy, latency, error) =
                match self.service.probe_once(&target, &ProbeKind::Existence, cancel).await {
                    Ok(outcome) => (
                        outcome.success,
                        outcome.latency,
                        outcome.error.map(|e| e.to_string()),
                    ),
                    Err(e) => (false, Duration::ZERO, Some(e.to_string())),
                };
            log_health_check(provider.id.as_str(), healthy, error.as_deref());
            report.push(ProviderHealth {
                provider_id: provider.id.clone(),
                model_id: model.to_string(),
                healthy,
                latency_ms: u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                circuit: self.breakers.state(provider.id.as_str()),
                error,
                checked_at: Utc::now(),
            });
        }
        report
    }

    /// Run rounds until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            interval = %humantime::format_duration(self.interval),
            "Health checker started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let report = self.check_once(&cancel).await;
                    let unhealthy = report.iter().filter(|h| !h.healthy).count();
                    if unhealthy > 0 {
                        warn!(checked = report.len(), unhealthy, "Health round found unhealthy providers");
                    }
                }
            }
        }
        info!("Health checker stopped");
    }

    /// Spawn [`run`](Self::run) on the current runtime
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
