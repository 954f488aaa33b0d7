//! Composition root
//!
//! Builds the engine from an [`AppConfig`]:
//!
//! ```text
//! AppConfig → ProviderRegistry ─┬─► VerificationServiceImpl ─► HttpProbeExecutor
//!                               ├─► WeightedRouter
//!                               └─► HealthChecker
//!     CircuitBreakerRegistry, LatencyTracker, RateLimiterRegistry are shared
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let results = context
//!     .service()
//!     .verify_all(targets, context.concurrency(), CancellationToken::new())
//!     .await?;
//! ```

use crate::catalog::StaticModelCatalog;
use crate::config::AppConfig;
use crate::health::HealthChecker;
use llmv_application::{
    CircuitBreakerRegistry, LatencyTracker, ProviderRegistry, RateLimiterRegistry,
    ScoringEngine, VerificationServiceImpl, WeightedRouter,
};
use llmv_domain::error::Result;
use llmv_domain::ports::{ProbeExecutor, VerificationResultRepository};
use llmv_domain::{ModelRef, ScoreWeights};
use llmv_providers::{
    HttpClientConfig, HttpProbeExecutor, InMemoryVerificationRepository,
    JsonlVerificationRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application context
///
/// Owns the shared health state so that verification, routing and health
/// checks all observe the same circuits and latency history.
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,
    registry: Arc<ProviderRegistry>,
    breakers: Arc<CircuitBreakerRegistry>,
    latency: Arc<LatencyTracker>,
    repository: Arc<dyn VerificationResultRepository>,
    catalog: Arc<StaticModelCatalog>,
    scoring: ScoringEngine,
    service: Arc<VerificationServiceImpl>,
    router: Arc<WeightedRouter>,
}

impl AppContext {
    /// Build a context around an explicit executor and repository
    pub fn with_components(
        config: AppConfig,
        executor: Arc<dyn ProbeExecutor>,
        repository: Arc<dyn VerificationResultRepository>,
    ) -> Result<Self> {
        let registry = Arc::new(ProviderRegistry::new(
            config.providers.iter().map(|p| p.to_provider()),
        )?);
        let breakers = Arc::new(CircuitBreakerRegistry::new(
            config.resilience.circuit_breaker.to_breaker_config(),
        ));
        let latency = Arc::new(LatencyTracker::new(config.router.latency_window));
        let limiters = Arc::new(RateLimiterRegistry::new());
        let catalog = Arc::new(StaticModelCatalog::new(config.scoring.models.clone()));
        let scoring_config = config.scoring.to_scoring_config();
        scoring_config.validate()?;
        let scoring = ScoringEngine::new(scoring_config);

        let service = VerificationServiceImpl::new(
            Arc::clone(&registry),
            executor,
            Arc::clone(&breakers),
            Arc::clone(&latency),
        )
        .with_retry_policy(config.resilience.retry.to_policy())
        .with_settings(config.verification.to_settings())
        .with_rate_limiters(limiters)
        .with_repository(Arc::clone(&repository))
        .with_scoring(scoring, catalog.clone(), config.scoring.weights)?;

        let router = WeightedRouter::new(
            Arc::clone(&registry),
            Arc::clone(&breakers),
            Arc::clone(&latency),
            config.router.to_router_config(),
        );

        info!(
            providers = registry.len(),
            targets = config.verification.targets.len(),
            mode = ?config.verification.mode,
            "Application context initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            registry,
            breakers,
            latency,
            repository,
            catalog,
            scoring,
            service: Arc::new(service),
            router: Arc::new(router),
        })
    }

    /// Provider registry
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Shared circuit breakers
    pub fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    /// Shared latency history
    pub fn latency(&self) -> &Arc<LatencyTracker> {
        &self.latency
    }

    /// Result repository
    pub fn repository(&self) -> &Arc<dyn VerificationResultRepository> {
        &self.repository
    }

    /// Model metadata catalog
    pub fn catalog(&self) -> &Arc<StaticModelCatalog> {
        &self.catalog
    }

    /// Scoring engine
    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    /// Configured score weights
    pub fn weights(&self) -> ScoreWeights {
        self.config.scoring.weights
    }

    /// Verification orchestrator
    pub fn service(&self) -> &Arc<VerificationServiceImpl> {
        &self.service
    }

    /// Provider router
    pub fn router(&self) -> &Arc<WeightedRouter> {
        &self.router
    }

    /// Configured worker count
    pub fn concurrency(&self) -> usize {
        self.config.verification.concurrency
    }

    /// Configured verification targets
    pub fn targets(&self) -> Result<Vec<ModelRef>> {
        self.config.verification.parsed_targets()
    }

    /// Health checker over the shared state
    pub fn health_checker(&self) -> HealthChecker {
        HealthChecker::new(
            self.service.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.breakers),
            Duration::from_secs(self.config.health.interval_secs),
        )
    }
}

/// Build the production context: HTTP probing and the configured repository
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    let executor: Arc<dyn ProbeExecutor> = Arc::new(HttpProbeExecutor::new(HttpClientConfig::default()));
    let repository: Arc<dyn VerificationResultRepository> = if config.storage.in_memory {
        Arc::new(InMemoryVerificationRepository::new())
    } else {
        Arc::new(JsonlVerificationRepository::new(
            config.storage.resolved_results_path(),
        ))
    };
    AppContext::with_components(config, executor, repository)
}
