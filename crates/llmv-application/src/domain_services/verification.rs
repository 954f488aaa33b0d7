//! Verification service interface

use async_trait::async_trait;
use llmv_domain::error::Result;
use llmv_domain::{ModelRef, ProbeKind, ProbeOutcome, VerificationResult};
use tokio_util::sync::CancellationToken;

/// Verification orchestrator interface
#[async_trait]
pub trait VerificationServiceInterface: Send + Sync {
    /// Verify every target with at most `concurrency` targets in flight
    ///
    /// Returns exactly one result per input target, in input order. Only
    /// contract violations (zero concurrency, empty identifiers) are
    /// reported as `Err`.
    async fn verify_all(
        &self,
        targets: Vec<ModelRef>,
        concurrency: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<VerificationResult>>;

    /// Verify a single target
    async fn verify_one(
        &self,
        target: ModelRef,
        cancel: CancellationToken,
    ) -> Result<VerificationResult>;

    /// Run one probe through rate limiting and the circuit breaker, without retries
    async fn probe_once(
        &self,
        target: &ModelRef,
        kind: &ProbeKind,
        cancel: &CancellationToken,
    ) -> Result<ProbeOutcome>;

    /// One target per model the provider lists
    ///
    /// The listing call passes through rate limiting and the circuit
    /// breaker. Unknown providers are `Error::NotFound`; provider-side
    /// failures are `Error::Probe`.
    async fn discover_targets(
        &self,
        provider_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModelRef>>;
}
