//! Provider-facing ports

use crate::entities::{ModelRef, Provider};
use crate::error::Result;
use crate::value_objects::{ModelMetadata, ProbeError, ProbeKind, ProbeOutcome};
use async_trait::async_trait;
use std::time::Duration;

/// Probe Executor port
///
/// Issues exactly one outbound request per call and always returns a
/// [`ProbeOutcome`]. Provider-side failures are classified into the
/// outcome; `Err` is reserved for contract violations such as empty
/// identifiers.
///
/// # Example
///
/// ```ignore
/// let outcome = executor
///     .probe(&provider, &target, &ProbeKind::Existence, Duration::from_secs(10))
///     .await?;
/// if !outcome.success {
///     println!("{}: {:?}", target, outcome.error);
/// }
/// ```
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    /// Run one probe; never takes longer than `deadline`
    async fn probe(
        &self,
        provider: &Provider,
        target: &ModelRef,
        kind: &ProbeKind,
        deadline: Duration,
    ) -> Result<ProbeOutcome>;

    /// Ids of every model the provider lists; never takes longer than `deadline`
    ///
    /// Provider-side failures surface as [`Error::Probe`](crate::error::Error::Probe).
    /// Executors that cannot list report an unsupported probe error.
    async fn list_models(&self, provider: &Provider, deadline: Duration) -> Result<Vec<String>> {
        let _ = deadline;
        Err(ProbeError::unsupported(format!("listing models of {} is not supported", provider.id)).into())
    }
}

/// Source of static model metadata
pub trait ModelMetadataProvider: Send + Sync {
    /// Metadata for a model id, if known
    fn metadata(&self, model_id: &str) -> Option<ModelMetadata>;
}
