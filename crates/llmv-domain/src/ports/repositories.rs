//! Verification result persistence port

use crate::error::Result;
use crate::value_objects::VerificationResult;
use async_trait::async_trait;

/// Repository: Verification Results
///
/// The engine only needs durable saves and a latest-by-model lookup; any
/// storage engine satisfying both can back it.
#[async_trait]
pub trait VerificationResultRepository: Send + Sync {
    /// Persist one finished result
    async fn save(&self, result: &VerificationResult) -> Result<()>;

    /// Latest result per (provider, model) for each requested model id
    ///
    /// An empty `model_ids` slice returns the latest result of every model.
    async fn latest(&self, model_ids: &[String]) -> Result<Vec<VerificationResult>>;
}
