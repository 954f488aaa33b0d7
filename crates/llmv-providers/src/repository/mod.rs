//! Verification Result Repositories
//!
//! | Repository | Storage |
//! |------------|---------|
//! | [`InMemoryVerificationRepository`] | Process memory, for tests and one-shot runs |
//! | [`JsonlVerificationRepository`] | Append-only JSON lines file |

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlVerificationRepository;
pub use memory::InMemoryVerificationRepository;

use llmv_domain::VerificationResult;
use chrono::{DateTime, Utc};

/// Ordering key for "latest" lookups
pub(crate) fn recorded_at(result: &VerificationResult) -> DateTime<Utc> {
    result.completed_at.unwrap_or(result.started_at)
}

/// Whether a result belongs to the requested models (empty = all)
pub(crate) fn is_requested(result: &VerificationResult, model_ids: &[String]) -> bool {
    model_ids.is_empty() || model_ids.iter().any(|id| id == result.model_id())
}
