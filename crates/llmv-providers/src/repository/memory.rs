//! In-memory result repository

use super::{is_requested, recorded_at};
use async_trait::async_trait;
use dashmap::DashMap;
use llmv_domain::error::Result;
use llmv_domain::ports::VerificationResultRepository;
use llmv_domain::{ModelRef, VerificationResult};

/// Latest result per model, kept in memory
#[derive(Debug, Default)]
pub struct InMemoryVerificationRepository {
    results: DashMap<ModelRef, VerificationResult>,
}

impl InMemoryVerificationRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of models with a stored result
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing was stored yet
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[async_trait]
impl VerificationResultRepository for InMemoryVerificationRepository {
    async fn save(&self, result: &VerificationResult) -> Result<()> {
        self.results
            .entry(result.target.clone())
            .and_modify(|stored| {
                if recorded_at(result) >= recorded_at(stored) {
                    *stored = result.clone();
                }
            })
            .or_insert_with(|| result.clone());
        Ok(())
    }

    async fn latest(&self, model_ids: &[String]) -> Result<Vec<VerificationResult>> {
        let mut results: Vec<VerificationResult> = self
            .results
            .iter()
            .filter(|entry| is_requested(entry.value(), model_ids))
            .map(|entry| entry.value().clone())
            .collect();
        results.sort_by(|a, b| a.target.cmp(&b.target));
        Ok(results)
    }
}
