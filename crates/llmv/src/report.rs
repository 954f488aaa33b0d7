//! Run reports
//!
//! JSON documents printed by the `verify` and `score` commands.

use chrono::{DateTime, NaiveDate, Utc};
use llmv_application::{RankedProvider, ScoringEngine};
use llmv_domain::error::Result;
use llmv_domain::{
    CircuitSnapshot, ComprehensiveScore, LatencySnapshot, ModelMetadataProvider, ModelRef,
    ProviderId, ScoreWeights, VerificationResult, VerificationStatus,
};
use serde::{Deserialize, Serialize};

/// Counts per terminal status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub verified: usize,
    pub failed: usize,
    pub error: usize,
    pub cancelled: usize,
}

impl RunSummary {
    /// Tally results
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.status {
                VerificationStatus::Verified => summary.verified += 1,
                VerificationStatus::Failed => summary.failed += 1,
                VerificationStatus::Error | VerificationStatus::Pending => summary.error += 1,
                VerificationStatus::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }
}

/// Output of `llmv route`
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub model_id: String,
    /// Provider the router picks, `None` when every candidate is unavailable
    pub selected: Option<ProviderId>,
    /// Every provider serving the model, best first
    pub ranking: Vec<RankedProvider>,
}

/// Output of `llmv verify`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    /// One entry per requested target, in request order
    pub results: Vec<VerificationResult>,
    /// Circuit state per provider after the run
    pub circuits: Vec<CircuitSnapshot>,
    /// Latency history per provider after the run
    pub latency: Vec<LatencySnapshot>,
}

impl VerificationReport {
    /// Assemble a report
    pub fn new(
        results: Vec<VerificationResult>,
        circuits: Vec<CircuitSnapshot>,
        latency: Vec<LatencySnapshot>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: RunSummary::from_results(&results),
            results,
            circuits,
            latency,
        }
    }

    /// Whether every target verified
    pub fn all_verified(&self) -> bool {
        self.summary.verified == self.summary.total
    }
}

/// One line of `llmv score`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredModel {
    pub target: ModelRef,
    pub status: VerificationStatus,
    /// Model id with the score suffix, e.g. `gpt-4o (SC:8.1)`
    pub display_name: String,
    pub score: ComprehensiveScore,
}

/// Score stored results against the catalog, best first
pub fn score_results(
    engine: &ScoringEngine,
    catalog: &dyn ModelMetadataProvider,
    results: Vec<VerificationResult>,
    weights: &ScoreWeights,
    as_of: NaiveDate,
) -> Result<Vec<ScoredModel>> {
    let items: Vec<_> = results
        .into_iter()
        .map(|result| {
            let metadata = catalog
                .metadata(result.model_id())
                .unwrap_or_else(|| llmv_domain::ModelMetadata::unknown(result.model_id()));
            (result, metadata)
        })
        .collect();
    let scores = engine.score_batch(&items, weights, as_of)?;
    let mut scored: Vec<ScoredModel> = items
        .into_iter()
        .zip(scores)
        .map(|((result, _), score)| ScoredModel {
            display_name: score.decorate(result.model_id()),
            target: result.target,
            status: result.status,
            score,
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .overall
            .total_cmp(&a.score.overall)
            .then_with(|| a.target.cmp(&b.target))
    });
    Ok(scored)
}
