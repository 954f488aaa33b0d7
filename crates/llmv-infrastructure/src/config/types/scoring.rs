//! Scoring configuration

use llmv_application::ScoringConfig;
use llmv_domain::constants::{
    SCORING_RECENCY_FLOOR, SCORING_RECENCY_HALF_LIFE_DAYS, SCORING_REFERENCE_CONTEXT_PER_BILLION,
    SCORING_REFERENCE_LATENCY_MS, SCORING_REFERENCE_PRICE_PER_MILLION,
};
use llmv_domain::{ModelMetadata, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scoring settings and the static model catalog
///
/// ```toml
/// [scoring.weights]
/// speed = 0.3
/// efficiency = 0.2
/// cost = 0.2
/// capability = 0.2
/// recency = 0.1
///
/// [[scoring.models]]
/// model_id = "gpt-4o"
/// context_window = 128000
/// input_price_per_million = 2.5
/// output_price_per_million = 10.0
/// release_date = "2024-05-13"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Component weights, summing to 1.0
    pub weights: ScoreWeights,
    /// Latency that scores 5 on speed
    pub reference_latency_ms: u64,
    /// Blended price that scores 5 on cost
    pub reference_price_per_million: f64,
    /// Context tokens per billion parameters that scores 5 on efficiency
    pub reference_context_per_billion: f64,
    /// Age at which recency has decayed halfway to the floor
    pub recency_half_life_days: f64,
    /// Lowest recency score
    pub recency_floor: f64,
    /// Static model metadata
    pub models: Vec<ModelMetadata>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            reference_latency_ms: SCORING_REFERENCE_LATENCY_MS,
            reference_price_per_million: SCORING_REFERENCE_PRICE_PER_MILLION,
            reference_context_per_billion: SCORING_REFERENCE_CONTEXT_PER_BILLION,
            recency_half_life_days: SCORING_RECENCY_HALF_LIFE_DAYS,
            recency_floor: SCORING_RECENCY_FLOOR,
            models: Vec::new(),
        }
    }
}

impl ScoringSettings {
    /// Engine configuration
    pub fn to_scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            reference_latency: Duration::from_millis(self.reference_latency_ms),
            reference_price_per_million: self.reference_price_per_million,
            reference_context_per_billion: self.reference_context_per_billion,
            recency_half_life_days: self.recency_half_life_days,
            recency_floor: self.recency_floor,
        }
    }
}
