//! Scoring Engine
//!
//! Pure functions turning a [`VerificationResult`] and static
//! [`ModelMetadata`] into a [`ComprehensiveScore`]. The engine holds only
//! immutable reference values, so it can be shared freely and batch
//! scoring runs in parallel.
//!
//! Every component uses a saturating curve on the 0-10 scale:
//!
//! | Component | Curve | At the reference |
//! |-----------|-------|------------------|
//! | Speed | `10·R/(R+latency)` | 5.0 |
//! | Efficiency | `10·r/(r+R)` with r = context per billion params | 5.0 |
//! | Cost | `10·R/(R+price)` | 5.0 |
//! | Capability | `10·weighted pass ratio` | - |
//! | Recency | `floor + (10-floor)·0.5^(age/half_life)` | halfway to floor |
//!
//! Recency is the only time-dependent component; it is computed at whole
//! day granularity against an explicit reference date.

use chrono::{NaiveDate, Utc};
use llmv_domain::constants::{
    SCORE_MAX, SCORE_MIN, SCORE_NEUTRAL, SCORING_RECENCY_FLOOR, SCORING_RECENCY_HALF_LIFE_DAYS,
    SCORING_REFERENCE_CONTEXT_PER_BILLION, SCORING_REFERENCE_LATENCY_MS,
    SCORING_REFERENCE_PRICE_PER_MILLION,
};
use llmv_domain::error::{Error, Result};
use llmv_domain::{
    CapabilityReport, ComprehensiveScore, ModelMetadata, ScoreComponents, ScoreWeights,
    VerificationResult,
};
use rayon::prelude::*;
use std::time::Duration;

/// Reference values of the scoring curves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Latency that scores 5.0 on speed
    pub reference_latency: Duration,
    /// Blended price per million tokens that scores 5.0 on cost
    pub reference_price_per_million: f64,
    /// Context per billion parameters that scores 5.0 on efficiency
    pub reference_context_per_billion: f64,
    /// Days for recency to decay halfway to the floor
    pub recency_half_life_days: f64,
    /// Recency lower bound
    pub recency_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_latency: Duration::from_millis(SCORING_REFERENCE_LATENCY_MS),
            reference_price_per_million: SCORING_REFERENCE_PRICE_PER_MILLION,
            reference_context_per_billion: SCORING_REFERENCE_CONTEXT_PER_BILLION,
            recency_half_life_days: SCORING_RECENCY_HALF_LIFE_DAYS,
            recency_floor: SCORING_RECENCY_FLOOR,
        }
    }
}

impl ScoringConfig {
    /// Reject references that would break the curves
    pub fn validate(&self) -> Result<()> {
        if self.reference_latency.is_zero() {
            return Err(Error::invalid_argument("scoring reference latency must be positive"));
        }
        for (name, value) in [
            ("reference_price_per_million", self.reference_price_per_million),
            ("reference_context_per_billion", self.reference_context_per_billion),
            ("recency_half_life_days", self.recency_half_life_days),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_argument(format!(
                    "scoring {name} must be a positive number"
                )));
            }
        }
        if !(SCORE_MIN..SCORE_MAX).contains(&self.recency_floor) {
            return Err(Error::invalid_argument(
                "scoring recency_floor must lie within [0, 10)",
            ));
        }
        Ok(())
    }
}

/// Weighted scoring engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Create an engine with the given references
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Active references
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score against today's date
    pub fn score(
        &self,
        result: &VerificationResult,
        metadata: &ModelMetadata,
        weights: &ScoreWeights,
    ) -> Result<ComprehensiveScore> {
        self.score_as_of(result, metadata, weights, Utc::now().date_naive())
    }

    /// Score against an explicit reference date
    pub fn score_as_of(
        &self,
        result: &VerificationResult,
        metadata: &ModelMetadata,
        weights: &ScoreWeights,
        as_of: NaiveDate,
    ) -> Result<ComprehensiveScore> {
        weights.validate()?;
        let components = self.components(
            result,
            metadata,
            as_of,
            self.config.reference_context_per_billion,
        );
        Ok(ComprehensiveScore::from_components(
            result.model_id(),
            components,
            *weights,
            as_of,
        ))
    }

    /// Score many models in parallel
    ///
    /// Efficiency is measured against the median context-per-parameter
    /// ratio of the batch, falling back to the configured reference when no
    /// model in the batch has both facts.
    pub fn score_batch(
        &self,
        items: &[(VerificationResult, ModelMetadata)],
        weights: &ScoreWeights,
        as_of: NaiveDate,
    ) -> Result<Vec<ComprehensiveScore>> {
        weights.validate()?;
        let peer_reference = Self::peer_reference(items.iter().map(|(_, meta)| meta))
            .unwrap_or(self.config.reference_context_per_billion);
        Ok(items
            .par_iter()
            .map(|(result, metadata)| {
                let components = self.components(result, metadata, as_of, peer_reference);
                ComprehensiveScore::from_components(result.model_id(), components, *weights, as_of)
            })
            .collect())
    }

    fn peer_reference<'a>(metadata: impl Iterator<Item = &'a ModelMetadata>) -> Option<f64> {
        let mut ratios: Vec<f64> = metadata
            .filter_map(ModelMetadata::context_per_billion_params)
            .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
            .collect();
        if ratios.is_empty() {
            return None;
        }
        ratios.sort_by(f64::total_cmp);
        let mid = ratios.len() / 2;
        Some(if ratios.len() % 2 == 0 {
            (ratios[mid - 1] + ratios[mid]) / 2.0
        } else {
            ratios[mid]
        })
    }

    /// Compute all five components
    pub fn components(
        &self,
        result: &VerificationResult,
        metadata: &ModelMetadata,
        as_of: NaiveDate,
        efficiency_reference: f64,
    ) -> ScoreComponents {
        ScoreComponents {
            speed: self.speed_score(result.latency()),
            efficiency: Self::efficiency_score(metadata, efficiency_reference),
            cost: self.cost_score(metadata),
            capability: Self::capability_score(&result.capabilities),
            recency: self.recency_score(metadata, as_of),
        }
        .clamped()
    }

    /// Lower latency scores higher; no observed latency scores the minimum
    pub fn speed_score(&self, latency: Option<Duration>) -> f64 {
        let Some(latency) = latency else {
            return SCORE_MIN;
        };
        let reference = self.config.reference_latency.as_secs_f64();
        SCORE_MAX * reference / (reference + latency.as_secs_f64())
    }

    /// More context per parameter scores higher; unknown facts are neutral
    pub fn efficiency_score(metadata: &ModelMetadata, reference: f64) -> f64 {
        match metadata.context_per_billion_params() {
            Some(ratio) if reference > 0.0 => SCORE_MAX * ratio / (ratio + reference),
            _ => SCORE_NEUTRAL,
        }
    }

    /// Free scores the maximum, price grows toward zero, never negative
    ///
    /// A non-finite price is treated as unknown.
    pub fn cost_score(&self, metadata: &ModelMetadata) -> f64 {
        match metadata
            .blended_price_per_million()
            .filter(|price| price.is_finite())
        {
            Some(price) => {
                let reference = self.config.reference_price_per_million;
                SCORE_MAX * reference / (reference + price.max(0.0))
            }
            None => SCORE_NEUTRAL,
        }
    }

    /// Importance-weighted pass ratio; neutral when nothing was probed
    pub fn capability_score(report: &CapabilityReport) -> f64 {
        report
            .weighted_pass_ratio()
            .map_or(SCORE_NEUTRAL, |ratio| ratio * SCORE_MAX)
    }

    /// Newer scores higher, decaying toward the floor; unknown is neutral
    pub fn recency_score(&self, metadata: &ModelMetadata, as_of: NaiveDate) -> f64 {
        let Some(released) = metadata.release_date else {
            return SCORE_NEUTRAL;
        };
        let age_days = (as_of - released).num_days().max(0) as f64;
        let floor = self.config.recency_floor;
        let decay = 0.5_f64.powf(age_days / self.config.recency_half_life_days);
        floor + (SCORE_MAX - floor) * decay
    }
}
