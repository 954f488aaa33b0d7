//! Score components, weights and the aggregate score
//!
//! All components and the overall score live on the documented
//! [`SCORE_MIN`]..=[`SCORE_MAX`] (0-10) scale.

use crate::constants::{
    DEFAULT_WEIGHT_CAPABILITY, DEFAULT_WEIGHT_COST, DEFAULT_WEIGHT_EFFICIENCY,
    DEFAULT_WEIGHT_RECENCY, DEFAULT_WEIGHT_SPEED, SCORE_MAX, SCORE_MIN, WEIGHT_SUM_TOLERANCE,
};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Clamp a value onto the score range; NaN maps to the minimum
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        SCORE_MIN
    } else {
        value.clamp(SCORE_MIN, SCORE_MAX)
    }
}

/// Fixed-format suffix embedding the rounded score, e.g. `(SC:8.5)`
pub fn format_score_suffix(score: f64) -> String {
    format!("(SC:{:.1})", clamp_score(score))
}

/// The five score components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// Observed latency against the reference curve
    pub speed: f64,
    /// Context per parameter against peers
    pub efficiency: f64,
    /// Inverse price
    pub cost: f64,
    /// Importance-weighted capability pass ratio
    pub capability: f64,
    /// Release date decay
    pub recency: f64,
}

impl ScoreComponents {
    /// Every component clamped onto the score range
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            speed: clamp_score(self.speed),
            efficiency: clamp_score(self.efficiency),
            cost: clamp_score(self.cost),
            capability: clamp_score(self.capability),
            recency: clamp_score(self.recency),
        }
    }

    /// Σ weight · component, unclamped
    pub fn weighted_sum(&self, weights: &ScoreWeights) -> f64 {
        weights.speed * self.speed
            + weights.efficiency * self.efficiency
            + weights.cost * self.cost
            + weights.capability * self.capability
            + weights.recency * self.recency
    }
}

/// Weights of the five components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub speed: f64,
    pub efficiency: f64,
    pub cost: f64,
    pub capability: f64,
    pub recency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            speed: DEFAULT_WEIGHT_SPEED,
            efficiency: DEFAULT_WEIGHT_EFFICIENCY,
            cost: DEFAULT_WEIGHT_COST,
            capability: DEFAULT_WEIGHT_CAPABILITY,
            recency: DEFAULT_WEIGHT_RECENCY,
        }
    }
}

impl ScoreWeights {
    fn values(&self) -> [f64; 5] {
        [
            self.speed,
            self.efficiency,
            self.cost,
            self.capability,
            self.recency,
        ]
    }

    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Reject negative, non-finite, or non-normalized weight sets
    pub fn validate(&self) -> Result<()> {
        if self.values().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::invalid_argument(
                "score weights must be finite and non-negative",
            ));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::invalid_argument(format!(
                "score weights must sum to 1.0, got {sum:.4}"
            )));
        }
        Ok(())
    }
}

/// Value Object: Comprehensive Model Score
///
/// Deterministic function of its inputs: two scores built from the same
/// components, weights and reference date are identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveScore {
    /// Scored model
    pub model_id: String,
    /// Component breakdown
    pub components: ScoreComponents,
    /// Weights used
    pub weights: ScoreWeights,
    /// Σ weight · component, clamped
    pub overall: f64,
    /// Human-readable suffix, e.g. `(SC:8.5)`
    pub suffix: String,
    /// Reference date of the recency component
    pub as_of: NaiveDate,
}

impl ComprehensiveScore {
    /// Aggregate components with the given weights
    pub fn from_components(
        model_id: impl Into<String>,
        components: ScoreComponents,
        weights: ScoreWeights,
        as_of: NaiveDate,
    ) -> Self {
        let components = components.clamped();
        let overall = clamp_score(components.weighted_sum(&weights));
        Self {
            model_id: model_id.into(),
            components,
            weights,
            overall,
            suffix: format_score_suffix(overall),
            as_of,
        }
    }

    /// Display name with the score suffix appended
    pub fn decorate(&self, name: &str) -> String {
        format!("{name} {}", self.suffix)
    }
}
