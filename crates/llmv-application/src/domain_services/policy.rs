//! Verification policy
//!
//! Decides the terminal status of a result whose probe sequence completed.
//! Relaxed mode only needs the model to exist and respond; strict mode also
//! applies capability and score thresholds.

use llmv_domain::constants::{DEFAULT_STRICT_MIN_CAPABILITY_RATIO, DEFAULT_STRICT_MIN_SCORE};
use llmv_domain::{VerificationResult, VerificationStatus};
use serde::{Deserialize, Serialize};

/// Strictness of verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// Exists and responds
    #[default]
    Relaxed,
    /// Exists, responds, and meets the thresholds
    Strict,
}

/// Thresholds applied when deciding `Verified`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationPolicy {
    /// Relaxed or strict
    pub mode: VerificationMode,
    /// Minimum overall score (0-10); only checked when a score is attached
    pub min_score: f64,
    /// Minimum importance-weighted capability pass ratio (0-1)
    pub min_capability_ratio: f64,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::relaxed()
    }
}

impl VerificationPolicy {
    /// Relaxed policy
    pub fn relaxed() -> Self {
        Self {
            mode: VerificationMode::Relaxed,
            min_score: DEFAULT_STRICT_MIN_SCORE,
            min_capability_ratio: DEFAULT_STRICT_MIN_CAPABILITY_RATIO,
        }
    }

    /// Strict policy with explicit thresholds
    pub fn strict(min_score: f64, min_capability_ratio: f64) -> Self {
        Self {
            mode: VerificationMode::Strict,
            min_score,
            min_capability_ratio,
        }
    }

    /// Status for a result whose probes have all run
    pub fn evaluate(&self, result: &VerificationResult) -> VerificationStatus {
        if !result.is_reachable() {
            return VerificationStatus::Failed;
        }
        match self.mode {
            VerificationMode::Relaxed => VerificationStatus::Verified,
            VerificationMode::Strict => {
                let ratio = result.capabilities.weighted_pass_ratio().unwrap_or(0.0);
                let score_ok = result
                    .score
                    .as_ref()
                    .is_none_or(|score| score.overall >= self.min_score);
                if ratio >= self.min_capability_ratio && score_ok {
                    VerificationStatus::Verified
                } else {
                    VerificationStatus::Failed
                }
            }
        }
    }
}
