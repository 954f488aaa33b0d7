//! Verification run configuration

use crate::constants::{DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_VERIFICATION_CONCURRENCY};
use llmv_application::{VerificationMode, VerificationPolicy, VerificationSettings};
use llmv_domain::constants::{DEFAULT_STRICT_MIN_CAPABILITY_RATIO, DEFAULT_STRICT_MIN_SCORE};
use llmv_domain::error::Result;
use llmv_domain::{Capability, ModelRef};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Verification run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Concurrent verification workers
    pub concurrency: usize,
    /// Per-probe deadline in seconds
    pub probe_timeout_secs: u64,
    /// Feature probes run after responsiveness
    pub features: Vec<Capability>,
    /// Relaxed or strict verification
    pub mode: VerificationMode,
    /// Strict mode: minimum overall score
    pub min_score: f64,
    /// Strict mode: minimum weighted capability pass ratio
    pub min_capability_ratio: f64,
    /// Models to verify, as `provider/model`
    pub targets: Vec<String>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_VERIFICATION_CONCURRENCY,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            features: Capability::default_probe_set(),
            mode: VerificationMode::default(),
            min_score: DEFAULT_STRICT_MIN_SCORE,
            min_capability_ratio: DEFAULT_STRICT_MIN_CAPABILITY_RATIO,
            targets: Vec::new(),
        }
    }
}

impl VerificationConfig {
    /// Status policy
    pub fn policy(&self) -> VerificationPolicy {
        match self.mode {
            VerificationMode::Relaxed => VerificationPolicy::relaxed(),
            VerificationMode::Strict => {
                VerificationPolicy::strict(self.min_score, self.min_capability_ratio)
            }
        }
    }

    /// Orchestrator settings
    pub fn to_settings(&self) -> VerificationSettings {
        VerificationSettings {
            features: self.features.clone(),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            policy: self.policy(),
        }
    }

    /// Parsed targets
    pub fn parsed_targets(&self) -> Result<Vec<ModelRef>> {
        self.targets.iter().map(|target| target.parse()).collect()
    }
}
