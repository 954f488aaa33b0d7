//! Verification status and result

use super::{CapabilityReport, ComprehensiveScore, ProbeError};
use crate::entities::ModelRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Overall verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Probe sequence not finished
    #[default]
    Pending,
    /// Model exists, responds and satisfies the verification policy
    Verified,
    /// Provider answered but the model did not pass
    Failed,
    /// Outcome could not be determined (transport, auth, circuit open)
    Error,
    /// Run cancelled before the probe sequence finished
    Cancelled,
}

impl VerificationStatus {
    /// Whether the status is final
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Stable label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value Object: Verification Record
///
/// One record per (provider, model) and run.
///
/// ## Business Rules
///
/// - `completed_at >= started_at` once finished
/// - `status` becomes terminal only through [`VerificationResult::finish`]
/// - a result without both existence and responsiveness confirmed is never
///   `Verified`; `finish` downgrades such requests to `Failed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Record id
    pub id: Uuid,
    /// Verified model
    pub target: ModelRef,
    /// Overall status
    pub status: VerificationStatus,
    /// Existence probe result, `None` if undetermined
    pub model_exists: Option<bool>,
    /// Responsiveness probe result, `None` if undetermined
    pub responsive: Option<bool>,
    /// Responsiveness latency in milliseconds
    pub latency_ms: Option<u64>,
    /// Feature probe results
    pub capabilities: CapabilityReport,
    /// Score computed at the end of the run, if scoring was enabled
    pub score: Option<ComprehensiveScore>,
    /// Error that decided a non-verified status
    pub error: Option<ProbeError>,
    /// Total network attempts, retries included
    pub probe_attempts: u32,
    /// When verification of this target began
    pub started_at: DateTime<Utc>,
    /// When the status became terminal
    pub completed_at: Option<DateTime<Utc>>,
}

impl VerificationResult {
    /// Start a new record
    pub fn pending(target: ModelRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            status: VerificationStatus::Pending,
            model_exists: None,
            responsive: None,
            latency_ms: None,
            capabilities: CapabilityReport::new(),
            score: None,
            error: None,
            probe_attempts: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record for a target that never ran because the run was cancelled
    pub fn cancelled(target: ModelRef) -> Self {
        let mut result = Self::pending(target);
        result.finish_with_error(VerificationStatus::Cancelled, ProbeError::cancelled());
        result
    }

    /// Model id shortcut
    pub fn model_id(&self) -> &str {
        &self.target.model_id
    }

    /// Responsiveness latency
    pub fn latency(&self) -> Option<Duration> {
        self.latency_ms.map(Duration::from_millis)
    }

    /// Set the responsiveness latency
    pub fn set_latency(&mut self, latency: Duration) {
        self.latency_ms = Some(u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
    }

    /// Whether the record is terminal and verified
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }

    /// Whether existence and responsiveness were both confirmed
    pub fn is_reachable(&self) -> bool {
        self.model_exists == Some(true) && self.responsive == Some(true)
    }

    /// Move to a terminal status
    pub fn finish(&mut self, status: VerificationStatus) {
        let status = match status {
            VerificationStatus::Verified if !self.is_reachable() => VerificationStatus::Failed,
            VerificationStatus::Pending => VerificationStatus::Error,
            other => other,
        };
        self.status = status;
        self.completed_at = Some(Utc::now().max(self.started_at));
    }

    /// Move to a terminal status and keep the deciding error
    pub fn finish_with_error(&mut self, status: VerificationStatus, error: ProbeError) {
        self.error = Some(error);
        self.finish(status);
    }
}
