//! Probe kinds and outcomes

use super::{Capability, ProbeError, ProbeErrorKind};
use crate::entities::ModelRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// What a probe checks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "capability", rename_all = "snake_case")]
pub enum ProbeKind {
    /// Does the provider list the model
    Existence,
    /// Does the model answer a minimal completion
    Responsiveness,
    /// Does the model exhibit one capability
    Feature(Capability),
}

impl ProbeKind {
    /// Coarse category used as a metrics label
    pub fn category(&self) -> &'static str {
        match self {
            Self::Existence => "existence",
            Self::Responsiveness => "responsiveness",
            Self::Feature(_) => "feature",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature(capability) => write!(f, "feature:{capability}"),
            other => f.write_str(other.category()),
        }
    }
}

/// Value Object: One Probe Attempt
///
/// Created once per attempt and never mutated. A failed attempt always
/// carries a classified [`ProbeError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Probed model
    pub target: ModelRef,
    /// Probe kind
    pub kind: ProbeKind,
    /// Whether the check passed
    pub success: bool,
    /// Wall-clock time of the attempt
    pub latency: Duration,
    /// HTTP status, when a response was received
    pub http_status: Option<u16>,
    /// Classified failure, present iff `success` is false
    pub error: Option<ProbeError>,
    /// When the attempt finished
    pub timestamp: DateTime<Utc>,
}

impl ProbeOutcome {
    /// Successful attempt
    pub fn succeeded(
        target: ModelRef,
        kind: ProbeKind,
        latency: Duration,
        http_status: Option<u16>,
    ) -> Self {
        Self {
            target,
            kind,
            success: true,
            latency,
            http_status,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Failed attempt
    pub fn failed(target: ModelRef, kind: ProbeKind, latency: Duration, error: ProbeError) -> Self {
        Self {
            target,
            kind,
            success: false,
            latency,
            http_status: error.status,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }

    /// Failure kind, if the attempt failed
    pub fn error_kind(&self) -> Option<ProbeErrorKind> {
        self.error.as_ref().map(|error| error.kind)
    }

    /// Whether the latency reflects a real provider round trip
    ///
    /// True for received responses and for timeouts; false for synthetic
    /// outcomes and for failures raised before a response arrived.
    pub fn has_latency_sample(&self) -> bool {
        self.http_status.is_some() || self.error_kind() == Some(ProbeErrorKind::Timeout)
    }
}
