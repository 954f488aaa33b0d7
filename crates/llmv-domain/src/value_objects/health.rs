//! Provider health snapshots
//!
//! Read-only copies of circuit and latency state, handed to the router
//! and to diagnostics. The live state stays with its owner.

use crate::entities::ProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Requests pass through
    #[default]
    Closed,
    /// Requests are short-circuited
    Open,
    /// One trial request is permitted
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::Open => f.write_str("open"),
            Self::HalfOpen => f.write_str("half_open"),
        }
    }
}

/// Point-in-time view of one provider's circuit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitSnapshot {
    /// Provider
    pub provider_id: ProviderId,
    /// Effective state
    pub state: CircuitState,
    /// Failures currently inside the rolling window
    pub failure_count: u32,
    /// Last transition time, `None` if the circuit never moved
    pub last_transition_at: Option<DateTime<Utc>>,
}

/// Point-in-time view of one provider's latency history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySnapshot {
    /// Provider
    pub provider_id: ProviderId,
    /// Samples currently held
    pub sample_count: usize,
    /// Successful samples currently held
    pub success_count: usize,
    /// Median latency
    pub p50: Option<Duration>,
    /// 95th percentile latency
    pub p95: Option<Duration>,
    /// 99th percentile latency
    pub p99: Option<Duration>,
    /// Last successful sample
    pub last_success_at: Option<DateTime<Utc>>,
}

impl LatencySnapshot {
    /// Snapshot of a provider with no history
    pub fn empty(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            sample_count: 0,
            success_count: 0,
            p50: None,
            p95: None,
            p99: None,
            last_success_at: None,
        }
    }

    /// Whether no samples were recorded
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}
