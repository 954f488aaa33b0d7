//! Latency history
//!
//! Bounded ring buffer of recent samples per provider. Appends take the
//! provider's own mutex; readers receive a copied [`LatencySnapshot`] and
//! never hold the lock while computing percentiles.

use crate::telemetry::record_probe_latency;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use llmv_domain::constants::LATENCY_WINDOW_SIZE;
use llmv_domain::{LatencySnapshot, ProbeOutcome, ProviderId};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct Sample {
    latency: Duration,
    success: bool,
    at: DateTime<Utc>,
}

/// Fixed-capacity sample window
#[derive(Debug)]
struct LatencyWindow {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl LatencyWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}

/// Nearest-rank percentile of a sorted slice
fn percentile(sorted: &[Duration], p: f64) -> Option<Duration> {
    if sorted.is_empty() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rank = (p * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, sorted.len()) - 1])
}

/// Latency history of every provider
#[derive(Debug)]
pub struct LatencyTracker {
    capacity: usize,
    windows: DashMap<ProviderId, Mutex<LatencyWindow>>,
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new(LATENCY_WINDOW_SIZE)
    }
}

impl LatencyTracker {
    /// Create a tracker keeping `capacity` samples per provider
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            windows: DashMap::new(),
        }
    }

    /// Append one sample
    pub fn record(&self, provider_id: &ProviderId, latency: Duration, success: bool) {
        let sample = Sample {
            latency,
            success,
            at: Utc::now(),
        };
        record_probe_latency(provider_id, latency);
        if let Some(window) = self.windows.get(provider_id) {
            window
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sample);
            return;
        }
        self.windows
            .entry(provider_id.clone())
            .or_insert_with(|| Mutex::new(LatencyWindow::new(self.capacity)))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample);
    }

    /// Append the sample carried by an outcome, if it has one
    pub fn record_outcome(&self, outcome: &ProbeOutcome) {
        if outcome.has_latency_sample() {
            self.record(&outcome.target.provider_id, outcome.latency, outcome.success);
        }
    }

    /// Copy of a provider's statistics; empty when nothing was recorded
    pub fn snapshot(&self, provider_id: &ProviderId) -> LatencySnapshot {
        let samples: Vec<Sample> = match self.windows.get(provider_id) {
            Some(window) => window
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .samples
                .iter()
                .copied()
                .collect(),
            None => return LatencySnapshot::empty(provider_id.clone()),
        };

        let mut sorted: Vec<Duration> = samples.iter().map(|s| s.latency).collect();
        sorted.sort_unstable();
        LatencySnapshot {
            provider_id: provider_id.clone(),
            sample_count: samples.len(),
            success_count: samples.iter().filter(|s| s.success).count(),
            p50: percentile(&sorted, 0.50),
            p95: percentile(&sorted, 0.95),
            p99: percentile(&sorted, 0.99),
            last_success_at: samples.iter().rev().find(|s| s.success).map(|s| s.at),
        }
    }

    /// Snapshots of every tracked provider
    pub fn snapshots(&self) -> Vec<LatencySnapshot> {
        let ids: Vec<ProviderId> = self.windows.iter().map(|e| e.key().clone()).collect();
        let mut snapshots: Vec<_> = ids.iter().map(|id| self.snapshot(id)).collect();
        snapshots.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
        snapshots
    }
}
