//! Router configuration

use llmv_application::RouterConfig;
use llmv_domain::constants::{
    LATENCY_WINDOW_SIZE, ROUTER_HALF_OPEN_FACTOR, ROUTER_REFERENCE_LATENCY_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Router settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Availability of a Half-Open provider relative to a Closed one
    pub half_open_factor: f64,
    /// p95 latency that scores a neutral latency factor
    pub reference_latency_ms: u64,
    /// Samples kept per provider
    pub latency_window: usize,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            half_open_factor: ROUTER_HALF_OPEN_FACTOR,
            reference_latency_ms: ROUTER_REFERENCE_LATENCY_MS,
            latency_window: LATENCY_WINDOW_SIZE,
        }
    }
}

impl RouterSettings {
    /// Engine router configuration
    pub fn to_router_config(&self) -> RouterConfig {
        RouterConfig {
            half_open_factor: self.half_open_factor,
            reference_latency: Duration::from_millis(self.reference_latency_ms),
        }
    }
}
