//! Health check configuration

use crate::constants::DEFAULT_HEALTH_INTERVAL_SECS;
use serde::{Deserialize, Serialize};

/// Periodic health check configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Run the background checker
    pub enabled: bool,
    /// Seconds between rounds
    pub interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: DEFAULT_HEALTH_INTERVAL_SECS,
        }
    }
}
