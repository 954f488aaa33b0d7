//! Result persistence configuration

use crate::constants::{DEFAULT_CONFIG_DIR, DEFAULT_RESULTS_FILENAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON lines history file; defaults to the user data directory
    pub results_path: Option<PathBuf>,
    /// Keep results in memory only
    pub in_memory: bool,
}

impl StorageConfig {
    /// Effective history file
    pub fn resolved_results_path(&self) -> PathBuf {
        self.results_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_RESULTS_FILENAME)
        })
    }
}
