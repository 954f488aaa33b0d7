//! Main application configuration

use super::{
    HealthConfig, LoggingConfig, ProviderConfig, ResilienceConfig, RouterSettings, ScoringSettings,
    StorageConfig, VerificationConfig,
};
use serde::{Deserialize, Serialize};

/// Main application configuration
///
/// ```toml
/// [verification]
/// concurrency = 8
/// targets = ["openai/gpt-4o", "anthropic/claude-sonnet-4"]
///
/// [[providers]]
/// name = "openai"
/// base_url = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Provider declarations, in routing tie-break order
    pub providers: Vec<ProviderConfig>,
    /// Circuit breaker and retry settings
    pub resilience: ResilienceConfig,
    /// Verification run settings
    pub verification: VerificationConfig,
    /// Scoring settings and model metadata
    pub scoring: ScoringSettings,
    /// Router settings
    pub router: RouterSettings,
    /// Periodic health checks
    pub health: HealthConfig,
    /// Result persistence
    pub storage: StorageConfig,
}
