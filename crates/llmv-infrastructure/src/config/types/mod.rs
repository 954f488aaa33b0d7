//! Configuration types
//!
//! Every section is `#[serde(default)]` so a configuration file only needs
//! the keys it changes.

mod app;
mod health;
mod logging;
mod providers;
mod resilience;
mod router;
mod scoring;
mod storage;
mod verification;

pub use app::AppConfig;
pub use health::HealthConfig;
pub use logging::LoggingConfig;
pub use providers::ProviderConfig;
pub use resilience::{CircuitBreakerSettings, ResilienceConfig, RetrySettings};
pub use router::RouterSettings;
pub use scoring::ScoringSettings;
pub use storage::StorageConfig;
pub use verification::VerificationConfig;
