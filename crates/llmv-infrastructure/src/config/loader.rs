//! Configuration loader
//!
//! Sources are merged in this order, later sources overriding earlier ones:
//!
//! 1. Defaults from [`AppConfig::default()`]
//! 2. A TOML file: the explicit path, else the first of `./llmv.toml`,
//!    `./llmv/llmv.toml` and `<config dir>/llmv/llmv.toml` that exists
//! 3. Environment variables prefixed `LLMV__`, nested with `__`
//!    (e.g. `LLMV__VERIFICATION__CONCURRENCY=8`)

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use llmv_domain::error::{Error, Result};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate configuration from all sources
    ///
    /// An explicit configuration path that does not exist is an error; a
    /// missing default file is not.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                log_config_loaded(config_path, false);
                return Err(Error::configuration(format!(
                    "configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix))
                .split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// Save configuration to a TOML file; credentials are written redacted
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;
        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;
        Ok(())
    }

    /// Get the explicit configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;
        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }
        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(config)?;
    validate_providers_config(config)?;
    validate_resilience_config(config)?;
    validate_verification_config(config)?;
    validate_scoring_config(config)?;
    validate_router_config(config)?;
    validate_health_config(config)?;
    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::configuration(message)
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    crate::logging::parse_log_level(&config.logging.level).map(|_| ())
}

fn validate_providers_config(config: &AppConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for provider in &config.providers {
        if provider.name.trim().is_empty() {
            return Err(invalid("Provider name cannot be empty"));
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(invalid(format!("Duplicate provider name '{}'", provider.name)));
        }
        if provider.base_url.trim().is_empty() {
            return Err(invalid(format!(
                "Provider '{}' has an empty base_url",
                provider.name
            )));
        }
        if provider.request_timeout_secs == 0 || provider.connect_timeout_secs == 0 {
            return Err(invalid(format!(
                "Provider '{}' timeouts must be positive",
                provider.name
            )));
        }
        provider
            .to_provider()
            .validate()
            .map_err(|e| invalid(e.to_string()))?;
    }
    Ok(())
}

fn validate_resilience_config(config: &AppConfig) -> Result<()> {
    let breaker = &config.resilience.circuit_breaker;
    if breaker.failure_threshold == 0 {
        return Err(invalid("Circuit breaker failure threshold cannot be 0"));
    }
    if breaker.open_timeout_secs == 0 || breaker.failure_window_secs == 0 {
        return Err(invalid("Circuit breaker timeouts cannot be 0"));
    }
    let retry = &config.resilience.retry;
    if retry.max_attempts == 0 {
        return Err(invalid("Retry max attempts cannot be 0"));
    }
    if !(0.0..=1.0).contains(&retry.jitter) {
        return Err(invalid("Retry jitter must be within [0, 1]"));
    }
    retry
        .to_policy()
        .validate()
        .map_err(|e| invalid(e.to_string()))
}

fn validate_verification_config(config: &AppConfig) -> Result<()> {
    let verification = &config.verification;
    if verification.concurrency == 0 {
        return Err(invalid("Verification concurrency cannot be 0"));
    }
    if verification.probe_timeout_secs == 0 {
        return Err(invalid("Probe timeout cannot be 0"));
    }
    if let Some(unknown) = verification.features.iter().find(|c| !c.is_known()) {
        return Err(invalid(format!("Unknown capability '{unknown}'")));
    }
    if !(0.0..=1.0).contains(&verification.min_capability_ratio) {
        return Err(invalid("min_capability_ratio must be within [0, 1]"));
    }
    if !(0.0..=10.0).contains(&verification.min_score) {
        return Err(invalid("min_score must be within [0, 10]"));
    }
    let targets = verification
        .parsed_targets()
        .map_err(|e| invalid(e.to_string()))?;
    for target in &targets {
        if !config
            .providers
            .iter()
            .any(|p| p.name == target.provider_id.as_str())
        {
            return Err(invalid(format!(
                "Target '{target}' references unknown provider '{}'",
                target.provider_id
            )));
        }
    }
    Ok(())
}

fn validate_scoring_config(config: &AppConfig) -> Result<()> {
    config
        .scoring
        .weights
        .validate()
        .map_err(|e| invalid(e.to_string()))?;
    config
        .scoring
        .to_scoring_config()
        .validate()
        .map_err(|e| invalid(e.to_string()))?;
    if let Some(model) = config.scoring.models.iter().find(|m| m.model_id.trim().is_empty()) {
        return Err(invalid(format!("Scoring model entry without model_id: {model:?}")));
    }
    Ok(())
}

fn validate_router_config(config: &AppConfig) -> Result<()> {
    if !(0.0..=1.0).contains(&config.router.half_open_factor) {
        return Err(invalid("Router half_open_factor must be within [0, 1]"));
    }
    if config.router.latency_window == 0 {
        return Err(invalid("Router latency window cannot be 0"));
    }
    Ok(())
}

fn validate_health_config(config: &AppConfig) -> Result<()> {
    if config.health.enabled && config.health.interval_secs == 0 {
        return Err(invalid("Health check interval cannot be 0 when enabled"));
    }
    Ok(())
}
