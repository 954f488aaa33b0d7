//! Provider declarations

use llmv_domain::constants::{
    PROVIDER_CONNECT_TIMEOUT_SECS, PROVIDER_DEFAULT_WEIGHT, PROVIDER_REQUEST_TIMEOUT_SECS,
};
use llmv_domain::{
    AuthScheme, CredentialRef, Provider, ProviderDialect, ProviderTimeouts, RateLimitSettings,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One `[[providers]]` entry
///
/// The credential comes either from `api_key` directly or from the
/// environment variable named by `api_key_env`. It is wrapped in a
/// [`CredentialRef`] on deserialization and prints redacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Unique provider name
    pub name: String,
    /// Base endpoint URL
    pub base_url: String,
    /// Inline credential
    pub api_key: CredentialRef,
    /// Environment variable holding the credential
    pub api_key_env: Option<String>,
    /// Auth header scheme
    pub auth_scheme: AuthScheme,
    /// Request dialect
    pub dialect: ProviderDialect,
    /// Static routing weight
    pub weight: f64,
    /// Sustained requests per minute, 0 for unlimited
    pub requests_per_minute: u32,
    /// Burst above the sustained rate
    pub burst: u32,
    /// Whole-request deadline in seconds
    pub request_timeout_secs: u64,
    /// TCP connect deadline in seconds
    pub connect_timeout_secs: u64,
    /// Model probed by the periodic health checker
    pub health_check_model: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_url: String::new(),
            api_key: CredentialRef::default(),
            api_key_env: None,
            auth_scheme: AuthScheme::default(),
            dialect: ProviderDialect::default(),
            weight: PROVIDER_DEFAULT_WEIGHT,
            requests_per_minute: 0,
            burst: 0,
            request_timeout_secs: PROVIDER_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: PROVIDER_CONNECT_TIMEOUT_SECS,
            health_check_model: None,
        }
    }
}

impl ProviderConfig {
    /// Credential to use, preferring the inline key
    pub fn credential(&self) -> CredentialRef {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        self.api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .map(CredentialRef::new)
            .unwrap_or_default()
    }

    /// Build the provider entity
    pub fn to_provider(&self) -> Provider {
        let mut provider = Provider::new(self.name.as_str(), self.base_url.as_str())
            .with_credential(self.credential())
            .with_auth_scheme(self.auth_scheme)
            .with_dialect(self.dialect)
            .with_weight(self.weight)
            .with_rate_limit(RateLimitSettings::new(self.requests_per_minute, self.burst))
            .with_timeouts(ProviderTimeouts {
                request: Duration::from_secs(self.request_timeout_secs),
                connect: Duration::from_secs(self.connect_timeout_secs),
            });
        if let Some(model) = &self.health_check_model {
            provider = provider.with_health_check_model(model.as_str());
        }
        provider
    }
}
