//! Provider entity
//!
//! A provider is one external LLM API endpoint. Its identity and settings
//! come from configuration and are never mutated by the engine; health
//! is tracked separately by the circuit breaker and latency tracker.

use crate::constants::{
    PROVIDER_CONNECT_TIMEOUT_SECS, PROVIDER_DEFAULT_WEIGHT, PROVIDER_REQUEST_TIMEOUT_SECS,
    REDACTED,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

/// Unique provider name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Create a provider id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (invalid)
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProviderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ProviderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProviderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Opaque credential reference
///
/// The wrapped secret is only reachable through [`CredentialRef::expose`],
/// which the HTTP layer calls when it attaches the auth header. `Debug` and
/// `Serialize` render a placeholder so credentials cannot leak into logs,
/// persisted results, or printed configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialRef(String);

impl CredentialRef {
    /// Wrap a secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Access the secret for building an outbound request
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether no credential was configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace every occurrence of the secret in `text` with a placeholder
    ///
    /// Provider error bodies often echo the key they rejected.
    pub fn scrub(&self, text: &str) -> String {
        if self.0.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.0, REDACTED)
        }
    }
}

impl fmt::Debug for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("CredentialRef(<empty>)")
        } else {
            write!(f, "CredentialRef({REDACTED})")
        }
    }
}

impl Serialize for CredentialRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serializer.serialize_str("")
        } else {
            serializer.serialize_str(REDACTED)
        }
    }
}

impl<'de> Deserialize<'de> for CredentialRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // A saved configuration carries the placeholder, never the key
        let secret = String::deserialize(deserializer)?;
        if secret == REDACTED {
            Ok(Self::default())
        } else {
            Ok(Self(secret))
        }
    }
}

/// How the credential is attached to requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <credential>`
    #[default]
    Bearer,
    /// `x-api-key: <credential>`
    ApiKeyHeader,
    /// No authentication (local endpoints)
    None,
}

/// Request/response dialect spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProviderDialect {
    /// OpenAI-compatible chat completions API
    #[default]
    #[serde(rename = "openai", alias = "openai_compatible")]
    OpenAiCompatible,
    /// Anthropic messages API
    #[serde(rename = "anthropic")]
    Anthropic,
}

impl fmt::Display for ProviderDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAiCompatible => f.write_str("openai"),
            Self::Anthropic => f.write_str("anthropic"),
        }
    }
}

/// Outbound rate limit for one provider
///
/// A `requests_per_minute` of zero disables limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Sustained requests per minute
    pub requests_per_minute: u32,
    /// Maximum burst above the sustained rate
    pub burst: u32,
}

impl RateLimitSettings {
    /// Create rate limit settings
    pub fn new(requests_per_minute: u32, burst: u32) -> Self {
        Self {
            requests_per_minute,
            burst,
        }
    }

    /// Whether requests are not limited at all
    pub fn is_unlimited(&self) -> bool {
        self.requests_per_minute == 0
    }
}

/// Declared timeouts of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    /// Whole-request deadline
    pub request: Duration,
    /// TCP connect deadline
    pub connect: Duration,
}

impl Default for ProviderTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(PROVIDER_REQUEST_TIMEOUT_SECS),
            connect: Duration::from_secs(PROVIDER_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Entity: External LLM Provider
///
/// ## Business Rules
///
/// - `id` is non-empty and unique within a registry
/// - `base_url` is an absolute http(s) URL
/// - `weight` is finite and non-negative
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name
    pub id: ProviderId,
    /// Base endpoint URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Credential reference (never logged)
    pub credential: CredentialRef,
    /// Auth header scheme
    pub auth_scheme: AuthScheme,
    /// Request dialect
    pub dialect: ProviderDialect,
    /// Static routing weight
    pub weight: f64,
    /// Outbound rate limit
    pub rate_limit: RateLimitSettings,
    /// Declared timeouts
    pub timeouts: ProviderTimeouts,
    /// Model used by the periodic health checker, if any
    pub health_check_model: Option<String>,
}

impl Provider {
    /// Create a provider with default settings
    pub fn new(id: impl Into<ProviderId>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            credential: CredentialRef::default(),
            auth_scheme: AuthScheme::default(),
            dialect: ProviderDialect::default(),
            weight: PROVIDER_DEFAULT_WEIGHT,
            rate_limit: RateLimitSettings::default(),
            timeouts: ProviderTimeouts::default(),
            health_check_model: None,
        }
    }

    /// Set the credential
    #[must_use]
    pub fn with_credential(mut self, credential: CredentialRef) -> Self {
        self.credential = credential;
        self
    }

    /// Set the auth scheme
    #[must_use]
    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Set the dialect
    #[must_use]
    pub fn with_dialect(mut self, dialect: ProviderDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the routing weight
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the rate limit
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitSettings) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set the timeouts
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: ProviderTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the model probed by the health checker
    #[must_use]
    pub fn with_health_check_model(mut self, model: impl Into<String>) -> Self {
        self.health_check_model = Some(model.into());
        self
    }

    /// Join a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Check the business rules
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::invalid_argument("provider id must not be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::invalid_argument(format!(
                "provider '{}' base_url must be an http(s) URL",
                self.id
            )));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::invalid_argument(format!(
                "provider '{}' weight must be a non-negative number",
                self.id
            )));
        }
        Ok(())
    }
}
