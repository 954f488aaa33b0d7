//! HTTP client construction

use crate::constants::{HTTP_IDLE_TIMEOUT_SECS, HTTP_KEEPALIVE_SECS, HTTP_MAX_IDLE_PER_HOST};
use llmv_domain::constants::PROVIDER_CONNECT_TIMEOUT_SECS;
use llmv_domain::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration
///
/// Controls connection pooling and connect behaviour. Whole-request
/// deadlines are applied per probe, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub max_idle_per_host: usize,
    /// Idle connection timeout
    pub idle_timeout: Duration,
    /// TCP keep-alive duration
    pub keepalive: Duration,
    /// Default TCP connect timeout
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: HTTP_MAX_IDLE_PER_HOST,
            idle_timeout: Duration::from_secs(HTTP_IDLE_TIMEOUT_SECS),
            keepalive: Duration::from_secs(HTTP_KEEPALIVE_SECS),
            connect_timeout: Duration::from_secs(PROVIDER_CONNECT_TIMEOUT_SECS),
            user_agent: format!("llmv/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Same pool settings with another connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

/// Build a pooled reqwest client
pub fn build_client(config: &HttpClientConfig) -> Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(config.max_idle_per_host)
        .pool_idle_timeout(config.idle_timeout)
        .tcp_keepalive(config.keepalive)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::network_with_source("failed to build HTTP client", e.without_url()))
}
