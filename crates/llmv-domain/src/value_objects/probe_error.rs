//! Probe failure taxonomy
//!
//! Every failure a probe can observe is mapped onto one [`ProbeErrorKind`].
//! The kind alone decides whether the retry policy tries again and whether
//! the circuit breaker counts the failure against the provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Classified failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    /// Connection refused/reset, DNS failure
    Transport,
    /// Deadline exceeded (locally or HTTP 408)
    Timeout,
    /// HTTP 429
    RateLimited,
    /// HTTP 5xx, including 529 overloaded
    ServerError,
    /// HTTP 401/403
    AuthError,
    /// HTTP 404, model absent
    NotFound,
    /// HTTP 400/422 and other 4xx
    InvalidRequest,
    /// Provider answered but did not exhibit the probed capability
    Unsupported,
    /// Generated locally while the provider's circuit is open
    CircuitOpen,
    /// Response body did not match the dialect's contract
    MalformedResponse,
    /// Interrupted by cancellation
    Cancelled,
}

impl ProbeErrorKind {
    /// Map an HTTP status code onto a failure kind
    ///
    /// Callers only pass non-success statuses; anything outside 4xx/5xx
    /// (redirects the client refused to follow, informational codes) is
    /// reported as a malformed response.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AuthError,
            404 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            400..=499 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::MalformedResponse,
        }
    }

    /// Whether the retry policy may try again
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Transport | Self::Timeout | Self::RateLimited | Self::ServerError
        )
    }

    /// Whether this failure counts against the provider's circuit
    pub fn counts_as_circuit_failure(self, policy: &CircuitFailurePolicy) -> bool {
        match self {
            Self::Transport | Self::Timeout | Self::ServerError => true,
            Self::RateLimited => policy.count_rate_limited,
            Self::AuthError => policy.count_auth_errors,
            Self::NotFound
            | Self::InvalidRequest
            | Self::Unsupported
            | Self::CircuitOpen
            | Self::MalformedResponse
            | Self::Cancelled => false,
        }
    }

    /// Whether the failure was produced locally without a provider round trip
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::CircuitOpen | Self::Cancelled)
    }

    /// Stable label used in logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::AuthError => "auth_error",
            Self::NotFound => "not_found",
            Self::InvalidRequest => "invalid_request",
            Self::Unsupported => "unsupported",
            Self::CircuitOpen => "circuit_open",
            Self::MalformedResponse => "malformed_response",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ambiguous failure kinds feed the circuit breaker
///
/// Transport, timeout and 5xx failures always count. Authentication errors
/// indicate static misconfiguration and are excluded unless enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitFailurePolicy {
    /// Count 401/403 as circuit failures
    pub count_auth_errors: bool,
    /// Count 429 as circuit failures
    pub count_rate_limited: bool,
}

impl Default for CircuitFailurePolicy {
    fn default() -> Self {
        Self {
            count_auth_errors: false,
            count_rate_limited: true,
        }
    }
}

/// Value Object: Classified Probe Failure
///
/// Messages are built by the probe executor from status codes and response
/// excerpts; they never contain request headers or credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct ProbeError {
    /// Failure category
    pub kind: ProbeErrorKind,
    /// Human-readable detail
    pub message: String,
    /// HTTP status, when the provider answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Server-requested delay before retrying, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl ProbeError {
    /// Create a classified error
    pub fn new(kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retry_after_secs: None,
        }
    }

    /// Classify an HTTP error status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::from_status(status), message).with_status(status)
    }

    /// Attach the HTTP status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a `Retry-After` hint
    #[must_use]
    pub fn with_retry_after_secs(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }

    /// Server-requested retry delay
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_secs.map(Duration::from_secs)
    }

    /// Transport failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::Transport, message)
    }

    /// Deadline exceeded
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::Timeout, message)
    }

    /// Short-circuited by an open circuit
    pub fn circuit_open(provider: impl fmt::Display) -> Self {
        Self::new(
            ProbeErrorKind::CircuitOpen,
            format!("circuit open for provider '{provider}'"),
        )
    }

    /// Interrupted by cancellation
    pub fn cancelled() -> Self {
        Self::new(ProbeErrorKind::Cancelled, "operation cancelled")
    }

    /// Capability not exhibited or not expressible
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::Unsupported, message)
    }

    /// Response did not match the expected shape
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::MalformedResponse, message)
    }

    /// Model absent
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::NotFound, message)
    }

    /// Request rejected as invalid
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProbeErrorKind::InvalidRequest, message)
    }

    /// See [`ProbeErrorKind::is_retryable`]
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
