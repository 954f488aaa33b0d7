//! # LLM Verifier - Provider Implementations
//!
//! Concrete implementations of the ports defined in `llmv-domain`.
//!
//! | Port | Implementations |
//! |------|-----------------|
//! | `ProbeExecutor` | [`HttpProbeExecutor`] over the [`ProviderAdapter`] dialects |
//! | `VerificationResultRepository` | [`InMemoryVerificationRepository`], [`JsonlVerificationRepository`] |
//!
//! ## Dialects
//!
//! Each provider declares a dialect at registration time. The executor
//! looks up the matching adapter, which knows how to express every probe
//! kind as one HTTP request and how to read the answer:
//!
//! - [`OpenAiAdapter`]: `/models`, `/chat/completions`, `/embeddings`
//! - [`AnthropicAdapter`]: `/v1/models/{id}`, `/v1/messages`
//!
//! ## Usage
//!
//! ```ignore
//! use llmv_providers::{HttpClientConfig, HttpProbeExecutor};
//!
//! let executor = HttpProbeExecutor::new(HttpClientConfig::default());
//! let outcome = executor.probe(&provider, &target, &ProbeKind::Existence, deadline).await?;
//! ```

pub use llmv_domain::error::{Error, Result};
pub use llmv_domain::ports::{ProbeExecutor, VerificationResultRepository};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// HTTP client configuration
pub mod http;

/// Provider dialect adapters
pub mod adapters;

/// HTTP probe executor
pub mod executor;

/// Verification result repositories
pub mod repository;

pub use adapters::{AnthropicAdapter, OpenAiAdapter, ProviderAdapter, adapter_for};
pub use executor::HttpProbeExecutor;
pub use http::{HttpClientConfig, build_client};
pub use repository::{InMemoryVerificationRepository, JsonlVerificationRepository};
