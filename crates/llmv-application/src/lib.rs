//! Application Layer - LLM Verifier
//!
//! The verification and resilience engine: everything between "a list of
//! (provider, model) pairs" and "one typed result per pair".
//!
//! ## Architecture
//!
//! ```text
//! VerificationServiceImpl ──► RetryPolicy ──► RateLimiterRegistry
//!          │                       │                 │
//!          │                       ▼                 ▼
//!          │               CircuitBreakerRegistry ─► ProbeExecutor (port)
//!          │                       │
//!          ▼                       ▼
//!   ScoringEngine           LatencyTracker ──► WeightedRouter
//! ```
//!
//! - [`resilience`]: circuit breaker, retry policy, token-bucket rate limiting
//! - [`routing`]: latency history and weighted provider selection
//! - [`domain_services`]: scoring engine, verification policy, service interfaces
//! - [`use_cases`]: the verification orchestrator
//!
//! ## Dependencies
//!
//! This crate depends only on `llmv-domain` and runtime libraries; HTTP
//! probing is injected through the [`ProbeExecutor`](llmv_domain::ProbeExecutor)
//! port.

pub mod domain_services;
pub mod registry;
pub mod resilience;
pub mod routing;
pub mod telemetry;
pub mod use_cases;

pub use domain_services::*;
pub use registry::ProviderRegistry;
pub use resilience::*;
pub use routing::*;
pub use use_cases::*;
