//! # LLM Verifier
//!
//! Verifies that LLM provider models exist, respond and support the
//! capabilities they claim, while keeping misbehaving providers from
//! stalling the run.
//!
//! This crate is the public facade: it re-exports the layer crates and
//! hosts the `llmv` command line tool.
//!
//! ## Example
//!
//! ```ignore
//! use llmv::infrastructure::{ConfigLoader, init_app};
//! use llmv::VerificationServiceInterface;
//!
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let results = context
//!     .service()
//!     .verify_all(context.targets()?, context.concurrency(), CancellationToken::new())
//!     .await?;
//! for result in &results {
//!     println!("{} {:?}", result.target, result.status);
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Entities, value objects, ports and errors
//! - `application` - Circuit breaker, retry, routing, scoring, orchestration
//! - `providers` - HTTP probe execution and result repositories
//! - `infrastructure` - Configuration, logging, health checks, composition root

/// Domain layer - core types and ports
pub mod domain {
    pub use llmv_domain::*;
}

/// Application layer - the verification and resilience engine
pub mod application {
    pub use llmv_application::*;
}

/// Provider implementations
pub mod providers {
    pub use llmv_providers::*;
}

/// Infrastructure layer - config, logging and composition root
pub mod infrastructure {
    pub use llmv_infrastructure::*;
}

/// Command line interface
pub mod cli;

/// Run reports
pub mod report;

pub use application::{ProviderRouter, VerificationServiceInterface};
pub use domain::*;
pub use report::{RouteReport, RunSummary, ScoredModel, VerificationReport};
