//! # LLM Verifier Domain Layer
//!
//! Core types and contracts of the verification and resilience engine.
//! Nothing in this crate performs I/O: it describes providers, models,
//! probes, their classified failures, verification results, scores, and
//! the ports the outer layers implement.
//!
//! ## Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`entities`] | [`Provider`], [`ModelRef`] and their identifiers |
//! | [`value_objects`] | Probes, capabilities, results, scores, health snapshots |
//! | [`ports`] | [`ProbeExecutor`], [`VerificationResultRepository`], [`ModelMetadataProvider`] |
//! | [`error`] | Crate-spanning [`Error`] and [`Result`] |
//! | [`constants`] | Scoring ranges, default weights, capability importance |

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use entities::{
    AuthScheme, CredentialRef, ModelRef, Provider, ProviderDialect, ProviderId,
    ProviderTimeouts, RateLimitSettings,
};
pub use error::{Error, Result};
pub use ports::{ModelMetadataProvider, ProbeExecutor, VerificationResultRepository};
pub use value_objects::{
    Capability, CapabilityReport, CircuitFailurePolicy, CircuitSnapshot, CircuitState,
    CodeLanguage, ComprehensiveScore, LatencySnapshot, ModelMetadata, ProbeError,
    ProbeErrorKind, ProbeKind, ProbeOutcome, ScoreComponents, ScoreWeights, VerificationResult,
    VerificationStatus,
};
