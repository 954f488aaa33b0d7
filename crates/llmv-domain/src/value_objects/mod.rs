//! Value Objects
//!
//! Immutable values exchanged between the probe executor, the resilience
//! layer, the orchestrator and the scoring engine.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ProbeError`] | Classified provider failure ([`ProbeErrorKind`]) |
//! | [`Capability`] | Closed set of probe-able capabilities |
//! | [`ProbeOutcome`] | Result of one probe attempt |
//! | [`VerificationResult`] | One record per verified (provider, model) pair |
//! | [`ComprehensiveScore`] | Weighted aggregate score with breakdown |
//! | [`CircuitSnapshot`] / [`LatencySnapshot`] | Read-only provider health views |

/// Capability catalogue
pub mod capability;
/// Circuit and latency health snapshots
pub mod health;
/// Static model metadata used by scoring
pub mod metadata;
/// Probe kinds and outcomes
pub mod probe;
/// Probe failure taxonomy
pub mod probe_error;
/// Score components, weights and aggregate
pub mod score;
/// Verification status and result
pub mod verification;

pub use capability::{Capability, CapabilityReport, CodeLanguage};
pub use health::{CircuitSnapshot, CircuitState, LatencySnapshot};
pub use metadata::ModelMetadata;
pub use probe::{ProbeKind, ProbeOutcome};
pub use probe_error::{CircuitFailurePolicy, ProbeError, ProbeErrorKind};
pub use score::{ComprehensiveScore, ScoreComponents, ScoreWeights, clamp_score, format_score_suffix};
pub use verification::{VerificationResult, VerificationStatus};
