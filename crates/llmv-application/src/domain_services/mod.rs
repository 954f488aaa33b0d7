//! Domain services
//!
//! Pure decision logic (scoring, verification policy) and the
//! orchestrator's interface.

pub mod policy;
pub mod scoring;
pub mod verification;

pub use policy::{VerificationMode, VerificationPolicy};
pub use scoring::{ScoringConfig, ScoringEngine};
pub use verification::VerificationServiceInterface;
