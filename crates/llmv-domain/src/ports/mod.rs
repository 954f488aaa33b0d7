//! Ports
//!
//! Contracts the outer layers implement.
//!
//! | Port | Description |
//! |------|-------------|
//! | [`ProbeExecutor`] | One bounded HTTP probe against one model |
//! | [`ModelMetadataProvider`] | Static model facts for scoring |
//! | [`VerificationResultRepository`] | Store and read verification results |

/// Probe execution and metadata ports
pub mod providers;
/// Result persistence port
pub mod repositories;

pub use providers::{ModelMetadataProvider, ProbeExecutor};
pub use repositories::VerificationResultRepository;
