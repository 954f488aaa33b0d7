//! Domain entities
//!
//! Providers are registered once from external configuration; models are
//! addressed through [`ModelRef`] pairs.

/// Provider entity and its settings
pub mod provider;

/// (provider, model) reference
pub mod model_ref;

pub use model_ref::ModelRef;
pub use provider::{
    AuthScheme, CredentialRef, Provider, ProviderDialect, ProviderId, ProviderTimeouts,
    RateLimitSettings,
};
