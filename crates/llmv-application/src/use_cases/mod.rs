//! Use Cases - Application service implementations
//!
//! Concrete implementations of the service interfaces declared in
//! [`crate::domain_services`].

pub mod verification_service;

pub use verification_service::{InlineScoring, VerificationServiceImpl, VerificationSettings};
