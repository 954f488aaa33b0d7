//! Configuration management
//!
//! Typed configuration sections and the layered [`ConfigLoader`].

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, validate_app_config};
pub use types::*;
