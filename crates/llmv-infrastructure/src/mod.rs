//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that wire the verification engine
//! together.
//!
//! ## Module Categories
//!
//! ### Configuration & Composition
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered TOML + environment configuration (figment) |
//! | [`bootstrap`] | Composition root building [`AppContext`] |
//! | [`constants`] | Centralized infrastructure constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`health`] | Periodic provider health probing |
//!
//! ### Data
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Static model metadata from configuration |

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod health;
pub mod logging;

pub use bootstrap::{AppContext, init_app};
pub use catalog::StaticModelCatalog;
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use health::{HealthChecker, ProviderHealth};
