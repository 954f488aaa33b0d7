//! HTTP Client Configuration
//!
//! Pool settings shared by every provider client. The executor builds one
//! client per provider so that each can carry its own connect timeout.

pub mod client;

pub use client::{HttpClientConfig, build_client};
