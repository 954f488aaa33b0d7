//! Provider routing
//!
//! Latency history plus weighted selection among healthy providers.

pub mod latency;
pub mod router;

pub use latency::LatencyTracker;
pub use router::{
    ProviderRouter, RankedProvider, RouterConfig, WeightedRouter, candidates_for_model,
};
