//! Static model metadata
//!
//! Facts about a model that probes cannot observe: size, context window,
//! pricing and release date. Supplied by configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value Object: Static Model Metadata
///
/// Every field except `model_id` is optional; missing facts make the
/// corresponding score component neutral rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    /// Model identifier
    pub model_id: String,
    /// Parameter count
    pub parameter_count: Option<u64>,
    /// Context window in tokens
    pub context_window: Option<u64>,
    /// USD per million input tokens
    pub input_price_per_million: Option<f64>,
    /// USD per million output tokens
    pub output_price_per_million: Option<f64>,
    /// Public release date
    pub release_date: Option<NaiveDate>,
    /// Whether weights are openly available
    pub open_source: bool,
}

impl ModelMetadata {
    /// Metadata with nothing known but the id
    pub fn unknown(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Self::default()
        }
    }

    /// Mean of the known input/output prices
    pub fn blended_price_per_million(&self) -> Option<f64> {
        match (self.input_price_per_million, self.output_price_per_million) {
            (Some(input), Some(output)) => Some((input + output) / 2.0),
            (Some(price), None) | (None, Some(price)) => Some(price),
            (None, None) => None,
        }
    }

    /// Context tokens per billion parameters
    pub fn context_per_billion_params(&self) -> Option<f64> {
        let params = self.parameter_count.filter(|p| *p > 0)?;
        let context = self.context_window?;
        Some(context as f64 / (params as f64 / 1e9))
    }
}
