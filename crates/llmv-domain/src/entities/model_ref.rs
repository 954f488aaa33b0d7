//! Model reference

use super::ProviderId;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity: one testable (provider, model) pair
///
/// Rendered and parsed as `provider/model`. Only the first `/` separates
/// the two parts, so model ids such as `meta-llama/Llama-3-70b` survive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelRef {
    /// Provider serving the model
    pub provider_id: ProviderId,
    /// Model identifier as the provider names it
    pub model_id: String,
}

impl ModelRef {
    /// Create a model reference
    pub fn new(provider_id: impl Into<ProviderId>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
        }
    }

    /// Reject empty identifiers
    pub fn validate(&self) -> Result<()> {
        if self.provider_id.is_empty() {
            return Err(Error::invalid_argument(format!(
                "model reference '{self}' has an empty provider id"
            )));
        }
        if self.model_id.trim().is_empty() {
            return Err(Error::invalid_argument(format!(
                "model reference '{self}' has an empty model id"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider_id, self.model_id)
    }
}

impl FromStr for ModelRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (provider, model) = s.split_once('/').ok_or_else(|| {
            Error::invalid_argument(format!("'{s}' is not of the form provider/model"))
        })?;
        let target = Self::new(provider.trim(), model.trim());
        target.validate()?;
        Ok(target)
    }
}
