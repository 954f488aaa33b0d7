//! Static model catalog
//!
//! Serves [`ModelMetadata`] from the `[[scoring.models]]` configuration
//! entries. Lookups are exact first, then case-insensitive.

use llmv_domain::ModelMetadata;
use llmv_domain::ports::ModelMetadataProvider;
use std::collections::HashMap;

/// In-memory metadata catalog
#[derive(Debug, Clone, Default)]
pub struct StaticModelCatalog {
    models: HashMap<String, ModelMetadata>,
}

impl StaticModelCatalog {
    /// Build a catalog; later entries replace earlier ones with the same id
    pub fn new(models: impl IntoIterator<Item = ModelMetadata>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|model| (model.model_id.clone(), model))
                .collect(),
        }
    }

    /// Add or replace one entry
    #[must_use]
    pub fn with_model(mut self, model: ModelMetadata) -> Self {
        self.models.insert(model.model_id.clone(), model);
        self
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelMetadataProvider for StaticModelCatalog {
    fn metadata(&self, model_id: &str) -> Option<ModelMetadata> {
        self.models
            .get(model_id)
            .or_else(|| {
                self.models
                    .values()
                    .find(|m| m.model_id.eq_ignore_ascii_case(model_id))
            })
            .cloned()
    }
}
