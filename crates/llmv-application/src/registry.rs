//! Provider Registry
//!
//! Explicit, owned registry of the providers taking part in a run. It is
//! built once from configuration and shared by reference with the
//! orchestrator, the circuit breakers and the router, so independent
//! registries can coexist (tests, reloads).

use llmv_domain::error::{Error, Result};
use llmv_domain::{Provider, ProviderId};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered set of registered providers
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<Provider>>,
    index: HashMap<ProviderId, usize>,
}

impl ProviderRegistry {
    /// Build a registry, validating every provider
    ///
    /// Declaration order is preserved and used as the router's final
    /// tie-break.
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Result<Self> {
        let mut registry = Self::default();
        for provider in providers {
            provider.validate()?;
            if registry.index.contains_key(&provider.id) {
                return Err(Error::invalid_argument(format!(
                    "provider '{}' is registered twice",
                    provider.id
                )));
            }
            registry
                .index
                .insert(provider.id.clone(), registry.providers.len());
            registry.providers.push(Arc::new(provider));
        }
        Ok(registry)
    }

    /// Look up a provider by id
    pub fn get(&self, id: &str) -> Option<&Arc<Provider>> {
        self.index.get(id).map(|position| &self.providers[*position])
    }

    /// Whether a provider is registered
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Declaration position of a provider
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Providers in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Provider>> {
        self.providers.iter()
    }

    /// Provider ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &ProviderId> {
        self.providers.iter().map(|provider| &provider.id)
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
