//! Snippet catalog for storing and retrieving snippet definitions

use std::sync::Arc;

use indexmap::IndexMap;

use super::definition::SnippetDefinition;
use super::error::SnippetError;

/// All configured snippet definitions, indexed by id in declaration order.
///
/// Built once at startup and handed to the resolver; read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct SnippetCatalog {
    definitions: IndexMap<String, Arc<SnippetDefinition>>,
}

impl SnippetCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, keeping their order
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = SnippetDefinition>,
    ) -> Result<Self, SnippetError> {
        let mut catalog = Self::new();
        for def in definitions {
            catalog.register(def)?;
        }
        Ok(catalog)
    }

    /// Register a definition
    pub fn register(&mut self, def: SnippetDefinition) -> Result<(), SnippetError> {
        if self.definitions.contains_key(def.id()) {
            return Err(SnippetError::DuplicateSnippet {
                id: def.id().to_string(),
            });
        }
        self.definitions.insert(def.id().to_string(), Arc::new(def));
        Ok(())
    }

    /// Look up a definition by id
    pub fn definition(&self, id: &str) -> Result<Arc<SnippetDefinition>, SnippetError> {
        self.definitions
            .get(id)
            .cloned()
            .ok_or_else(|| SnippetError::unknown(id))
    }

    /// Check if a snippet exists
    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// All definitions in declaration order
    pub fn all_definitions(&self) -> impl Iterator<Item = &Arc<SnippetDefinition>> {
        self.definitions.values()
    }

    /// All snippet ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
