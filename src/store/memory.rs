//! In-memory override store

use std::collections::BTreeMap;

use super::{SnippetOverride, SnippetOverrideStore, StoreError};

type Key = (String, String);

/// Overrides kept in a map keyed by (tenant, snippet)
#[derive(Debug, Default, Clone)]
pub struct InMemoryOverrideStore {
    entries: BTreeMap<Key, SnippetOverride>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All overrides ordered by tenant, then snippet
    pub fn iter(&self) -> impl Iterator<Item = &SnippetOverride> {
        self.entries.values()
    }

    fn key(entry: &SnippetOverride) -> Key {
        (entry.tenant_id().to_string(), entry.snippet_id().to_string())
    }

    fn not_found(entry: &SnippetOverride) -> StoreError {
        StoreError::NotFound {
            tenant_id: entry.tenant_id().to_string(),
            snippet_id: entry.snippet_id().to_string(),
        }
    }
}

impl FromIterator<SnippetOverride> for InMemoryOverrideStore {
    fn from_iter<I: IntoIterator<Item = SnippetOverride>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|entry| (Self::key(&entry), entry))
                .collect(),
        }
    }
}

impl SnippetOverrideStore for InMemoryOverrideStore {
    fn find(
        &self,
        tenant_id: &str,
        snippet_id: &str,
    ) -> Result<Option<SnippetOverride>, StoreError> {
        Ok(self
            .entries
            .get(&(tenant_id.to_string(), snippet_id.to_string()))
            .cloned())
    }

    fn add(&mut self, entry: SnippetOverride) -> Result<(), StoreError> {
        let key = Self::key(&entry);
        if self.entries.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                tenant_id: key.0,
                snippet_id: key.1,
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    fn update(&mut self, entry: SnippetOverride) -> Result<(), StoreError> {
        match self.entries.get_mut(&Self::key(&entry)) {
            Some(existing) => {
                *existing = entry;
                Ok(())
            }
            None => Err(Self::not_found(&entry)),
        }
    }

    fn remove(&mut self, entry: &SnippetOverride) -> Result<(), StoreError> {
        self.entries
            .remove(&Self::key(entry))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(entry))
    }

    fn all_for_tenant(&self, tenant_id: &str) -> Result<Vec<SnippetOverride>, StoreError> {
        Ok(self
            .entries
            .values()
            .filter(|entry| entry.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }
}
