//! Override store persisted to a TOML file
//!
//! The file groups overrides by tenant:
//!
//! ```toml
//! [tenants.acme]
//! welcome = "Hi from ACME, {name}!"
//! "emails.footer" = "ACME Inc."
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::memory::InMemoryOverrideStore;
use super::{SnippetOverride, SnippetOverrideStore, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlOverrides {
    #[serde(default)]
    tenants: BTreeMap<String, BTreeMap<String, String>>,
}

/// Overrides loaded from a TOML file and written back on every change
#[derive(Debug)]
pub struct FileOverrideStore {
    path: PathBuf,
    entries: InMemoryOverrideStore,
}

impl FileOverrideStore {
    /// Open the store at `path`. A missing file is an empty store; the file is
    /// created on the first change.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::parse(&content)?
        } else {
            InMemoryOverrideStore::new()
        };
        tracing::debug!(path = %path.display(), overrides = entries.len(), "opened override file");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(content: &str) -> Result<InMemoryOverrideStore, StoreError> {
        let parsed: TomlOverrides = toml::from_str(content)?;
        Ok(parsed
            .tenants
            .into_iter()
            .flat_map(|(tenant, snippets)| {
                snippets
                    .into_iter()
                    .map(move |(snippet, source)| SnippetOverride::new(tenant.clone(), snippet, source))
            })
            .collect())
    }

    /// Apply `change` to a copy of the entries, write the copy, then keep it.
    /// A failed write leaves the store as it was.
    fn commit<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut InMemoryOverrideStore) -> Result<(), StoreError>,
    {
        let mut candidate = self.entries.clone();
        change(&mut candidate)?;
        Self::persist(&self.path, &candidate)?;
        self.entries = candidate;
        Ok(())
    }

    fn persist(path: &Path, entries: &InMemoryOverrideStore) -> Result<(), StoreError> {
        let mut doc = TomlOverrides::default();
        for entry in entries.iter() {
            doc.tenants
                .entry(entry.tenant_id().to_string())
                .or_default()
                .insert(entry.snippet_id().to_string(), entry.source().to_string());
        }
        std::fs::write(path, toml::to_string(&doc)?)?;
        Ok(())
    }
}

impl SnippetOverrideStore for FileOverrideStore {
    fn find(
        &self,
        tenant_id: &str,
        snippet_id: &str,
    ) -> Result<Option<SnippetOverride>, StoreError> {
        self.entries.find(tenant_id, snippet_id)
    }

    fn add(&mut self, entry: SnippetOverride) -> Result<(), StoreError> {
        self.commit(|entries| entries.add(entry))
    }

    fn update(&mut self, entry: SnippetOverride) -> Result<(), StoreError> {
        self.commit(|entries| entries.update(entry))
    }

    fn remove(&mut self, entry: &SnippetOverride) -> Result<(), StoreError> {
        self.commit(|entries| entries.remove(entry))
    }

    fn all_for_tenant(&self, tenant_id: &str) -> Result<Vec<SnippetOverride>, StoreError> {
        self.entries.all_for_tenant(tenant_id)
    }
}
