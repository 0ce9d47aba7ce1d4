//! Per-tenant snippet overrides
//!
//! An override replaces the whole default source of one snippet for one tenant.
//! The resolver only talks to storage through [`SnippetOverrideStore`]; the crate
//! ships an in-memory store and a TOML file store.

mod file;
mod memory;

use thiserror::Error;

pub use file::FileOverrideStore;
pub use memory::InMemoryOverrideStore;

/// Errors raised by override stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("override already exists for snippet \"{snippet_id}\" and tenant \"{tenant_id}\"")]
    AlreadyExists { tenant_id: String, snippet_id: String },

    #[error("no override for snippet \"{snippet_id}\" and tenant \"{tenant_id}\"")]
    NotFound { tenant_id: String, snippet_id: String },

    #[error("failed to access override file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse override file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize overrides: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Custom source for one snippet, bound to one tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOverride {
    tenant_id: String,
    snippet_id: String,
    source: String,
}

impl SnippetOverride {
    pub fn new(
        tenant_id: impl Into<String>,
        snippet_id: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            snippet_id: snippet_id.into(),
            source: source.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn snippet_id(&self) -> &str {
        &self.snippet_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the source text, keeping the key
    pub fn update(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }
}

/// Keyed storage of overrides by (tenant, snippet).
///
/// `add` fails if the key exists; `update` and `remove` fail if it does not.
pub trait SnippetOverrideStore {
    fn find(&self, tenant_id: &str, snippet_id: &str)
        -> Result<Option<SnippetOverride>, StoreError>;

    fn add(&mut self, entry: SnippetOverride) -> Result<(), StoreError>;

    fn update(&mut self, entry: SnippetOverride) -> Result<(), StoreError>;

    fn remove(&mut self, entry: &SnippetOverride) -> Result<(), StoreError>;

    /// All overrides of one tenant, ordered by snippet id
    fn all_for_tenant(&self, tenant_id: &str) -> Result<Vec<SnippetOverride>, StoreError>;
}
