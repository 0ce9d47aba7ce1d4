//! Tenant Snippets - reusable, tenant-overridable text templates
//!
//! This library holds a catalog of snippet definitions, lets each tenant
//! override a snippet's source, and renders snippets with typed variables and
//! recursive `###SNIPPET_<id>###` inclusion.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use tenant_snippets::{CatalogLoader, InMemoryOverrideStore, SnippetResolver};
//!
//! let catalog = CatalogLoader::new()
//!     .load_str(r#"
//!         [definitions.greeting]
//!         title = "Greeting"
//!         default_source = "A: ###SNIPPET_bee###"
//!
//!         [definitions.bee]
//!         title = "Bee"
//!         default_source = "bee"
//!     "#)
//!     .unwrap();
//!
//! let resolver = SnippetResolver::new(catalog, InMemoryOverrideStore::new());
//! let text = resolver.render("greeting", "tenant1", &HashMap::new()).unwrap();
//! assert_eq!(text, "A: bee");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod snippet;
pub mod store;

pub use config::{CatalogLoader, ConfigError};
pub use engine::{PlaceholderEngine, RenderEngine};
pub use error::TemplateError;
pub use snippet::{
    ConversionError, ConverterRegistry, ResolverConfig, Snippet, SnippetCatalog,
    SnippetDefinition, SnippetError, SnippetResolver, TypedValue, UpdateOutcome, ValueConverter,
    VariableDefinition, VariableType,
};
pub use store::{
    FileOverrideStore, InMemoryOverrideStore, SnippetOverride, SnippetOverrideStore, StoreError,
};
