//! Snippet definitions, the catalog and the resolver
//!
//! A snippet is a named piece of template source that a tenant may override.
//! Its definition declares typed variables; rendering converts supplied values
//! against those declarations, interpolates them, and replaces embedded
//! markers with other rendered snippets.
//!
//! # Example
//!
//! ```text
//! [definitions.welcome]
//! title = "Welcome"
//! default_source = "Hello {name}! ###SNIPPET_footer###"
//!
//! [definitions.welcome.variables.name]
//! type = "string"
//! required = true
//! ```

mod catalog;
mod config;
mod definition;
mod error;
pub mod marker;
mod resolver;
mod variable;

pub use catalog::SnippetCatalog;
pub use config::ResolverConfig;
pub use definition::{Snippet, SnippetDefinition};
pub use error::SnippetError;
pub use resolver::{SnippetResolver, UpdateOutcome};
pub use variable::{
    ConversionError, ConverterRegistry, TypedValue, ValueConverter, VariableDefinition,
    VariableError, VariableType,
};
