//! Error types for snippet resolution and rendering

use thiserror::Error;

use crate::error::TemplateError;
use crate::store::StoreError;

use super::variable::{ConversionError, VariableError};

/// Errors that can occur while resolving, updating or rendering snippets.
///
/// Every variant is fatal to the operation in progress. Errors raised while
/// expanding a nested snippet surface unchanged from the top-level call.
#[derive(Debug, Error)]
pub enum SnippetError {
    /// Snippet id not present in the catalog
    #[error("no definition found for snippet \"{id}\"")]
    UnknownSnippet { id: String },

    /// Two definitions share an id
    #[error("duplicate snippet definition: {id}")]
    DuplicateSnippet { id: String },

    /// Required variable with no supplied value and no default
    #[error("missing required variable \"{variable}\" for snippet \"{snippet}\"")]
    MissingRequiredVariable { snippet: String, variable: String },

    /// Supplied value could not be converted to the declared type
    #[error("invalid value for variable \"{variable}\" of snippet \"{snippet}\": {source}")]
    VariableConversion {
        snippet: String,
        variable: String,
        #[source]
        source: ConversionError,
    },

    /// A snippet marker refers back to a snippet already being expanded
    #[error("circular snippet reference detected: {}", chain.join(" -> "))]
    CyclicSnippetReference { chain: Vec<String> },

    /// Marker expansion went deeper than the configured limit
    #[error("snippet \"{id}\" exceeds the maximum nesting depth of {limit}")]
    NestingTooDeep { id: String, limit: usize },

    /// The render engine rejected the effective source of a snippet
    #[error("failed to render snippet \"{snippet}\": {source}")]
    Template {
        snippet: String,
        #[source]
        source: TemplateError,
    },

    /// The override store failed
    #[error("override store error: {0}")]
    Store(#[from] StoreError),
}

impl SnippetError {
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownSnippet { id: id.into() }
    }

    /// Attach the snippet id to a variable error
    pub fn from_variable(snippet: &str, err: VariableError) -> Self {
        match err {
            VariableError::Missing { variable } => Self::MissingRequiredVariable {
                snippet: snippet.to_string(),
                variable,
            },
            VariableError::Conversion { variable, source } => Self::VariableConversion {
                snippet: snippet.to_string(),
                variable,
                source,
            },
        }
    }
}
