//! Snippet definitions and resolved snippets

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::variable::{TypedValue, VariableDefinition, VariableError};

/// A configured snippet: id, title, default source and declared variables
#[derive(Debug, Clone)]
pub struct SnippetDefinition {
    id: String,
    title: String,
    default_source: String,
    /// Variable definitions in declaration order
    variables: IndexMap<String, VariableDefinition>,
}

impl SnippetDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        default_source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            default_source: default_source.into(),
            variables: IndexMap::new(),
        }
    }

    /// Declare a variable. A later declaration with the same name replaces the
    /// earlier one but keeps its position.
    pub fn with_variable(mut self, variable: VariableDefinition) -> Self {
        self.variables.insert(variable.name().to_string(), variable);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = &VariableDefinition> {
        self.variables.values()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Convert supplied raw values against every declared variable.
    ///
    /// Supplied names without a declaration are dropped, so the result holds
    /// exactly one entry per declared variable.
    pub fn convert_variables(
        &self,
        supplied: &HashMap<String, String>,
    ) -> Result<HashMap<String, TypedValue>, VariableError> {
        self.variables
            .values()
            .map(|def| {
                let value = def.convert(supplied.get(def.name()).map(String::as_str))?;
                Ok::<_, VariableError>((def.name().to_string(), value))
            })
            .collect()
    }
}

/// A definition paired with the source text in effect for one tenant.
///
/// Built fresh for every request and never cached.
#[derive(Debug, Clone)]
pub struct Snippet {
    definition: Arc<SnippetDefinition>,
    source: String,
    overridden: bool,
}

impl Snippet {
    pub fn new(definition: Arc<SnippetDefinition>, source: String, overridden: bool) -> Self {
        Self {
            definition,
            source,
            overridden,
        }
    }

    pub fn id(&self) -> &str {
        self.definition.id()
    }

    pub fn title(&self) -> &str {
        self.definition.title()
    }

    /// The effective source: the tenant override, or the default
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the source comes from a tenant override
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    pub fn definition(&self) -> &Arc<SnippetDefinition> {
        &self.definition
    }
}
