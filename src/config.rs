//! Loading the snippet catalog from TOML configuration
//!
//! Each entry under `[definitions]` becomes one [`SnippetDefinition`]. Variable
//! types are resolved and defaults converted while loading, so a bad
//! configuration fails at startup rather than on the first render.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::snippet::{
    ConversionError, ConverterRegistry, SnippetCatalog, SnippetDefinition, SnippetError,
    VariableDefinition, VariableType,
};

/// Errors that can occur when loading the catalog configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("unknown type \"{type_tag}\" for variable \"{variable}\" of snippet \"{snippet}\"")]
    UnknownVariableType {
        snippet: String,
        variable: String,
        type_tag: String,
    },

    #[error("invalid default for variable \"{variable}\" of snippet \"{snippet}\": {reason}")]
    InvalidDefault {
        snippet: String,
        variable: String,
        reason: String,
    },

    #[error("template root path \"{}\" does not exist", path.display())]
    TemplateRootMissing { path: PathBuf },

    #[error("failed to read template file {}: {message}", path.display())]
    TemplateFile { path: PathBuf, message: String },

    #[error(transparent)]
    Catalog(#[from] SnippetError),
}

/// TOML structure for deserializing the catalog
#[derive(Deserialize)]
struct TomlCatalog {
    template_root: Option<PathBuf>,
    #[serde(default)]
    definitions: IndexMap<String, TomlDefinition>,
}

#[derive(Deserialize)]
struct TomlDefinition {
    #[serde(default)]
    title: String,
    #[serde(default, alias = "defaultSource")]
    default_source: Option<String>,
    #[serde(default, alias = "variable_definitions", alias = "variableDefinitions")]
    variables: IndexMap<String, TomlVariable>,
}

#[derive(Deserialize)]
struct TomlVariable {
    #[serde(rename = "type", default = "default_type_tag")]
    type_tag: String,
    #[serde(default)]
    required: bool,
    #[serde(default, alias = "defaultValue")]
    default: Option<toml::Value>,
}

fn default_type_tag() -> String {
    "string".to_string()
}

/// Builds a [`SnippetCatalog`] from TOML
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    converters: ConverterRegistry,
    /// Base path for resolving a relative `template_root`
    base_path: Option<PathBuf>,
}

impl CatalogLoader {
    /// Create a loader that only knows the built-in variable types
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a registry of custom variable converters
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Resolve a relative `template_root` against `base_path`
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Load a catalog from a TOML file. A relative `template_root` is resolved
    /// against the file's directory unless a base path was set.
    pub fn load_file(&self, path: &Path) -> Result<SnippetCatalog, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match (&self.base_path, path.parent()) {
            (None, Some(parent)) => self
                .clone()
                .with_base_path(parent)
                .load_str(&content),
            _ => self.load_str(&content),
        }
    }

    /// Load a catalog from a TOML string
    pub fn load_str(&self, content: &str) -> Result<SnippetCatalog, ConfigError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        let template_root = parsed.template_root.as_deref().map(|p| self.resolve_path(p));

        let mut catalog = SnippetCatalog::new();
        for (id, raw) in parsed.definitions {
            let definition = self.build_definition(&id, raw, template_root.as_deref())?;
            catalog.register(definition)?;
        }

        tracing::debug!(snippets = catalog.len(), "loaded snippet catalog");
        Ok(catalog)
    }

    fn resolve_path(&self, relative: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(relative),
            None => relative.to_path_buf(),
        }
    }

    fn build_definition(
        &self,
        id: &str,
        raw: TomlDefinition,
        template_root: Option<&Path>,
    ) -> Result<SnippetDefinition, ConfigError> {
        let default_source = match raw.default_source {
            Some(source) => source,
            None => match template_root {
                Some(root) => load_default_source(root, id)?,
                None => String::new(),
            },
        };

        let mut definition = SnippetDefinition::new(id, raw.title, default_source);
        for (name, var) in raw.variables {
            definition = definition.with_variable(self.build_variable(id, &name, var)?);
        }
        Ok(definition)
    }

    fn build_variable(
        &self,
        snippet: &str,
        name: &str,
        raw: TomlVariable,
    ) -> Result<VariableDefinition, ConfigError> {
        let var_type = VariableType::from_tag(&raw.type_tag, &self.converters).ok_or_else(|| {
            ConfigError::UnknownVariableType {
                snippet: snippet.to_string(),
                variable: name.to_string(),
                type_tag: raw.type_tag.clone(),
            }
        })?;

        let invalid_default = |reason: String| ConfigError::InvalidDefault {
            snippet: snippet.to_string(),
            variable: name.to_string(),
            reason,
        };

        let mut variable = VariableDefinition::new(name, var_type).required(raw.required);
        if let Some(value) = raw.default {
            let default = scalar_to_string(&value).ok_or_else(|| {
                invalid_default(format!("expected a scalar, found {}", value.type_str()))
            })?;
            variable
                .var_type()
                .convert(&default)
                .map_err(|e: ConversionError| invalid_default(e.to_string()))?;
            variable = variable.with_default(default);
        }
        Ok(variable)
    }
}

/// Stringify a TOML scalar so it goes through the same conversion as user input
fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(n) => Some(n.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Read the default source of `id` from `<root>/<id with dots as dirs>.html`,
/// falling back to the same path without extension, then to empty text.
fn load_default_source(root: &Path, id: &str) -> Result<String, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::TemplateRootMissing {
            path: root.to_path_buf(),
        });
    }

    let relative: PathBuf = id.split('.').collect();
    let candidates = [root.join(relative.with_extension("html")), root.join(&relative)];

    for path in candidates {
        if path.is_file() {
            return std::fs::read_to_string(&path).map_err(|e| ConfigError::TemplateFile {
                message: e.to_string(),
                path,
            });
        }
    }

    tracing::debug!(snippet = id, root = %root.display(), "no template file, using empty default source");
    Ok(String::new())
}
