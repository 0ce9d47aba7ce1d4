//! Variable definitions and conversion of raw input into typed values

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A raw value that could not be converted to the declared type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert '{value}' to {expected}: {reason}")]
pub struct ConversionError {
    pub value: String,
    pub expected: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: &str, expected: &str, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from converting a single variable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VariableError {
    /// Required variable with neither a supplied value nor a default
    #[error("missing required variable: {variable}")]
    Missing { variable: String },

    /// Supplied (or default) value failed conversion
    #[error("invalid value for variable {variable}: {source}")]
    Conversion {
        variable: String,
        #[source]
        source: ConversionError,
    },
}

/// A converted variable value, ready for interpolation.
///
/// `Absent` is the one representation of "no value": it is what an optional
/// variable without a default resolves to, and engines render it as empty text.
/// It is distinct from `String(String::new())`, which is a supplied empty value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Absent,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Value produced by a registered converter
    Custom { type_tag: String, text: String },
}

impl TypedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, TypedValue::Absent)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Absent => Ok(()),
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Integer(n) => write!(f, "{}", n),
            TypedValue::Float(n) => write!(f, "{}", n),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Custom { text, .. } => f.write_str(text),
        }
    }
}

/// Converts raw string input for a custom variable type
pub trait ValueConverter: Send + Sync {
    fn convert(&self, raw: &str) -> Result<TypedValue, ConversionError>;
}

impl<F> ValueConverter for F
where
    F: Fn(&str) -> Result<TypedValue, ConversionError> + Send + Sync,
{
    fn convert(&self, raw: &str) -> Result<TypedValue, ConversionError> {
        self(raw)
    }
}

/// The declared type of a variable, resolved when the catalog is loaded
#[derive(Clone)]
pub enum VariableType {
    String,
    Integer,
    Float,
    Boolean,
    Custom {
        tag: String,
        converter: Arc<dyn ValueConverter>,
    },
}

impl fmt::Debug for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::Custom { tag, .. } => f.debug_struct("Custom").field("tag", tag).finish(),
            other => f.write_str(other.tag()),
        }
    }
}

impl VariableType {
    /// Resolve a type tag against the built-in types and then the registry
    pub fn from_tag(tag: &str, converters: &ConverterRegistry) -> Option<Self> {
        match tag {
            "string" => Some(VariableType::String),
            "integer" | "int" => Some(VariableType::Integer),
            "float" => Some(VariableType::Float),
            "boolean" | "bool" => Some(VariableType::Boolean),
            _ => converters.get(tag).map(|converter| VariableType::Custom {
                tag: tag.to_string(),
                converter,
            }),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            VariableType::String => "string",
            VariableType::Integer => "integer",
            VariableType::Float => "float",
            VariableType::Boolean => "boolean",
            VariableType::Custom { tag, .. } => tag,
        }
    }

    /// Convert a raw value. Input is never trimmed or otherwise coerced.
    pub fn convert(&self, raw: &str) -> Result<TypedValue, ConversionError> {
        match self {
            VariableType::String => Ok(TypedValue::String(raw.to_string())),
            VariableType::Integer => raw
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|e| ConversionError::new(raw, "integer", e.to_string())),
            VariableType::Float => raw
                .parse::<f64>()
                .map(TypedValue::Float)
                .map_err(|e| ConversionError::new(raw, "float", e.to_string())),
            VariableType::Boolean => parse_bool(raw)
                .map(TypedValue::Boolean)
                .ok_or_else(|| {
                    ConversionError::new(raw, "boolean", "expected true/false, yes/no, on/off or 1/0")
                }),
            VariableType::Custom { converter, .. } => converter.convert(raw),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Converters for custom variable types, keyed by type tag.
///
/// Built-in tags (`string`, `integer`, `float`, `boolean`) always take
/// precedence over registered converters.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn ValueConverter>>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("ConverterRegistry").field("tags", &tags).finish()
    }
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter, replacing any previous one for the same tag
    pub fn register(&mut self, tag: impl Into<String>, converter: impl ValueConverter + 'static) {
        self.converters.insert(tag.into(), Arc::new(converter));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, tag: impl Into<String>, converter: impl ValueConverter + 'static) -> Self {
        self.register(tag, converter);
        self
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn ValueConverter>> {
        self.converters.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.converters.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(|s| s.as_str())
    }
}

/// A named variable a snippet accepts
#[derive(Debug, Clone)]
pub struct VariableDefinition {
    name: String,
    var_type: VariableType,
    required: bool,
    default_value: Option<String>,
}

impl VariableDefinition {
    /// An optional variable without a default
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            required: false,
            default_value: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> &VariableType {
        &self.var_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Convert a supplied value, falling back to the default when absent.
    ///
    /// The default goes through the same conversion as supplied input.
    pub fn convert(&self, raw: Option<&str>) -> Result<TypedValue, VariableError> {
        let raw = match raw.or(self.default_value.as_deref()) {
            Some(raw) => raw,
            None if self.required => {
                return Err(VariableError::Missing {
                    variable: self.name.clone(),
                })
            }
            None => return Ok(TypedValue::Absent),
        };

        self.var_type
            .convert(raw)
            .map_err(|source| VariableError::Conversion {
                variable: self.name.clone(),
                source,
            })
    }
}
