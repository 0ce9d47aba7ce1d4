//! `{name}` interpolation engine

use std::collections::HashMap;

use crate::error::TemplateError;
use crate::snippet::TypedValue;

use super::lexer::{lex, Token};
use super::RenderEngine;

/// Substitutes `{name}` placeholders with variable values.
///
/// `{{` and `}}` produce literal braces. Any other brace is a syntax error.
/// In strict mode (the default) a placeholder that names no variable is an
/// error; lenient mode renders it as empty text.
#[derive(Debug, Clone)]
pub struct PlaceholderEngine {
    strict: bool,
}

impl Default for PlaceholderEngine {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl PlaceholderEngine {
    /// Create a strict engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that renders undefined placeholders as empty text
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Whether undefined placeholders are rejected
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl RenderEngine for PlaceholderEngine {
    fn render(
        &self,
        source: &str,
        variables: &HashMap<String, TypedValue>,
    ) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(source.len());

        for item in lex(source) {
            let (token, span) = item?;
            match token {
                Token::Text(text) => out.push_str(text),
                Token::EscapedOpen => out.push('{'),
                Token::EscapedClose => out.push('}'),
                Token::Placeholder(name) => match variables.get(name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None if self.strict => {
                        return Err(TemplateError::UndefinedVariable {
                            name: name.to_string(),
                            span,
                        })
                    }
                    None => {}
                },
                Token::Open => return Err(TemplateError::UnbalancedBrace { brace: '{', span }),
                Token::Close => return Err(TemplateError::UnbalancedBrace { brace: '}', span }),
            }
        }

        Ok(out)
    }
}

/// List the placeholder names used in `source`, in order of first appearance
pub fn placeholders(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    // Malformed input still lists the placeholders before the error
    for (token, _) in lex(source).map_while(Result::ok) {
        if let Token::Placeholder(name) = token {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
