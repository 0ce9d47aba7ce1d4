//! Render engines for snippet source text
//!
//! The resolver hands an engine the effective source of a snippet together with
//! the converted variables and gets back the interpolated text. Everything about
//! placeholder syntax lives behind the [`RenderEngine`] trait; the crate ships
//! [`PlaceholderEngine`], which understands `{name}` placeholders.

pub mod lexer;
mod placeholder;

use std::collections::HashMap;

use crate::error::TemplateError;
use crate::snippet::TypedValue;

pub use placeholder::{placeholders, PlaceholderEngine};

/// Turns template source plus a flat variable mapping into text
pub trait RenderEngine {
    fn render(
        &self,
        source: &str,
        variables: &HashMap<String, TypedValue>,
    ) -> Result<String, TemplateError>;
}

impl<E: RenderEngine + ?Sized> RenderEngine for &E {
    fn render(
        &self,
        source: &str,
        variables: &HashMap<String, TypedValue>,
    ) -> Result<String, TemplateError> {
        (**self).render(source, variables)
    }
}
