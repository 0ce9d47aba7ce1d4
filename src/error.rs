//! Error types for template source rendering

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in template source text
pub type Span = std::ops::Range<usize>;

/// Errors raised by a render engine while interpolating template source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// A `{` or `}` that neither opens a placeholder nor is escaped
    #[error("unbalanced '{brace}' at {span:?}; write '{brace}{brace}' for a literal brace")]
    UnbalancedBrace { brace: char, span: Span },

    /// A placeholder naming a variable the mapping does not contain
    #[error("undefined variable '{name}' at {span:?}")]
    UndefinedVariable { name: String, span: Span },

    /// Failure reported by a third-party engine
    #[error("render engine error: {message}")]
    Engine { message: String },
}

impl TemplateError {
    /// Byte range the error points at, if it has one
    pub fn span(&self) -> Option<&Span> {
        match self {
            TemplateError::UnbalancedBrace { span, .. }
            | TemplateError::UndefinedVariable { span, .. } => Some(span),
            TemplateError::Engine { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };

        let label = match self {
            TemplateError::UnbalancedBrace { .. } => "escape literal braces by doubling them",
            TemplateError::UndefinedVariable { .. } => "not declared for this snippet",
            TemplateError::Engine { .. } => "",
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_of_syntax_errors() {
        let err = TemplateError::UnbalancedBrace {
            brace: '{',
            span: 4..5,
        };
        assert_eq!(err.span(), Some(&(4..5)));

        let err = TemplateError::Engine {
            message: "boom".to_string(),
        };
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_display_mentions_escape() {
        let err = TemplateError::UnbalancedBrace {
            brace: '}',
            span: 0..1,
        };
        assert!(err.to_string().contains("'}}'"));
    }

    #[test]
    fn test_format_includes_message_and_filename() {
        let source = "Hello {nmae}!";
        let err = TemplateError::UndefinedVariable {
            name: "nmae".to_string(),
            span: 6..12,
        };
        let report = err.format(source, "welcome");
        assert!(report.contains("undefined variable 'nmae'"));
        assert!(report.contains("welcome"));
    }

    #[test]
    fn test_format_without_span_falls_back_to_message() {
        let err = TemplateError::Engine {
            message: "engine offline".to_string(),
        };
        assert_eq!(err.format("", "x"), "render engine error: engine offline");
    }
}
