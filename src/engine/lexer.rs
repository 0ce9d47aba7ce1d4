//! Lexer for placeholder templates using logos

use logos::Logos;

use crate::error::{Span, TemplateError};

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'s> {
    // Escapes (longer than the lone braces, so they win)
    #[token("{{")]
    EscapedOpen,
    #[token("}}")]
    EscapedClose,

    #[regex(r"\{[A-Za-z_][A-Za-z0-9_]*\}", |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    Placeholder(&'s str),

    #[token("{")]
    Open,
    #[token("}")]
    Close,

    #[regex(r"[^{}]+", |lex| lex.slice())]
    Text(&'s str),
}

/// Tokenize template source.
///
/// Stray braces come out as `Open`/`Close` tokens for the engine to reject.
/// Anything logos cannot match is reported as an unbalanced brace at its span.
pub fn lex(input: &str) -> impl Iterator<Item = Result<(Token<'_>, Span), TemplateError>> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| match tok {
        Ok(tok) => Ok((tok, span)),
        Err(()) => Err(TemplateError::UnbalancedBrace {
            brace: input.get(span.clone()).and_then(|s| s.chars().next()).unwrap_or('{'),
            span,
        }),
    })
}
