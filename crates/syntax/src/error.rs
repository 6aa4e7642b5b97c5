use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// A single lexer or parser complaint with its byte range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} at {}..{}", .span.start, .span.end)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

/// Source that did not parse. `diags` is never empty.
#[derive(Debug, Error)]
#[error("syntax error: {}", .diags.first().map_or("unknown", |d| d.message.as_str()))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

/// Rendering failures. Everything else the printer can express.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrintError {
    #[error("illegal {context} operator")]
    IllegalOperator { context: &'static str },
    #[error("bad {0} node cannot be printed")]
    BadNode(&'static str),
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}
