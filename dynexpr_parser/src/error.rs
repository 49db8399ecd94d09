//! Parse error types

use crate::span::{SourceMap, Span};
use thiserror::Error;

/// Parse error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token
    #[error("unexpected token '{found}' at {span:?}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Unexpected end of input
    #[error("unexpected end of input at {span:?}, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// Unterminated string
    #[error("unterminated string literal starting at {span:?}")]
    UnterminatedString { span: Span },

    /// Invalid escape sequence
    #[error("invalid escape sequence '{sequence}' at {span:?}")]
    InvalidEscape { sequence: String, span: Span },

    /// Invalid character literal
    #[error("invalid character literal at {span:?}")]
    InvalidCharacter { span: Span },

    /// Lexer error
    #[error("unrecognized token at {span:?}")]
    LexerError { span: Span },

    /// The input contains no parseable single-parameter lambda
    #[error("invalid lambda expression: no single-parameter lambda found")]
    MissingLambda { span: Span },
}

impl ParseError {
    /// Get the span of the error
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::UnterminatedString { span } => *span,
            ParseError::InvalidEscape { span, .. } => *span,
            ParseError::InvalidCharacter { span } => *span,
            ParseError::LexerError { span } => *span,
            ParseError::MissingLambda { span } => *span,
        }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    /// Create an unexpected EOF error
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }

    /// Format error with source context
    ///
    /// Returns a string showing the source line with an error marker.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let map = SourceMap::new(source);
        let (line_no, col) = map.line_col(span.start);

        let Some(line) = source.lines().nth(line_no.saturating_sub(1)) else {
            return String::new();
        };

        let col = col.saturating_sub(1);
        let len = span.len().min(line.len().saturating_sub(col)).max(1);

        let spaces = " ".repeat(col);
        let marker = "^".repeat(len);

        format!(
            "  {} | {}\n  {} | {}{}",
            line_no,
            line,
            " ".repeat(line_no.to_string().len()),
            spaces,
            marker
        )
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
