//! Error types for expression building, evaluation and serialization
//!
//! Every failure surfaces to the immediate caller of the parse, serialize,
//! getter, or invoke entry point; nothing is caught and logged internally,
//! and no partial trees are ever returned.

use thiserror::Error;

/// Expression engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input text failed to parse, or contains no single-parameter lambda
    #[error("invalid lambda expression: {0}")]
    Grammar(#[from] dynexpr_parser::ParseError),

    /// A syntax construct has no tree-builder rule
    #[error("unsupported expression syntax: {0}")]
    UnsupportedSyntax(String),

    /// A bare identifier is neither the bound parameter nor a recognized
    /// static-type token
    #[error("unsupported identifier: {0}")]
    UnsupportedIdentifier(String),

    /// A cast's target type name cannot be resolved
    #[error("unsupported cast: {0}")]
    UnsupportedCast(String),

    /// A binary or unary operator token has no mapping
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// No matching method was found by direct lookup nor by the
    /// sequence-operator fallback
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Neither array index nor a matching-arity indexer exists
    #[error("unsupported element access on {0}")]
    UnsupportedElementAccess(String),

    /// Null-conditional access attempted on a non-nullable value type
    #[error("null-conditional access is not supported on value type {0}")]
    UnsupportedConditionalAccess(String),

    /// Invalid input to an entry point (e.g. mismatched field name/type
    /// lists when synthesizing a record type)
    #[error("{0}")]
    InputValidation(String),

    /// A property/field segment in a dotted path cannot be found
    #[error("member '{name}' not found on type {type_name}")]
    MemberResolution { name: String, type_name: String },

    /// A value cannot be converted to the requested type
    #[error("cannot convert value of type {from} to {to}")]
    Conversion { from: String, to: String },

    /// A runtime failure while evaluating a compiled expression
    #[error("evaluation failed: {0}")]
    Eval(String),
}

impl Error {
    pub(crate) fn eval(message: impl Into<String>) -> Self {
        Error::Eval(message.into())
    }
}

/// Result type for expression operations
pub type Result<T> = std::result::Result<T, Error>;
