//! dynexpr_parser
//!
//! Pure Rust parser for a restricted C#-like lambda expression language:
//! single-parameter lambdas, member access, comparison/logical/arithmetic
//! operators, ternary conditional, casts (including nullable), implicit
//! array and anonymous-object literals, null-conditional access, indexers
//! and method invocation.
//!
//! The parser produces an untyped [`SynExpr`] tree; type resolution and
//! evaluation live in the `dynexpr` crate.
//!
//! # Example
//!
//! ```
//! use dynexpr_parser::{parse, SynExprKind};
//!
//! let expr = parse("x => x.Price > 100").expect("parse failed");
//! assert!(matches!(expr.kind, SynExprKind::Lambda { .. }));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{AnonInit, SynBinaryOp, SynExpr, SynExprKind, SynLit, SynUnaryOp};
pub use error::{ParseError, ParseResult};
pub use lexer::{tokenize, Lexer, SpannedToken};
pub use parser::{first_lambda, parse, Parser};
pub use span::{SourceMap, Span};
pub use token::{Associativity, Precedence, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lambda() {
        let expr = parse("x => x.A == 1").unwrap();
        assert!(matches!(expr.kind, SynExprKind::Lambda { .. }));
    }

    #[test]
    fn test_parse_error_on_garbage() {
        assert!(parse("=> =>").is_err());
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("1 + 2").unwrap();
        assert_eq!(tokens.len(), 3);
    }
}
