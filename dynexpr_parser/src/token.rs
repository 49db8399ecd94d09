//! Token definitions for the expression lexer
//!
//! Covers the practical C#-expression subset: lambdas, member access,
//! comparison/logical/arithmetic operators, ternary conditional, casts,
//! `new`-literals, null-conditional access, indexers and invocation.

use logos::Logos;

/// Expression tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("new")]
    KwNew,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // ==================== Delimiters ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // ==================== Punctuation ====================
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token("??")]
    QuestionQuestion,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,

    // ==================== Operators ====================
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Not,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // ==================== Literals ====================
    // Integer or real, with the C# literal suffixes the binder understands
    // (L = long, f = float, d = double, m = decimal).
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?[lLfFdDmM]?")]
    NumberLiteral,

    // String literals are scanned to the closing quote by the lexer wrapper
    // (see lexer.rs); logos only recognizes the opening quote.
    #[token("\"")]
    DoubleQuote,

    // Single character with optional escape: 'a', '\n', '\''
    #[regex(r"'([^'\\]|\\.)'")]
    CharLiteral,

    // ==================== Identifiers ====================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // ==================== Synthetic ====================
    /// Produced by the lexer wrapper after scanning a complete string literal.
    StringLiteral,
}

/// Binary operator precedence levels, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    /// Null coalescing: ??
    Coalesce = 1,
    /// Lazy or: ||
    Or = 2,
    /// Lazy and: &&
    And = 3,
    /// Equality: ==, !=
    Equality = 4,
    /// Relational: <, <=, >, >=
    Relational = 5,
    /// Additive: +, -
    Additive = 6,
    /// Multiplicative: *, /, %
    Multiplicative = 7,
}

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Token {
    /// Get the precedence and associativity of a binary operator token
    pub fn binary_precedence(&self) -> Option<(Precedence, Associativity)> {
        use Associativity::{Left, Right};
        use Precedence::*;

        Some(match self {
            Token::QuestionQuestion => (Coalesce, Right),
            Token::OrOr => (Or, Left),
            Token::AndAnd => (And, Left),
            Token::EqEq | Token::NotEq => (Equality, Left),
            Token::Lt | Token::LtEq | Token::Gt | Token::GtEq => (Relational, Left),
            Token::Plus | Token::Minus => (Additive, Left),
            Token::Star | Token::Slash | Token::Percent => (Multiplicative, Left),
            _ => return None,
        })
    }

    /// Check if this token can start an expression (used for cast lookahead)
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Identifier
                | Token::NumberLiteral
                | Token::DoubleQuote
                | Token::StringLiteral
                | Token::CharLiteral
                | Token::True
                | Token::False
                | Token::Null
                | Token::LParen
                | Token::Not
                | Token::Minus
                | Token::Plus
                | Token::KwNew
        )
    }
}
