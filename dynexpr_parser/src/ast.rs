//! Untyped syntax tree for the expression grammar
//!
//! The parser produces `SynExpr` nodes; type resolution happens in the
//! consuming crate. Nodes carry spans and serialize with serde so callers
//! can inspect or persist raw parses.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A syntax tree node with its source span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynExpr {
    pub kind: SynExprKind,
    pub span: Span,
}

impl SynExpr {
    pub fn new(kind: SynExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Stable name of the syntax construct, used in unsupported-syntax errors
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SynExprKind::Lambda { .. } => "Lambda",
            SynExprKind::Binary { .. } => "Binary",
            SynExprKind::Unary { .. } => "Unary",
            SynExprKind::Conditional { .. } => "Conditional",
            SynExprKind::Member { .. } => "MemberAccess",
            SynExprKind::NullSafeMember { .. } => "ConditionalAccess",
            SynExprKind::Call { .. } => "Invocation",
            SynExprKind::Index { .. } => "ElementAccess",
            SynExprKind::Cast { .. } => "Cast",
            SynExprKind::Ident(_) => "Identifier",
            SynExprKind::Literal(_) => "Literal",
            SynExprKind::ArrayLit(_) => "ImplicitArrayCreation",
            SynExprKind::AnonObject(_) => "AnonymousObjectCreation",
            SynExprKind::ObjectCreation { .. } => "ObjectCreation",
            SynExprKind::Paren(_) => "Parenthesized",
        }
    }
}

/// Syntactic binary operators.
///
/// The full arithmetic set is parsed even though the tree builder only maps
/// a subset; unmapped operators surface as unsupported-operator errors there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynBinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAlso,
    OrElse,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Coalesce,
}

impl SynBinaryOp {
    /// Source text of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            SynBinaryOp::Eq => "==",
            SynBinaryOp::Ne => "!=",
            SynBinaryOp::Lt => "<",
            SynBinaryOp::Le => "<=",
            SynBinaryOp::Gt => ">",
            SynBinaryOp::Ge => ">=",
            SynBinaryOp::AndAlso => "&&",
            SynBinaryOp::OrElse => "||",
            SynBinaryOp::Add => "+",
            SynBinaryOp::Sub => "-",
            SynBinaryOp::Mul => "*",
            SynBinaryOp::Div => "/",
            SynBinaryOp::Rem => "%",
            SynBinaryOp::Coalesce => "??",
        }
    }
}

/// Syntactic unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynUnaryOp {
    Not,
    Negate,
    Plus,
}

/// Literal token values, kept raw where the consuming crate owns the
/// value mapping (numeric suffixes are resolved during tree building)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SynLit {
    /// Numeric literal text including any suffix, e.g. "10L", "1.5f"
    Number(String),
    /// String literal with escapes already decoded
    Str(String),
    Char(char),
    Bool(bool),
    Null,
}

/// One initializer of an anonymous-object literal: `Name = expr` or a bare
/// expression whose member name is inferred by the tree builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonInit {
    pub name: Option<String>,
    pub value: SynExpr,
}

/// Expression syntax node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SynExprKind {
    /// `x => body`
    Lambda { param: String, body: Box<SynExpr> },
    /// `left OP right`
    Binary {
        op: SynBinaryOp,
        left: Box<SynExpr>,
        right: Box<SynExpr>,
    },
    /// `!operand`, `-operand`, `+operand`
    Unary {
        op: SynUnaryOp,
        operand: Box<SynExpr>,
    },
    /// `test ? if_true : if_false`
    Conditional {
        test: Box<SynExpr>,
        if_true: Box<SynExpr>,
        if_false: Box<SynExpr>,
    },
    /// `target.name`
    Member { target: Box<SynExpr>, name: String },
    /// `target?.name`
    NullSafeMember { target: Box<SynExpr>, name: String },
    /// `target.name(args...)`, `name(args...)`, or `target?.name(args...)`
    Call {
        target: Option<Box<SynExpr>>,
        name: String,
        args: Vec<SynExpr>,
        null_safe: bool,
    },
    /// `target[args...]`
    Index {
        target: Box<SynExpr>,
        args: Vec<SynExpr>,
    },
    /// `(TypeName)operand` or `(TypeName?)operand`
    Cast {
        type_name: String,
        nullable: bool,
        operand: Box<SynExpr>,
    },
    /// Bare identifier
    Ident(String),
    /// Literal constant
    Literal(SynLit),
    /// `new[] { e1, e2, ... }`
    ArrayLit(Vec<SynExpr>),
    /// `new { Name = e, x.Id, ... }`
    AnonObject(Vec<AnonInit>),
    /// `new TypeName(args) { inits }` — parsed but not supported by the
    /// tree builder
    ObjectCreation {
        type_name: String,
        args: Vec<SynExpr>,
        inits: Vec<AnonInit>,
    },
    /// `(expr)`
    Paren(Box<SynExpr>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name() {
        let e = SynExpr::new(SynExprKind::Ident("x".to_string()), Span::empty());
        assert_eq!(e.kind_name(), "Identifier");

        let obj = SynExpr::new(
            SynExprKind::ObjectCreation {
                type_name: "Foo".to_string(),
                args: vec![],
                inits: vec![],
            },
            Span::empty(),
        );
        assert_eq!(obj.kind_name(), "ObjectCreation");
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(SynBinaryOp::Ge.symbol(), ">=");
        assert_eq!(SynBinaryOp::Coalesce.symbol(), "??");
        assert_eq!(SynBinaryOp::Rem.symbol(), "%");
    }
}
