//! Typed expression tree
//!
//! The tree builder lowers untyped syntax into these nodes; every node
//! carries its resolved static type, computed bottom-up, so evaluation and
//! serialization never re-derive types.

use std::sync::Arc;

use crate::types::{RecordType, Ty};
use crate::value::Value;

/// Binary operators with a tree-builder mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    AndAlso,
    OrElse,
    Add,
    Subtract,
    Multiply,
    Divide,
    Coalesce,
}

impl BinaryOp {
    /// Source text of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Coalesce => "??",
        }
    }

    /// Comparison and logical operators produce `bool`
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::AndAlso
                | BinaryOp::OrElse
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    UnaryPlus,
}

/// How a call node dispatches
#[derive(Debug, Clone, PartialEq)]
pub enum CallKind {
    /// A sequence operator; the receiver is the first argument
    Sequence,
    /// A static method on a well-known type
    Static { declaring: String },
    /// An instance method on the target value
    Instance,
}

/// A lambda parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A typed expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant {
        value: Value,
        ty: Ty,
    },
    Parameter {
        name: String,
        ty: Ty,
    },
    Member {
        target: Box<Expr>,
        name: String,
        ty: Ty,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: Ty,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        ty: Ty,
    },
    /// Explicit type conversion
    Convert {
        operand: Box<Expr>,
        ty: Ty,
    },
    Conditional {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
        ty: Ty,
    },
    Call {
        kind: CallKind,
        target: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
        ty: Ty,
    },
    Lambda {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    /// `new T[] { ... }`
    NewArray {
        element: Ty,
        items: Vec<Expr>,
    },
    /// Construction of a synthesized record with per-field bindings
    MemberInit {
        record: Arc<RecordType>,
        bindings: Vec<(String, Expr)>,
    },
    Index {
        target: Box<Expr>,
        args: Vec<Expr>,
        ty: Ty,
    },
}

impl Expr {
    pub fn constant(value: Value, ty: Ty) -> Expr {
        Expr::Constant { value, ty }
    }

    /// Static type of this node
    pub fn ty(&self) -> Ty {
        match self {
            Expr::Constant { ty, .. } => ty.clone(),
            Expr::Parameter { ty, .. } => ty.clone(),
            Expr::Member { ty, .. } => ty.clone(),
            Expr::Binary { ty, .. } => ty.clone(),
            Expr::Unary { ty, .. } => ty.clone(),
            Expr::Convert { ty, .. } => ty.clone(),
            Expr::Conditional { ty, .. } => ty.clone(),
            Expr::Call { ty, .. } => ty.clone(),
            Expr::Lambda { body, .. } => body.ty(),
            Expr::NewArray { element, .. } => Ty::array_of(element.clone()),
            Expr::MemberInit { record, .. } => Ty::Record(Arc::clone(record)),
            Expr::Index { ty, .. } => ty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_types() {
        let c = Expr::constant(Value::I32(1), Ty::I32);
        assert_eq!(c.ty(), Ty::I32);

        let arr = Expr::NewArray {
            element: Ty::Str,
            items: vec![],
        };
        assert_eq!(arr.ty(), Ty::array_of(Ty::Str));
    }

    #[test]
    fn test_predicate_ops() {
        assert!(BinaryOp::Equal.is_predicate());
        assert!(BinaryOp::OrElse.is_predicate());
        assert!(!BinaryOp::Add.is_predicate());
    }
}
