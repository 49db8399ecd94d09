//! Public entry points: text to invocable lambda
//!
//! A [`Lambda`] wraps a typed expression tree together with its parameter,
//! ready to invoke against rows; a [`Predicate`] is a lambda whose body is
//! statically `bool`.

use dynexpr_parser::{first_lambda, ParseError, Span};

use crate::binder::bind_lambda;
use crate::convert::can_convert;
use crate::error::{Error, Result};
use crate::eval::{eval, Scope};
use crate::expr::Expr;
use crate::types::{Ty, TypeResolverFn};
use crate::value::Value;

/// A parsed, typed lambda over rows of a fixed element type
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    expr: Expr,
}

impl Lambda {
    /// The underlying expression tree (always an `Expr::Lambda`)
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Static type of the lambda body
    pub fn return_type(&self) -> Ty {
        self.expr.ty()
    }

    /// Evaluate the body against one row
    pub fn invoke(&self, row: &Value) -> Result<Value> {
        match &self.expr {
            Expr::Lambda { params, body } => {
                let param = params
                    .first()
                    .ok_or_else(|| Error::eval("lambda without parameter".to_string()))?;
                let mut scope = Scope::with_var(param.name.clone(), row.clone());
                eval(body, &mut scope)
            }
            _ => Err(Error::eval("not a lambda expression".to_string())),
        }
    }
}

/// A lambda with a `bool` body
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    lambda: Lambda,
}

impl Predicate {
    pub fn expr(&self) -> &Expr {
        self.lambda.expr()
    }

    /// Test one row
    pub fn test(&self, row: &Value) -> Result<bool> {
        match self.lambda.invoke(row)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(Error::eval(format!(
                "predicate produced {}",
                other.runtime_type().display_name(false)
            ))),
        }
    }
}

/// Parse text into a typed lambda over the given element type.
///
/// The text may contain surrounding noise as long as a single-parameter
/// lambda appears somewhere in it; the first one found is used.
pub fn parse_lambda(
    element: &Ty,
    text: &str,
    resolver: Option<&TypeResolverFn>,
) -> Result<Lambda> {
    let syn = dynexpr_parser::parse(text).map_err(Error::Grammar)?;
    let lambda = first_lambda(&syn).ok_or_else(|| {
        Error::Grammar(ParseError::MissingLambda {
            span: Span::new(0, text.len()),
        })
    })?;
    let expr = bind_lambda(lambda, element, resolver)?;
    Ok(Lambda { expr })
}

/// Parse text into a predicate; the body must be statically `bool`
pub fn parse_predicate(
    element: &Ty,
    text: &str,
    resolver: Option<&TypeResolverFn>,
) -> Result<Predicate> {
    let lambda = parse_lambda(element, text, resolver)?;
    let ty = lambda.return_type();
    if ty != Ty::Bool {
        return Err(Error::InputValidation(format!(
            "predicate body must be bool, got {}",
            ty.display_name(false)
        )));
    }
    Ok(Predicate { lambda })
}

/// Parse text into a lambda whose body converts to the requested result
/// type. The body is wrapped in a conversion when its static type differs.
pub fn parse_lambda_typed(
    element: &Ty,
    text: &str,
    result: &Ty,
    resolver: Option<&TypeResolverFn>,
) -> Result<Lambda> {
    let lambda = parse_lambda(element, text, resolver)?;
    let body_ty = lambda.return_type();
    if body_ty == *result {
        return Ok(lambda);
    }
    if !can_convert(&body_ty, result) {
        return Err(Error::Conversion {
            from: body_ty.display_name(false),
            to: result.display_name(false),
        });
    }
    let expr = match lambda.expr {
        Expr::Lambda { params, body } => Expr::Lambda {
            params,
            body: Box::new(Expr::Convert {
                operand: body,
                ty: result.clone(),
            }),
        },
        other => other,
    };
    Ok(Lambda { expr })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, RecordType};
    use crate::value::RecordValue;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn item_schema() -> Arc<RecordType> {
        RecordType::new(
            "Item",
            vec![
                Field::new("Id", Ty::I32),
                Field::new("Name", Ty::Str),
                Field::new("Price", Ty::F64),
            ],
        )
    }

    fn row(id: i32, name: &str, price: f64) -> Value {
        let mut rec = RecordValue::new(item_schema());
        rec.set_field("Id", Value::I32(id)).unwrap();
        rec.set_field("Name", Value::from(name)).unwrap();
        rec.set_field("Price", Value::F64(price)).unwrap();
        Value::Record(rec)
    }

    fn element() -> Ty {
        Ty::Record(item_schema())
    }

    #[test]
    fn test_predicate_filters_rows() {
        let p = parse_predicate(&element(), "x => x.Price > 10 && x.Name != null", None).unwrap();
        assert!(p.test(&row(1, "a", 20.0)).unwrap());
        assert!(!p.test(&row(2, "b", 5.0)).unwrap());
    }

    #[test]
    fn test_lambda_projects_values() {
        let l = parse_lambda(&element(), "x => x.Name.ToUpper()", None).unwrap();
        assert_eq!(l.return_type(), Ty::Str);
        assert_eq!(l.invoke(&row(1, "abc", 0.0)).unwrap(), Value::from("ABC"));
    }

    #[test]
    fn test_lambda_embedded_in_noise() {
        // A lambda nested inside a larger expression still binds
        let p = parse_predicate(&element(), "(x => x.Id == 1)", None).unwrap();
        assert!(p.test(&row(1, "a", 0.0)).unwrap());
    }

    #[test]
    fn test_missing_lambda() {
        let err = parse_lambda(&element(), "1 == 1", None).unwrap_err();
        assert!(matches!(
            err,
            Error::Grammar(ParseError::MissingLambda { .. })
        ));
    }

    #[test]
    fn test_non_bool_predicate_rejected() {
        let err = parse_predicate(&element(), "x => x.Name", None).unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
    }

    #[test]
    fn test_typed_lambda_converts_result() {
        let l = parse_lambda_typed(&element(), "x => x.Id", &Ty::I64, None).unwrap();
        assert_eq!(l.return_type(), Ty::I64);
        assert_eq!(l.invoke(&row(7, "a", 0.0)).unwrap(), Value::I64(7));
    }

    #[test]
    fn test_typed_lambda_rejects_impossible() {
        let err = parse_lambda_typed(&element(), "x => x.Id", &Ty::DateTime, None).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }
}
