//! Tree-walking evaluation of typed expressions
//!
//! Logical operators short-circuit, conversions reuse the value converter,
//! and sequence operators interpret their lambda arguments against each
//! element of the receiver array.

use std::cmp::Ordering;

use crate::access::get_property;
use crate::convert::convert;
use crate::error::{Error, Result};
use crate::expr::{BinaryOp, CallKind, Expr, UnaryOp};
use crate::methods::{display_value, invoke_instance, invoke_static, SequenceOp};
use crate::value::{ArrayValue, RecordValue, Value};

/// Variable scope during evaluation: lambda parameters, innermost last
#[derive(Debug, Default)]
pub struct Scope {
    vars: Vec<(String, Value)>,
}

impl Scope {
    pub fn with_var(name: impl Into<String>, value: Value) -> Self {
        Self {
            vars: vec![(name.into(), value)],
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| Error::eval(format!("unbound parameter: {name}")))
    }
}

/// Evaluate an expression in the given scope
pub fn eval(expr: &Expr, scope: &mut Scope) -> Result<Value> {
    match expr {
        Expr::Constant { value, .. } => Ok(value.clone()),
        Expr::Parameter { name, .. } => scope.lookup(name).cloned(),
        Expr::Member { target, name, .. } => {
            let target = eval(target, scope)?;
            if target.is_null() {
                return Err(Error::eval(format!("member {name} accessed on null")));
            }
            get_property(&target, name)
        }
        Expr::Convert { operand, ty } => {
            let value = eval(operand, scope)?;
            convert(&value, ty)
        }
        Expr::Unary { op, operand, .. } => eval_unary(*op, operand, scope),
        Expr::Binary {
            op, left, right, ..
        } => eval_binary(*op, left, right, scope),
        Expr::Conditional {
            test,
            if_true,
            if_false,
            ..
        } => {
            if truthy(&eval(test, scope)?)? {
                eval(if_true, scope)
            } else {
                eval(if_false, scope)
            }
        }
        Expr::Call {
            kind,
            target,
            method,
            args,
            ty,
        } => match kind {
            CallKind::Sequence => eval_sequence(method, args, ty, scope),
            CallKind::Static { declaring } => {
                let args = eval_all(args, scope)?;
                invoke_static(declaring, method, &args)
            }
            CallKind::Instance => {
                let target = match target {
                    Some(t) => eval(t, scope)?,
                    None => return Err(Error::UnsupportedMethod(method.clone())),
                };
                let args = eval_all(args, scope)?;
                invoke_instance(&target, method, &args)
            }
        },
        Expr::Lambda { .. } => Err(Error::eval(
            "lambda has no value outside a sequence operator".to_string(),
        )),
        Expr::NewArray { element, items } => {
            let items = eval_all(items, scope)?;
            Ok(Value::Array(ArrayValue::new(element.clone(), items)))
        }
        Expr::MemberInit { record, bindings } => {
            let mut instance = RecordValue::new(record.clone());
            for (name, value_expr) in bindings {
                let value = eval(value_expr, scope)?;
                instance.set_field(name, value)?;
            }
            Ok(Value::Record(instance))
        }
        Expr::Index { target, args, .. } => {
            let target = eval(target, scope)?;
            let index = match eval(&args[0], scope)? {
                Value::I32(i) => i as usize,
                Value::I64(i) => i as usize,
                other => {
                    return Err(Error::eval(format!(
                        "non-integer index: {}",
                        display_value(&other)
                    )))
                }
            };
            match target {
                Value::Array(a) => a
                    .items
                    .get(index)
                    .cloned()
                    .ok_or_else(|| Error::eval(format!("index {index} out of range"))),
                Value::Str(s) => s
                    .chars()
                    .nth(index)
                    .map(Value::Char)
                    .ok_or_else(|| Error::eval(format!("index {index} out of range"))),
                other => Err(Error::UnsupportedElementAccess(
                    other.runtime_type().display_name(false),
                )),
            }
        }
    }
}

fn eval_all(exprs: &[Expr], scope: &mut Scope) -> Result<Vec<Value>> {
    exprs.iter().map(|e| eval(e, scope)).collect()
}

fn truthy(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        other => Err(Error::eval(format!(
            "expected bool, got {}",
            other.runtime_type().display_name(false)
        ))),
    }
}

fn eval_unary(op: UnaryOp, operand: &Expr, scope: &mut Scope) -> Result<Value> {
    let value = eval(operand, scope)?;
    match op {
        UnaryOp::Not => Ok(Value::Bool(!truthy(&value)?)),
        UnaryOp::UnaryPlus => Ok(value),
        UnaryOp::Negate => match value {
            Value::I32(v) => Ok(Value::I32(-v)),
            Value::I64(v) => Ok(Value::I64(-v)),
            Value::F32(v) => Ok(Value::F32(-v)),
            Value::F64(v) => Ok(Value::F64(-v)),
            Value::Decimal(v) => Ok(Value::Decimal(-v)),
            other => Err(Error::eval(format!(
                "cannot negate {}",
                other.runtime_type().display_name(false)
            ))),
        },
    }
}

fn eval_binary(op: BinaryOp, left: &Expr, right: &Expr, scope: &mut Scope) -> Result<Value> {
    // Short-circuit forms first
    match op {
        BinaryOp::AndAlso => {
            if !truthy(&eval(left, scope)?)? {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(truthy(&eval(right, scope)?)?));
        }
        BinaryOp::OrElse => {
            if truthy(&eval(left, scope)?)? {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(truthy(&eval(right, scope)?)?));
        }
        BinaryOp::Coalesce => {
            let left = eval(left, scope)?;
            if !left.is_null() {
                return Ok(left);
            }
            return eval(right, scope);
        }
        _ => {}
    }

    let lhs = eval(left, scope)?;
    let rhs = eval(right, scope)?;
    match op {
        BinaryOp::Equal => Ok(Value::Bool(values_equal(&lhs, &rhs))),
        BinaryOp::NotEqual => Ok(Value::Bool(!values_equal(&lhs, &rhs))),
        BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual => {
            // Null never satisfies an ordering comparison
            if lhs.is_null() || rhs.is_null() {
                return Ok(Value::Bool(false));
            }
            let ord = compare_values(&lhs, &rhs)?;
            Ok(Value::Bool(match op {
                BinaryOp::LessThan => ord == Ordering::Less,
                BinaryOp::LessThanOrEqual => ord != Ordering::Greater,
                BinaryOp::GreaterThan => ord == Ordering::Greater,
                BinaryOp::GreaterThanOrEqual => ord != Ordering::Less,
                _ => unreachable!(),
            }))
        }
        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Str(a), b) => Ok(Value::Str(format!("{a}{}", display_value(b)))),
            (a, Value::Str(b)) => Ok(Value::Str(format!("{}{b}", display_value(a)))),
            _ => arithmetic(op, &lhs, &rhs),
        },
        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
            arithmetic(op, &lhs, &rhs)
        }
        BinaryOp::AndAlso | BinaryOp::OrElse | BinaryOp::Coalesce => unreachable!(),
    }
}

/// Equality over dynamic values; null equals only null
pub fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => match compare_values(lhs, rhs) {
            Ok(ord) => ord == Ordering::Equal,
            Err(_) => lhs == rhs,
        },
    }
}

/// Total order over comparable values; numeric variants cross-compare
pub fn compare_values(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    let incomparable = || {
        Error::eval(format!(
            "cannot compare {} with {}",
            lhs.runtime_type().display_name(false),
            rhs.runtime_type().display_name(false)
        ))
    };
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Ok(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Ok(a.stamp.cmp(&b.stamp)),
        (Value::DateTimeOffset(a), Value::DateTimeOffset(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
        (Value::Time(a), Value::Time(b)) => Ok(a.cmp(b)),
        (Value::Guid(a), Value::Guid(b)) => Ok(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Ok(a.value.cmp(&b.value)),
        (a, b) => {
            let a = numeric(a).ok_or_else(incomparable)?;
            let b = numeric(b).ok_or_else(incomparable)?;
            a.partial_cmp(&b).ok_or_else(incomparable)
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    use rust_decimal::prelude::ToPrimitive;
    match value {
        Value::I32(v) => Some(*v as f64),
        Value::I64(v) => Some(*v as f64),
        Value::F32(v) => Some(*v as f64),
        Value::F64(v) => Some(*v),
        Value::Decimal(v) => v.to_f64(),
        Value::Enum(e) => Some(e.value as f64),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    let fail = || {
        Error::eval(format!(
            "cannot apply {} to {} and {}",
            op.symbol(),
            lhs.runtime_type().display_name(false),
            rhs.runtime_type().display_name(false)
        ))
    };
    macro_rules! apply {
        ($a:expr, $b:expr) => {
            match op {
                BinaryOp::Add => $a + $b,
                BinaryOp::Subtract => $a - $b,
                BinaryOp::Multiply => $a * $b,
                BinaryOp::Divide => $a / $b,
                _ => return Err(fail()),
            }
        };
    }
    match (lhs, rhs) {
        (Value::I32(a), Value::I32(b)) => {
            if matches!(op, BinaryOp::Divide) && *b == 0 {
                return Err(Error::eval("division by zero".to_string()));
            }
            Ok(Value::I32(apply!(a, b)))
        }
        (Value::I64(a), Value::I64(b)) => {
            if matches!(op, BinaryOp::Divide) && *b == 0 {
                return Err(Error::eval("division by zero".to_string()));
            }
            Ok(Value::I64(apply!(a, b)))
        }
        (Value::F32(a), Value::F32(b)) => Ok(Value::F32(apply!(a, b))),
        (Value::F64(a), Value::F64(b)) => Ok(Value::F64(apply!(a, b))),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(apply!(a, b))),
        _ => Err(fail()),
    }
}

fn eval_lambda_arg(
    lambda: &Expr,
    item: &Value,
    scope: &mut Scope,
) -> Result<Value> {
    match lambda {
        Expr::Lambda { params, body } => {
            let name = params
                .first()
                .map(|p| p.name.clone())
                .ok_or_else(|| Error::eval("lambda without parameter".to_string()))?;
            scope.vars.push((name, item.clone()));
            let out = eval(body, scope);
            scope.vars.pop();
            out
        }
        other => Err(Error::eval(format!(
            "expected lambda argument, got {other:?}"
        ))),
    }
}

fn eval_sequence(
    method: &str,
    args: &[Expr],
    result_ty: &crate::types::Ty,
    scope: &mut Scope,
) -> Result<Value> {
    let op = SequenceOp::from_name(method)
        .ok_or_else(|| Error::UnsupportedMethod(method.to_string()))?;
    let receiver = eval(&args[0], scope)?;
    let array = match receiver {
        Value::Array(a) => a,
        Value::Null => return Err(Error::eval(format!("{method} called on null"))),
        other => {
            return Err(Error::UnsupportedMethod(format!(
                "{method} on {}",
                other.runtime_type().display_name(false)
            )))
        }
    };

    match op {
        SequenceOp::Where => {
            let mut items = Vec::new();
            for item in &array.items {
                if truthy(&eval_lambda_arg(&args[1], item, scope)?)? {
                    items.push(item.clone());
                }
            }
            Ok(Value::Array(ArrayValue::new(array.element, items)))
        }
        SequenceOp::Select => {
            let mut items = Vec::with_capacity(array.items.len());
            for item in &array.items {
                items.push(eval_lambda_arg(&args[1], item, scope)?);
            }
            let element = match result_ty.element_type() {
                Some(e) => e.clone(),
                None => crate::types::Ty::Object,
            };
            Ok(Value::Array(ArrayValue::new(element, items)))
        }
        SequenceOp::Any => {
            if args.len() == 1 {
                return Ok(Value::Bool(!array.items.is_empty()));
            }
            for item in &array.items {
                if truthy(&eval_lambda_arg(&args[1], item, scope)?)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        SequenceOp::All => {
            for item in &array.items {
                if !truthy(&eval_lambda_arg(&args[1], item, scope)?)? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        SequenceOp::Count => {
            if args.len() == 1 {
                return Ok(Value::I32(array.items.len() as i32));
            }
            let mut count = 0;
            for item in &array.items {
                if truthy(&eval_lambda_arg(&args[1], item, scope)?)? {
                    count += 1;
                }
            }
            Ok(Value::I32(count))
        }
        SequenceOp::Contains => {
            let needle = eval(&args[1], scope)?;
            Ok(Value::Bool(
                array.items.iter().any(|i| values_equal(i, &needle)),
            ))
        }
        SequenceOp::First | SequenceOp::FirstOrDefault => {
            let found = if args.len() == 1 {
                array.items.first().cloned()
            } else {
                let mut found = None;
                for item in &array.items {
                    if truthy(&eval_lambda_arg(&args[1], item, scope)?)? {
                        found = Some(item.clone());
                        break;
                    }
                }
                found
            };
            match (found, op) {
                (Some(v), _) => Ok(v),
                (None, SequenceOp::FirstOrDefault) => {
                    Ok(Value::default_of(&array.element))
                }
                (None, _) => Err(Error::eval("sequence contains no matching element".to_string())),
            }
        }
        SequenceOp::OrderBy | SequenceOp::OrderByDescending => {
            let mut keyed = Vec::with_capacity(array.items.len());
            for item in &array.items {
                let key = eval_lambda_arg(&args[1], item, scope)?;
                keyed.push((key, item.clone()));
            }
            // Stable sort, failing fast on the first incomparable pair
            let mut failure = None;
            keyed.sort_by(|(a, _), (b, _)| match compare_values(a, b) {
                Ok(ord) => {
                    if op == SequenceOp::OrderByDescending {
                        ord.reverse()
                    } else {
                        ord
                    }
                }
                Err(e) => {
                    failure.get_or_insert(e);
                    Ordering::Equal
                }
            });
            if let Some(e) = failure {
                return Err(e);
            }
            let items = keyed.into_iter().map(|(_, item)| item).collect();
            Ok(Value::Array(ArrayValue::new(array.element, items)))
        }
    }
}
