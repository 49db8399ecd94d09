//! Lowering from untyped syntax to the typed expression tree
//!
//! Each syntax node either maps to exactly one typed node with a resolved
//! static type, or fails with a descriptive error. Nothing is inferred
//! lazily: the whole tree is typed bottom-up in a single pass.

use dynexpr_parser::{AnonInit, SynBinaryOp, SynExpr, SynExprKind, SynLit, SynUnaryOp};

use crate::convert::can_convert;
use crate::error::{Error, Result};
use crate::expr::{BinaryOp, CallKind, Expr, Param, UnaryOp};
use crate::methods::{
    instance_method, static_member, static_method, SequenceOp,
};
use crate::record::RecordTypeRegistry;
use crate::types::{resolve_type_name, Ty, TypeResolverFn};
use crate::value::Value;

/// Type names usable as static-method receivers
fn static_type_name(name: &str) -> Option<Ty> {
    Some(match name {
        "DateTime" => Ty::DateTime,
        "DateTimeOffset" => Ty::DateTimeOffset,
        "DateOnly" => Ty::Date,
        "TimeOnly" => Ty::Time,
        "Guid" => Ty::Guid,
        _ => return None,
    })
}

struct BindContext<'a> {
    /// In-scope lambda parameters, innermost last
    params: Vec<Param>,
    resolver: Option<&'a TypeResolverFn>,
}

impl<'a> BindContext<'a> {
    fn lookup_param(&self, name: &str) -> Option<&Param> {
        self.params.iter().rev().find(|p| p.name == name)
    }
}

/// Lower a parsed lambda to a typed expression tree over the given
/// element type.
pub fn bind_lambda(
    syn: &SynExpr,
    element: &Ty,
    resolver: Option<&TypeResolverFn>,
) -> Result<Expr> {
    match &syn.kind {
        SynExprKind::Lambda { param, body } => {
            let mut ctx = BindContext {
                params: vec![Param::new(param.clone(), element.clone())],
                resolver,
            };
            let body = bind(body, &mut ctx)?;
            Ok(Expr::Lambda {
                params: vec![Param::new(param.clone(), element.clone())],
                body: Box::new(body),
            })
        }
        _ => Err(Error::UnsupportedSyntax(syn.kind_name().to_string())),
    }
}

fn bind(syn: &SynExpr, ctx: &mut BindContext<'_>) -> Result<Expr> {
    match &syn.kind {
        SynExprKind::Paren(inner) => bind(inner, ctx),
        SynExprKind::Literal(lit) => bind_literal(lit),
        SynExprKind::Ident(name) => bind_ident(name, ctx),
        SynExprKind::Binary { op, left, right } => bind_binary(*op, left, right, ctx),
        SynExprKind::Unary { op, operand } => bind_unary(*op, operand, ctx),
        SynExprKind::Conditional {
            test,
            if_true,
            if_false,
        } => {
            let test = bind(test, ctx)?;
            let if_true = bind(if_true, ctx)?;
            let if_false = bind(if_false, ctx)?;
            let ty = if_true.ty();
            Ok(Expr::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
                ty,
            })
        }
        SynExprKind::Member { target, name } => {
            let target = bind(target, ctx)?;
            bind_member(target, name)
        }
        SynExprKind::NullSafeMember { target, name } => {
            let target = bind(target, ctx)?;
            let access = bind_member(target.clone(), name)?;
            lower_null_conditional(target, access)
        }
        SynExprKind::Cast {
            type_name,
            nullable,
            operand,
        } => {
            let ty = resolve_type_name(type_name, *nullable, ctx.resolver)?;
            let operand = bind(operand, ctx)?;
            Ok(Expr::Convert {
                operand: Box::new(operand),
                ty,
            })
        }
        SynExprKind::ArrayLit(items) => {
            let items: Vec<Expr> = items.iter().map(|e| bind(e, ctx)).collect::<Result<_>>()?;
            let element = items.first().map(|e| e.ty()).unwrap_or(Ty::Object);
            Ok(Expr::NewArray { element, items })
        }
        SynExprKind::AnonObject(inits) => bind_anon_object(inits, ctx),
        SynExprKind::Index { target, args } => {
            let target = bind(target, ctx)?;
            let args: Vec<Expr> = args.iter().map(|e| bind(e, ctx)).collect::<Result<_>>()?;
            // Array and string indexers take exactly one argument
            let ty = match (target.ty().strip_nullable(), args.len()) {
                (Ty::Array(element), 1) => (**element).clone(),
                (Ty::Str, 1) => Ty::Char,
                (other, _) => {
                    return Err(Error::UnsupportedElementAccess(other.display_name(false)))
                }
            };
            Ok(Expr::Index {
                target: Box::new(target),
                args,
                ty,
            })
        }
        SynExprKind::Call {
            target,
            name,
            args,
            null_safe,
        } => bind_call(target.as_deref(), name, args, *null_safe, ctx),
        SynExprKind::Lambda { .. } | SynExprKind::ObjectCreation { .. } => {
            Err(Error::UnsupportedSyntax(syn.kind_name().to_string()))
        }
    }
}

fn bind_literal(lit: &SynLit) -> Result<Expr> {
    Ok(match lit {
        SynLit::Null => Expr::constant(Value::Null, Ty::Object),
        SynLit::Bool(b) => Expr::constant(Value::Bool(*b), Ty::Bool),
        SynLit::Char(c) => Expr::constant(Value::Char(*c), Ty::Char),
        SynLit::Str(s) => Expr::constant(Value::Str(s.clone()), Ty::Str),
        SynLit::Number(raw) => bind_number(raw)?,
    })
}

/// Map a numeric literal to a constant, honoring its type suffix
fn bind_number(raw: &str) -> Result<Expr> {
    let invalid = || Error::InputValidation(format!("invalid numeric literal: {raw}"));
    let (body, suffix) = match raw.chars().last() {
        Some(c @ ('l' | 'L' | 'f' | 'F' | 'd' | 'D' | 'm' | 'M')) => {
            (&raw[..raw.len() - 1], Some(c.to_ascii_lowercase()))
        }
        _ => (raw, None),
    };
    Ok(match suffix {
        Some('l') => {
            let v: i64 = body.parse().map_err(|_| invalid())?;
            Expr::constant(Value::I64(v), Ty::I64)
        }
        Some('f') => {
            let v: f32 = body.parse().map_err(|_| invalid())?;
            Expr::constant(Value::F32(v), Ty::F32)
        }
        Some('d') => {
            let v: f64 = body.parse().map_err(|_| invalid())?;
            Expr::constant(Value::F64(v), Ty::F64)
        }
        Some('m') => {
            let v = body.parse().map_err(|_| invalid())?;
            Expr::constant(Value::Decimal(v), Ty::Decimal)
        }
        _ if body.contains(['.', 'e', 'E']) => {
            let v: f64 = body.parse().map_err(|_| invalid())?;
            Expr::constant(Value::F64(v), Ty::F64)
        }
        _ => {
            let v: i64 = body.parse().map_err(|_| invalid())?;
            match i32::try_from(v) {
                Ok(small) => Expr::constant(Value::I32(small), Ty::I32),
                Err(_) => Expr::constant(Value::I64(v), Ty::I64),
            }
        }
    })
}

fn bind_ident(name: &str, ctx: &BindContext<'_>) -> Result<Expr> {
    if let Some(param) = ctx.lookup_param(name) {
        return Ok(Expr::Parameter {
            name: param.name.clone(),
            ty: param.ty.clone(),
        });
    }
    if let Some(ty) = static_type_name(name) {
        return Ok(Expr::constant(Value::Type(ty), Ty::Type));
    }
    Err(Error::UnsupportedIdentifier(name.to_string()))
}

fn bind_binary(
    op: SynBinaryOp,
    left: &SynExpr,
    right: &SynExpr,
    ctx: &mut BindContext<'_>,
) -> Result<Expr> {
    let mapped = match op {
        SynBinaryOp::Eq => BinaryOp::Equal,
        SynBinaryOp::Ne => BinaryOp::NotEqual,
        SynBinaryOp::Lt => BinaryOp::LessThan,
        SynBinaryOp::Le => BinaryOp::LessThanOrEqual,
        SynBinaryOp::Gt => BinaryOp::GreaterThan,
        SynBinaryOp::Ge => BinaryOp::GreaterThanOrEqual,
        SynBinaryOp::AndAlso => BinaryOp::AndAlso,
        SynBinaryOp::OrElse => BinaryOp::OrElse,
        SynBinaryOp::Add => BinaryOp::Add,
        SynBinaryOp::Sub => BinaryOp::Subtract,
        SynBinaryOp::Mul => BinaryOp::Multiply,
        SynBinaryOp::Div => BinaryOp::Divide,
        SynBinaryOp::Coalesce => BinaryOp::Coalesce,
        SynBinaryOp::Rem => {
            return Err(Error::UnsupportedOperator(op.symbol().to_string()))
        }
    };
    if !mapped.is_predicate() {
        return Err(Error::UnsupportedOperator(op.symbol().to_string()));
    }
    let left = bind(left, ctx)?;
    let mut right = bind(right, ctx)?;

    // Align the right side with the left; null constants stay untyped, and
    // an incompatible operand pair fails here rather than at invoke time
    let left_ty = left.ty();
    let is_null_const = matches!(&right, Expr::Constant { value, .. } if value.is_null());
    if !is_null_const && right.ty() != left_ty {
        if !can_convert(&right.ty(), &left_ty) {
            return Err(Error::Conversion {
                from: right.ty().display_name(true),
                to: left_ty.display_name(true),
            });
        }
        right = Expr::Convert {
            operand: Box::new(right),
            ty: left_ty,
        };
    }

    Ok(Expr::Binary {
        op: mapped,
        left: Box::new(left),
        right: Box::new(right),
        ty: Ty::Bool,
    })
}

fn bind_unary(op: SynUnaryOp, operand: &SynExpr, ctx: &mut BindContext<'_>) -> Result<Expr> {
    let operand = bind(operand, ctx)?;
    let (op, ty) = match op {
        SynUnaryOp::Not => (UnaryOp::Not, Ty::Bool),
        SynUnaryOp::Negate => (UnaryOp::Negate, operand.ty()),
        SynUnaryOp::Plus => (UnaryOp::UnaryPlus, operand.ty()),
    };
    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
        ty,
    })
}

fn bind_member(target: Expr, name: &str) -> Result<Expr> {
    // Static members on a type receiver bind as constants
    if let Expr::Constant {
        value: Value::Type(receiver),
        ..
    } = &target
    {
        let declaring = receiver.display_name(false);
        if let Some((value, ty)) = static_member(&declaring, name) {
            return Ok(Expr::constant(value, ty));
        }
        return Err(Error::MemberResolution {
            name: name.to_string(),
            type_name: declaring,
        });
    }

    let target_ty = target.ty();
    let ty = match target_ty.strip_nullable() {
        Ty::Record(record) => crate::access::resolve_member(record, name)?,
        other => crate::access::builtin_member(other, name).ok_or_else(|| {
            Error::MemberResolution {
                name: name.to_string(),
                type_name: other.display_name(true),
            }
        })?,
    };
    Ok(Expr::Member {
        target: Box::new(target),
        name: name.to_string(),
        ty,
    })
}

/// `a?.b` lowers to `a != null ? a.b : default`, with a nullable result
/// type when the member is a value type.
fn lower_null_conditional(target: Expr, access: Expr) -> Result<Expr> {
    let target_ty = target.ty();
    if target_ty.is_value_type() {
        return Err(Error::UnsupportedConditionalAccess(
            target_ty.display_name(false),
        ));
    }
    let access_ty = access.ty();
    let result_ty = if access_ty.is_value_type() {
        Ty::nullable_of(access_ty)
    } else {
        access_ty
    };
    let test = Expr::Binary {
        op: BinaryOp::NotEqual,
        left: Box::new(target),
        right: Box::new(Expr::constant(Value::Null, Ty::Object)),
        ty: Ty::Bool,
    };
    Ok(Expr::Conditional {
        test: Box::new(test),
        if_true: Box::new(access),
        if_false: Box::new(Expr::constant(Value::Null, result_ty.clone())),
        ty: result_ty,
    })
}

fn bind_anon_object(inits: &[AnonInit], ctx: &mut BindContext<'_>) -> Result<Expr> {
    let mut names = Vec::with_capacity(inits.len());
    let mut types = Vec::with_capacity(inits.len());
    let mut bindings = Vec::with_capacity(inits.len());

    for init in inits {
        let name = match &init.name {
            Some(name) => name.clone(),
            // Infer the member name from the projected expression
            None => match &init.value.kind {
                SynExprKind::Member { name, .. } => name.clone(),
                SynExprKind::NullSafeMember { name, .. } => name.clone(),
                SynExprKind::Ident(name) => name.clone(),
                _ => {
                    return Err(Error::InputValidation(
                        "anonymous object member needs an explicit name".to_string(),
                    ))
                }
            },
        };
        let value = bind(&init.value, ctx)?;
        // Last write wins on duplicate names
        if let Some(pos) = names.iter().position(|n| n == &name) {
            types[pos] = value.ty();
            bindings[pos] = (name, value);
        } else {
            names.push(name.clone());
            types.push(value.ty());
            bindings.push((name, value));
        }
    }

    let base = ctx
        .params
        .first()
        .map(|p| p.ty.display_name(false))
        .unwrap_or_else(|| "Object".to_string());
    let record = RecordTypeRegistry::global().create_type(
        &format!("{base}Projection"),
        &names,
        &types,
    )?;
    Ok(Expr::MemberInit { record, bindings })
}

fn bind_call(
    target: Option<&SynExpr>,
    name: &str,
    args: &[SynExpr],
    null_safe: bool,
    ctx: &mut BindContext<'_>,
) -> Result<Expr> {
    let target = match target {
        Some(t) => bind(t, ctx)?,
        None => return Err(Error::UnsupportedMethod(name.to_string())),
    };

    // Static methods on a type receiver
    if let Expr::Constant {
        value: Value::Type(receiver),
        ..
    } = &target
    {
        let declaring = receiver.display_name(false);
        let ty = static_method(&declaring, name, args.len())
            .ok_or_else(|| Error::UnsupportedMethod(format!("{declaring}.{name}")))?;
        let args: Vec<Expr> = args.iter().map(|a| bind(a, ctx)).collect::<Result<_>>()?;
        return Ok(Expr::Call {
            kind: CallKind::Static { declaring },
            target: None,
            method: name.to_string(),
            args,
            ty,
        });
    }

    let call = bind_value_call(target.clone(), name, args, ctx)?;
    if null_safe {
        lower_null_conditional(target, call)
    } else {
        Ok(call)
    }
}

fn bind_value_call(
    target: Expr,
    name: &str,
    args: &[SynExpr],
    ctx: &mut BindContext<'_>,
) -> Result<Expr> {
    let target_ty = target.ty();

    // Direct instance methods first
    if let Some(ty) = instance_method(&target_ty, name, args.len()) {
        let args: Vec<Expr> = args.iter().map(|a| bind(a, ctx)).collect::<Result<_>>()?;
        return Ok(Expr::Call {
            kind: CallKind::Instance,
            target: Some(Box::new(target)),
            method: name.to_string(),
            args,
            ty,
        });
    }

    // Sequence-operator fallback: receiver becomes the first argument
    if let Ty::Array(element) = target_ty.strip_nullable() {
        let element = (**element).clone();
        if let Some(op) = SequenceOp::from_name(name) {
            if !op.accepts_arity(args.len()) {
                return Err(Error::UnsupportedMethod(name.to_string()));
            }
            let mut bound_args = vec![target];
            let mut body_ty = None;
            for arg in args {
                let bound = match &arg.kind {
                    SynExprKind::Lambda { param, body } => {
                        ctx.params.push(Param::new(param.clone(), element.clone()));
                        let body = bind(body, ctx);
                        ctx.params.pop();
                        let body = body?;
                        body_ty = Some(body.ty());
                        Expr::Lambda {
                            params: vec![Param::new(param.clone(), element.clone())],
                            body: Box::new(body),
                        }
                    }
                    _ => {
                        let mut bound = bind(arg, ctx)?;
                        if bound.ty() != element && can_convert(&bound.ty(), &element) {
                            bound = Expr::Convert {
                                operand: Box::new(bound),
                                ty: element.clone(),
                            };
                        }
                        bound
                    }
                };
                bound_args.push(bound);
            }
            let ty = op.result_type(&element, body_ty.as_ref());
            return Ok(Expr::Call {
                kind: CallKind::Sequence,
                target: None,
                method: name.to_string(),
                args: bound_args,
                ty,
            });
        }
    }

    Err(Error::UnsupportedMethod(name.to_string()))
}
