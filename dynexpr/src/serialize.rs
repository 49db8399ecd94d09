//! Rendering typed expressions back to source text
//!
//! The output parses back to an equivalent tree: binary and conditional
//! nodes are fully parenthesized so precedence never has to be
//! reconstructed, and non-trivial constants render as `Parse` calls on
//! their type.

use crate::error::{Error, Result};
use crate::expr::{CallKind, Expr, UnaryOp};
use crate::value::{ArrayValue, DateTimeKind, Value};

/// Serializes expression trees to text. The internal buffer is reused
/// across calls.
#[derive(Debug, Default)]
pub struct Serializer {
    out: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render an expression to source text
    pub fn serialize(&mut self, expr: &Expr) -> Result<String> {
        self.out.clear();
        self.write(expr)?;
        Ok(std::mem::take(&mut self.out))
    }

    fn write(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Constant { value, .. } => self.write_value(value),
            Expr::Parameter { name, .. } => {
                self.out.push_str(name);
                Ok(())
            }
            Expr::Member { target, name, .. } => {
                self.write(target)?;
                self.out.push('.');
                self.out.push_str(name);
                Ok(())
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                self.out.push('(');
                self.write(left)?;
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.write(right)?;
                self.out.push(')');
                Ok(())
            }
            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Not => {
                    self.out.push_str("(!(");
                    self.write(operand)?;
                    self.out.push_str("))");
                    Ok(())
                }
                UnaryOp::Negate => {
                    self.out.push('-');
                    self.write(operand)
                }
                UnaryOp::UnaryPlus => {
                    self.out.push('+');
                    self.write(operand)
                }
            },
            Expr::Convert { operand, ty } => {
                // Casts survive only over element access; elsewhere the
                // conversion is implicit in the operand's rendering
                if matches!(**operand, Expr::Index { .. }) {
                    self.out.push('(');
                    self.out.push_str(&ty.display_name(false));
                    self.out.push(')');
                }
                self.write(operand)
            }
            Expr::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => {
                self.out.push('(');
                self.write(test)?;
                self.out.push_str(" ? ");
                self.write(if_true)?;
                self.out.push_str(" : ");
                self.write(if_false)?;
                self.out.push(')');
                Ok(())
            }
            Expr::Call {
                kind,
                target,
                method,
                args,
                ..
            } => match kind {
                CallKind::Sequence => {
                    self.write(&args[0])?;
                    self.out.push('.');
                    self.out.push_str(method);
                    self.out.push('(');
                    self.write_args(&args[1..])?;
                    self.out.push(')');
                    Ok(())
                }
                CallKind::Static { declaring } => {
                    self.out.push_str(declaring);
                    self.out.push('.');
                    self.out.push_str(method);
                    self.out.push('(');
                    self.write_args(args)?;
                    self.out.push(')');
                    Ok(())
                }
                CallKind::Instance => {
                    match target {
                        Some(t) => self.write(t)?,
                        None => return Err(Error::UnsupportedSyntax(method.clone())),
                    }
                    self.out.push('.');
                    self.out.push_str(method);
                    self.out.push('(');
                    self.write_args(args)?;
                    self.out.push(')');
                    Ok(())
                }
            },
            Expr::Lambda { params, body } => {
                match params.as_slice() {
                    [single] => self.out.push_str(&single.name),
                    many => {
                        self.out.push('(');
                        for (i, p) in many.iter().enumerate() {
                            if i > 0 {
                                self.out.push_str(", ");
                            }
                            self.out.push_str(&p.name);
                        }
                        self.out.push(')');
                    }
                }
                self.out.push_str(" => ");
                self.write(body)
            }
            Expr::NewArray { items, .. } => {
                // Parenthesized when the literal could bind badly inside a
                // larger expression
                let wrap = items.len() > 1
                    || matches!(items.as_slice(), [only] if !matches!(only, Expr::Constant { .. }));
                if wrap {
                    self.out.push('(');
                }
                self.out.push_str("new [] {");
                self.write_args(items)?;
                self.out.push('}');
                if wrap {
                    self.out.push(')');
                }
                Ok(())
            }
            Expr::Index { target, args, .. } => {
                self.write(target)?;
                self.out.push('[');
                self.write_args(args)?;
                self.out.push(']');
                Ok(())
            }
            Expr::MemberInit { .. } => {
                Err(Error::UnsupportedSyntax("MemberInit".to_string()))
            }
        }
    }

    fn write_args(&mut self, args: &[Expr]) -> Result<()> {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write(arg)?;
        }
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Char(c) => {
                self.out.push('\'');
                push_escaped_char(&mut self.out, *c);
                self.out.push('\'');
            }
            Value::Str(s) => {
                self.out.push('"');
                for c in s.chars() {
                    push_escaped_char(&mut self.out, c);
                }
                self.out.push('"');
            }
            Value::I32(v) => self.out.push_str(&v.to_string()),
            Value::I64(v) => self.out.push_str(&v.to_string()),
            Value::F32(v) => self.out.push_str(&v.to_string()),
            Value::F64(v) => self.out.push_str(&v.to_string()),
            Value::Decimal(v) => self.out.push_str(&v.to_string()),
            Value::DateTime(dt) => {
                let text = if dt.stamp.time() == chrono::NaiveTime::MIN {
                    dt.stamp.format("%Y-%m-%d").to_string()
                } else {
                    let base = dt.stamp.format("%Y-%m-%dT%H:%M:%S").to_string();
                    let fraction = dt.stamp.and_utc().timestamp_subsec_nanos() / 100;
                    // The kind marker reparses: `Z` for UTC, a zone offset
                    // for local time, nothing for unspecified
                    let suffix = match dt.kind {
                        DateTimeKind::Utc => "Z".to_string(),
                        DateTimeKind::Local => local_offset(&dt.stamp),
                        DateTimeKind::Unspecified => String::new(),
                    };
                    format!("{base}.{fraction:07}{suffix}")
                };
                self.out.push_str("DateTime.Parse(\"");
                self.out.push_str(&text);
                self.out.push_str("\")");
            }
            Value::DateTimeOffset(dt) => {
                self.out.push_str("DateTimeOffset.Parse(\"");
                self.out.push_str(&dt.to_rfc3339());
                self.out.push_str("\")");
            }
            Value::Date(d) => {
                self.out.push_str("DateOnly.Parse(\"");
                self.out.push_str(&d.format("%Y-%m-%d").to_string());
                self.out.push_str("\")");
            }
            Value::Time(t) => {
                self.out.push_str("TimeOnly.Parse(\"");
                self.out.push_str(&t.format("%H:%M:%S").to_string());
                self.out.push_str("\")");
            }
            Value::Guid(g) => {
                self.out.push_str("Guid.Parse(\"");
                self.out.push_str(&g.to_string());
                self.out.push_str("\")");
            }
            Value::Array(array) => self.write_array_value(array)?,
            Value::Enum(e) => {
                self.out.push('(');
                self.out.push_str(&e.ty.display_name(true));
                self.out.push(')');
                self.out.push_str(&e.value.to_string());
            }
            Value::Record(_) | Value::Type(_) => {
                return Err(Error::UnsupportedSyntax(
                    value.runtime_type().display_name(false),
                ))
            }
        }
        Ok(())
    }

    fn write_array_value(&mut self, array: &ArrayValue) -> Result<()> {
        // Element type is spelled out only where inference would lose the
        // nullable wrapper
        if array.element.is_nullable() {
            self.out.push_str("new ");
            self.out.push_str(&array.element.display_name(false));
            self.out.push_str("[] {");
        } else {
            self.out.push_str("new [] {");
        }
        for (i, item) in array.items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_value(item)?;
        }
        self.out.push('}');
        Ok(())
    }
}

/// One-shot rendering
pub fn serialize(expr: &Expr) -> Result<String> {
    Serializer::new().serialize(expr)
}

/// Zone offset of the machine's local time at the given wall-clock stamp,
/// as `+hh:mm`/`-hh:mm` text
fn local_offset(stamp: &chrono::NaiveDateTime) -> String {
    stamp
        .and_local_timezone(chrono::Local)
        .earliest()
        .map(|t| t.offset().to_string())
        .unwrap_or_else(|| "+00:00".to_string())
}

fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        '\'' => out.push_str("\\'"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        other => out.push(other),
    }
}
