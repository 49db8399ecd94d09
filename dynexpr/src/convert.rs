//! Value conversions
//!
//! Runtime counterpart of `Convert` expression nodes. Numeric widths
//! cross-convert freely, nullable targets pass null through and convert
//! everything else to the inner type, and enums convert to and from their
//! underlying integral representation.

use std::sync::Arc;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::types::Ty;
use crate::value::{EnumValue, Value};

fn conversion_error(value: &Value, to: &Ty) -> Error {
    Error::Conversion {
        from: value.runtime_type().display_name(false),
        to: to.display_name(false),
    }
}

/// Check at tree-build time whether a conversion is plausible. Looser than
/// [`convert`]: it answers for types, not values, so `Object` converts to
/// anything and numeric types cross-convert.
pub fn can_convert(from: &Ty, to: &Ty) -> bool {
    if from == to || *from == Ty::Object || *to == Ty::Object {
        return true;
    }
    let from = from.strip_nullable();
    let to = to.strip_nullable();
    if from == to {
        return true;
    }
    if from.is_numeric() && to.is_numeric() {
        return true;
    }
    match (from, to) {
        (Ty::Enum(e), t) | (t, Ty::Enum(e)) => e.underlying == *t || t.is_numeric(),
        (Ty::Str, Ty::Char) | (Ty::Char, Ty::Str) => true,
        _ => false,
    }
}

/// Convert a runtime value to the requested type, or fail with a
/// conversion error.
pub fn convert(value: &Value, to: &Ty) -> Result<Value> {
    // Nullable target: null passes, everything else converts to the inner
    if let Ty::Nullable(inner) = to {
        if value.is_null() {
            return Ok(Value::Null);
        }
        return convert(value, inner);
    }

    if *to == Ty::Object {
        return Ok(value.clone());
    }

    if value.is_null() {
        if to.is_value_type() {
            return Err(conversion_error(value, to));
        }
        return Ok(Value::Null);
    }

    if value.runtime_type() == *to {
        return Ok(value.clone());
    }

    match (value, to) {
        // Numeric cross-conversions
        (v, t) if numeric_f64(v).is_some() && t.is_numeric() => {
            numeric_to(v, t).ok_or_else(|| conversion_error(value, to))
        }
        // Enum to integral and back
        (Value::Enum(e), t) if t.is_numeric() => {
            numeric_to(&Value::I64(e.value), t).ok_or_else(|| conversion_error(value, to))
        }
        (v, Ty::Enum(e)) if numeric_f64(v).is_some() => {
            let raw = match numeric_to(v, &Ty::I64) {
                Some(Value::I64(i)) => i,
                _ => return Err(conversion_error(value, to)),
            };
            Ok(Value::Enum(EnumValue {
                ty: Arc::clone(e),
                value: raw,
            }))
        }
        (Value::Char(c), Ty::Str) => Ok(Value::Str(c.to_string())),
        _ => Err(conversion_error(value, to)),
    }
}

fn numeric_f64(value: &Value) -> Option<f64> {
    match value {
        Value::I32(v) => Some(*v as f64),
        Value::I64(v) => Some(*v as f64),
        Value::F32(v) => Some(*v as f64),
        Value::F64(v) => Some(*v),
        Value::Decimal(v) => v.to_f64(),
        _ => None,
    }
}

fn numeric_to(value: &Value, to: &Ty) -> Option<Value> {
    match to {
        Ty::Decimal => {
            let d = match value {
                Value::I32(v) => Decimal::from(*v),
                Value::I64(v) => Decimal::from(*v),
                Value::F32(v) => Decimal::from_f32(*v)?,
                Value::F64(v) => Decimal::from_f64(*v)?,
                Value::Decimal(v) => *v,
                _ => return None,
            };
            Some(Value::Decimal(d))
        }
        Ty::I32 => match value {
            Value::I32(v) => Some(Value::I32(*v)),
            Value::I64(v) => Some(Value::I32(*v as i32)),
            Value::F32(v) => Some(Value::I32(*v as i32)),
            Value::F64(v) => Some(Value::I32(*v as i32)),
            Value::Decimal(v) => v.to_i32().map(Value::I32),
            _ => None,
        },
        Ty::I64 => match value {
            Value::I32(v) => Some(Value::I64(*v as i64)),
            Value::I64(v) => Some(Value::I64(*v)),
            Value::F32(v) => Some(Value::I64(*v as i64)),
            Value::F64(v) => Some(Value::I64(*v as i64)),
            Value::Decimal(v) => v.to_i64().map(Value::I64),
            _ => None,
        },
        Ty::F32 => numeric_f64(value).map(|v| Value::F32(v as f32)),
        Ty::F64 => numeric_f64(value).map(Value::F64),
        _ => None,
    }
}
