//! Method tables: bind-time signatures and runtime dispatch
//!
//! Three method families exist: sequence operators over array receivers,
//! a small set of string instance methods (plus `ToString` on anything),
//! and static parse/factory methods on the date, time and Guid types.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Ty;
use crate::value::{DateTimeKind, DateTimeValue, Value};

/// Sequence operators recognized by the call fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOp {
    Where,
    Select,
    Any,
    All,
    Count,
    Contains,
    First,
    FirstOrDefault,
    OrderBy,
    OrderByDescending,
}

impl SequenceOp {
    pub fn from_name(name: &str) -> Option<SequenceOp> {
        Some(match name {
            "Where" => SequenceOp::Where,
            "Select" => SequenceOp::Select,
            "Any" => SequenceOp::Any,
            "All" => SequenceOp::All,
            "Count" => SequenceOp::Count,
            "Contains" => SequenceOp::Contains,
            "First" => SequenceOp::First,
            "FirstOrDefault" => SequenceOp::FirstOrDefault,
            "OrderBy" => SequenceOp::OrderBy,
            "OrderByDescending" => SequenceOp::OrderByDescending,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SequenceOp::Where => "Where",
            SequenceOp::Select => "Select",
            SequenceOp::Any => "Any",
            SequenceOp::All => "All",
            SequenceOp::Count => "Count",
            SequenceOp::Contains => "Contains",
            SequenceOp::First => "First",
            SequenceOp::FirstOrDefault => "FirstOrDefault",
            SequenceOp::OrderBy => "OrderBy",
            SequenceOp::OrderByDescending => "OrderByDescending",
        }
    }

    /// Whether the operator takes a lambda argument; `Any`/`Count`/`First`
    /// variants also accept zero extra arguments.
    pub fn accepts_arity(&self, extra_args: usize) -> bool {
        match self {
            SequenceOp::Where
            | SequenceOp::Select
            | SequenceOp::All
            | SequenceOp::OrderBy
            | SequenceOp::OrderByDescending => extra_args == 1,
            SequenceOp::Any
            | SequenceOp::Count
            | SequenceOp::First
            | SequenceOp::FirstOrDefault => extra_args <= 1,
            SequenceOp::Contains => extra_args == 1,
        }
    }

    /// Result type given the element type and the type of the lambda body
    /// (where one is present)
    pub fn result_type(&self, element: &Ty, body: Option<&Ty>) -> Ty {
        match self {
            SequenceOp::Where | SequenceOp::OrderBy | SequenceOp::OrderByDescending => {
                Ty::array_of(element.clone())
            }
            SequenceOp::Select => {
                Ty::array_of(body.cloned().unwrap_or(Ty::Object))
            }
            SequenceOp::Any | SequenceOp::All | SequenceOp::Contains => Ty::Bool,
            SequenceOp::Count => Ty::I32,
            SequenceOp::First | SequenceOp::FirstOrDefault => element.clone(),
        }
    }
}

/// Bind-time signature of an instance method: result type given the
/// receiver. `None` means no such method on that receiver.
pub fn instance_method(receiver: &Ty, name: &str, arg_count: usize) -> Option<Ty> {
    if name == "ToString" && arg_count == 0 {
        return Some(Ty::Str);
    }
    match (receiver.strip_nullable(), name, arg_count) {
        (Ty::Str, "Contains" | "StartsWith" | "EndsWith", 1) => Some(Ty::Bool),
        (Ty::Str, "ToLower" | "ToUpper" | "Trim", 0) => Some(Ty::Str),
        _ => None,
    }
}

/// Bind-time signature of a static method on a well-known type name
pub fn static_method(declaring: &str, name: &str, arg_count: usize) -> Option<Ty> {
    match (declaring, name, arg_count) {
        ("DateTime", "Parse", 1) => Some(Ty::DateTime),
        ("DateTimeOffset", "Parse", 1) => Some(Ty::DateTimeOffset),
        ("DateOnly", "Parse", 1) => Some(Ty::Date),
        ("TimeOnly", "Parse", 1) => Some(Ty::Time),
        ("Guid", "Parse", 1) => Some(Ty::Guid),
        ("Guid", "NewGuid", 0) => Some(Ty::Guid),
        _ => None,
    }
}

/// Static members that bind as constants (evaluated when the tree is built)
pub fn static_member(declaring: &str, name: &str) -> Option<(Value, Ty)> {
    match (declaring, name) {
        ("Guid", "Empty") => Some((Value::Guid(Uuid::nil()), Ty::Guid)),
        ("DateTime", "Now") => {
            let now = chrono::Local::now().naive_local();
            Some((
                Value::DateTime(DateTimeValue::new(now, DateTimeKind::Local)),
                Ty::DateTime,
            ))
        }
        ("DateTime", "UtcNow") => {
            let now = Utc::now().naive_utc();
            Some((Value::DateTime(DateTimeValue::utc(now)), Ty::DateTime))
        }
        ("DateTime", "Today") => {
            let today = chrono::Local::now().date_naive();
            let stamp = today.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN);
            Some((
                Value::DateTime(DateTimeValue::new(stamp, DateTimeKind::Local)),
                Ty::DateTime,
            ))
        }
        _ => None,
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d",
];

const DATE_TIME_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Parse a timestamp. A trailing `Z` marks the result as UTC, a zone
/// offset marks it local (keeping the wall clock as written), anything
/// else is unspecified.
pub fn parse_date_time(text: &str) -> Result<DateTimeValue> {
    let (body, kind) = match text.strip_suffix('Z') {
        Some(body) => (body, DateTimeKind::Utc),
        None => (text, DateTimeKind::Unspecified),
    };
    if kind == DateTimeKind::Unspecified {
        for format in DATE_TIME_OFFSET_FORMATS {
            if let Ok(stamp) = chrono::DateTime::parse_from_str(body, format) {
                return Ok(DateTimeValue::new(stamp.naive_local(), DateTimeKind::Local));
            }
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(body, format) {
            return Ok(DateTimeValue::new(stamp, kind));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(body, "%Y-%m-%d") {
        let stamp = date.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN);
        return Ok(DateTimeValue::new(stamp, kind));
    }
    Err(Error::eval(format!("invalid DateTime text: {text}")))
}

fn parse_date_time_offset(text: &str) -> Result<chrono::DateTime<FixedOffset>> {
    chrono::DateTime::parse_from_rfc3339(text)
        .map_err(|_| Error::eval(format!("invalid DateTimeOffset text: {text}")))
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| Error::eval(format!("invalid DateOnly text: {text}")))
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|_| Error::eval(format!("invalid TimeOnly text: {text}")))
}

fn expect_str(value: &Value, method: &str) -> Result<String> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(Error::eval(format!(
            "{method} expects a string argument, got {}",
            other.runtime_type().display_name(false)
        ))),
    }
}

/// Runtime dispatch for instance methods
pub fn invoke_instance(target: &Value, method: &str, args: &[Value]) -> Result<Value> {
    if method == "ToString" && args.is_empty() {
        return Ok(Value::Str(display_value(target)));
    }
    match target {
        Value::Str(s) => match method {
            "Contains" => Ok(Value::Bool(s.contains(&expect_str(&args[0], method)?))),
            "StartsWith" => Ok(Value::Bool(s.starts_with(&expect_str(&args[0], method)?))),
            "EndsWith" => Ok(Value::Bool(s.ends_with(&expect_str(&args[0], method)?))),
            "ToLower" => Ok(Value::Str(s.to_lowercase())),
            "ToUpper" => Ok(Value::Str(s.to_uppercase())),
            "Trim" => Ok(Value::Str(s.trim().to_string())),
            _ => Err(Error::UnsupportedMethod(method.to_string())),
        },
        Value::Null => Err(Error::eval(format!("{method} called on null"))),
        _ => Err(Error::UnsupportedMethod(method.to_string())),
    }
}

/// Runtime dispatch for static methods
pub fn invoke_static(declaring: &str, method: &str, args: &[Value]) -> Result<Value> {
    match (declaring, method) {
        ("DateTime", "Parse") => {
            let text = expect_str(&args[0], "DateTime.Parse")?;
            Ok(Value::DateTime(parse_date_time(&text)?))
        }
        ("DateTimeOffset", "Parse") => {
            let text = expect_str(&args[0], "DateTimeOffset.Parse")?;
            Ok(Value::DateTimeOffset(parse_date_time_offset(&text)?))
        }
        ("DateOnly", "Parse") => {
            let text = expect_str(&args[0], "DateOnly.Parse")?;
            Ok(Value::Date(parse_date(&text)?))
        }
        ("TimeOnly", "Parse") => {
            let text = expect_str(&args[0], "TimeOnly.Parse")?;
            Ok(Value::Time(parse_time(&text)?))
        }
        ("Guid", "Parse") => {
            let text = expect_str(&args[0], "Guid.Parse")?;
            let guid = Uuid::parse_str(&text)
                .map_err(|_| Error::eval(format!("invalid Guid text: {text}")))?;
            Ok(Value::Guid(guid))
        }
        ("Guid", "NewGuid") => Ok(Value::Guid(Uuid::new_v4())),
        _ => Err(Error::UnsupportedMethod(format!("{declaring}.{method}"))),
    }
}

/// `ToString` rendering of a value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Char(c) => c.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Str(s) => s.clone(),
        Value::DateTime(dt) => dt.stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        Value::DateTimeOffset(dt) => dt.to_rfc3339(),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::Time(t) => t.format("%H:%M:%S").to_string(),
        Value::Guid(g) => g.to_string(),
        Value::Array(_) | Value::Record(_) => format!("{value:?}"),
        Value::Enum(e) => e.value.to_string(),
        Value::Type(ty) => ty.display_name(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequence_op_lookup() {
        assert_eq!(SequenceOp::from_name("Where"), Some(SequenceOp::Where));
        assert_eq!(SequenceOp::from_name("Sum"), None);
    }

    #[test]
    fn test_sequence_result_types() {
        let elem = Ty::I32;
        assert_eq!(
            SequenceOp::Where.result_type(&elem, None),
            Ty::array_of(Ty::I32)
        );
        assert_eq!(
            SequenceOp::Select.result_type(&elem, Some(&Ty::Str)),
            Ty::array_of(Ty::Str)
        );
        assert_eq!(SequenceOp::Count.result_type(&elem, None), Ty::I32);
        assert_eq!(SequenceOp::First.result_type(&elem, None), Ty::I32);
    }

    #[test]
    fn test_string_methods() {
        let s = Value::from("Hello World");
        assert_eq!(
            invoke_instance(&s, "Contains", &[Value::from("World")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            invoke_instance(&s, "ToLower", &[]).unwrap(),
            Value::from("hello world")
        );
        assert_eq!(
            invoke_instance(&Value::from("  x "), "Trim", &[]).unwrap(),
            Value::from("x")
        );
    }

    #[test]
    fn test_to_string_on_number() {
        assert_eq!(
            invoke_instance(&Value::I32(42), "ToString", &[]).unwrap(),
            Value::from("42")
        );
    }

    #[test]
    fn test_date_time_parse_kinds() {
        let unspec = parse_date_time("2024-03-15T10:30:00").unwrap();
        assert_eq!(unspec.kind, DateTimeKind::Unspecified);

        let utc = parse_date_time("2024-03-15T10:30:00.0000000Z").unwrap();
        assert_eq!(utc.kind, DateTimeKind::Utc);

        // A zone offset marks the stamp local; the wall clock is not shifted
        let local = parse_date_time("2024-03-15T10:30:00.0000000+02:00").unwrap();
        assert_eq!(local.kind, DateTimeKind::Local);
        assert_eq!(local.stamp, unspec.stamp);

        let date_only = parse_date_time("2024-03-15").unwrap();
        assert_eq!(
            date_only.stamp,
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_static_parse_methods() {
        let d = invoke_static("DateOnly", "Parse", &[Value::from("2024-01-02")]).unwrap();
        assert_eq!(d, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));

        let g = invoke_static(
            "Guid",
            "Parse",
            &[Value::from("9e743c39-a807-4fde-80f5-d51e189b2181")],
        )
        .unwrap();
        assert!(matches!(g, Value::Guid(_)));
    }

    #[test]
    fn test_instance_signatures() {
        assert_eq!(instance_method(&Ty::Str, "Contains", 1), Some(Ty::Bool));
        assert_eq!(instance_method(&Ty::I32, "ToString", 0), Some(Ty::Str));
        assert_eq!(instance_method(&Ty::I32, "Contains", 1), None);
    }
}
