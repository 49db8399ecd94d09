//! Property accessors over dynamic rows
//!
//! Compiles dotted member paths (with optional `[index]` segments) into
//! reusable getter closures, with a process-wide cache keyed by schema,
//! path and result type. Also hosts the built-in member table for string,
//! date/time and array receivers.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Timelike};
use once_cell::sync::Lazy;

use crate::convert::convert;
use crate::error::{Error, Result};
use crate::types::{RecordType, Ty};
use crate::value::Value;

/// A compiled property accessor
pub type Getter = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Cache identity of a schema. Holds the `Arc` so a live cache entry keeps
/// its schema allocated and the pointer identity stays unique.
struct SchemaKey(Arc<RecordType>);

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

type CacheKey = (SchemaKey, String, String);

static GETTER_CACHE: Lazy<Mutex<HashMap<CacheKey, Getter>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Resolve a member name on a record schema.
///
/// Own fields win, then extended schemas in declared order, nearest
/// declaration first.
pub fn resolve_member(owner: &RecordType, name: &str) -> Result<Ty> {
    owner
        .all_fields()
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.ty.clone())
        .ok_or_else(|| Error::MemberResolution {
            name: name.to_string(),
            type_name: owner.display_name(true),
        })
}

/// Member table for non-record receivers: string, date/time and array
/// pseudo-properties. Returns the member's static type.
pub fn builtin_member(ty: &Ty, name: &str) -> Option<Ty> {
    match (ty.strip_nullable(), name) {
        (Ty::Str, "Length") => Some(Ty::I32),
        (Ty::Array(_), "Length") => Some(Ty::I32),
        (Ty::DateTime | Ty::DateTimeOffset, "Year" | "Month" | "Day") => Some(Ty::I32),
        (Ty::DateTime | Ty::DateTimeOffset, "Hour" | "Minute" | "Second") => Some(Ty::I32),
        (Ty::DateTime, "Date") => Some(Ty::DateTime),
        (Ty::Date, "Year" | "Month" | "Day") => Some(Ty::I32),
        (Ty::Time, "Hour" | "Minute" | "Second") => Some(Ty::I32),
        _ => None,
    }
}

/// Single-step runtime member access on a value
pub fn get_property(value: &Value, name: &str) -> Result<Value> {
    match value {
        Value::Record(rec) => rec.get_field(name).cloned(),
        Value::Str(s) => match name {
            "Length" => Ok(Value::I32(s.chars().count() as i32)),
            _ => member_missing(value, name),
        },
        Value::Array(a) => match name {
            "Length" => Ok(Value::I32(a.items.len() as i32)),
            _ => member_missing(value, name),
        },
        Value::DateTime(dt) => match name {
            "Year" => Ok(Value::I32(dt.stamp.year())),
            "Month" => Ok(Value::I32(dt.stamp.month() as i32)),
            "Day" => Ok(Value::I32(dt.stamp.day() as i32)),
            "Hour" => Ok(Value::I32(dt.stamp.hour() as i32)),
            "Minute" => Ok(Value::I32(dt.stamp.minute() as i32)),
            "Second" => Ok(Value::I32(dt.stamp.second() as i32)),
            "Date" => {
                let mut d = *dt;
                d.stamp = d.stamp.date().and_hms_opt(0, 0, 0).unwrap_or(d.stamp);
                Ok(Value::DateTime(d))
            }
            _ => member_missing(value, name),
        },
        Value::DateTimeOffset(dt) => match name {
            "Year" => Ok(Value::I32(dt.year())),
            "Month" => Ok(Value::I32(dt.month() as i32)),
            "Day" => Ok(Value::I32(dt.day() as i32)),
            "Hour" => Ok(Value::I32(dt.hour() as i32)),
            "Minute" => Ok(Value::I32(dt.minute() as i32)),
            "Second" => Ok(Value::I32(dt.second() as i32)),
            _ => member_missing(value, name),
        },
        Value::Date(d) => match name {
            "Year" => Ok(Value::I32(d.year())),
            "Month" => Ok(Value::I32(d.month() as i32)),
            "Day" => Ok(Value::I32(d.day() as i32)),
            _ => member_missing(value, name),
        },
        Value::Time(t) => match name {
            "Hour" => Ok(Value::I32(t.hour() as i32)),
            "Minute" => Ok(Value::I32(t.minute() as i32)),
            "Second" => Ok(Value::I32(t.second() as i32)),
            _ => member_missing(value, name),
        },
        _ => member_missing(value, name),
    }
}

fn member_missing(value: &Value, name: &str) -> Result<Value> {
    Err(Error::MemberResolution {
        name: name.to_string(),
        type_name: value.runtime_type().display_name(true),
    })
}

/// One step of a compiled access path
#[derive(Debug, Clone)]
enum Step {
    Member(String),
    Index(usize),
}

fn parse_path(path: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for segment in path.split('.') {
        if segment.is_empty() {
            return Err(Error::InputValidation(format!(
                "invalid property path: {path}"
            )));
        }
        match segment.find('[') {
            Some(open) => {
                let close = segment.rfind(']').ok_or_else(|| {
                    Error::InputValidation(format!("invalid property path: {path}"))
                })?;
                let name = &segment[..open];
                let index: usize = segment[open + 1..close].parse().map_err(|_| {
                    Error::InputValidation(format!("invalid property path: {path}"))
                })?;
                if !name.is_empty() {
                    steps.push(Step::Member(name.to_string()));
                }
                steps.push(Step::Index(index));
            }
            None => steps.push(Step::Member(segment.to_string())),
        }
    }
    Ok(steps)
}

fn apply_step(value: &Value, step: &Step) -> Result<Value> {
    match step {
        Step::Member(name) => get_property(value, name),
        Step::Index(i) => match value {
            Value::Array(a) => a
                .items
                .get(*i)
                .cloned()
                .ok_or_else(|| Error::eval(format!("index {i} out of range"))),
            Value::Str(s) => s
                .chars()
                .nth(*i)
                .map(Value::Char)
                .ok_or_else(|| Error::eval(format!("index {i} out of range"))),
            other => Err(Error::UnsupportedElementAccess(
                other.runtime_type().display_name(false),
            )),
        },
    }
}

/// Compile a dotted path (segments may carry `[index]` suffixes) into a
/// getter over rows of the given schema. The result is converted to
/// `result_ty` on every call. Compiled getters are cached.
pub fn getter(owner: &Arc<RecordType>, path: &str, result_ty: &Ty) -> Result<Getter> {
    let key: CacheKey = (
        SchemaKey(Arc::clone(owner)),
        path.to_string(),
        result_ty.display_name(true),
    );
    if let Some(hit) = GETTER_CACHE.lock().unwrap().get(&key) {
        return Ok(Arc::clone(hit));
    }

    // Validate the path against the schema before building the closure
    let steps = parse_path(path)?;
    let mut ty = Ty::Record(Arc::clone(owner));
    for step in &steps {
        ty = match step {
            Step::Member(name) => match ty.strip_nullable() {
                Ty::Record(rec) => resolve_member(rec, name)?,
                other => builtin_member(other, name).ok_or_else(|| Error::MemberResolution {
                    name: name.clone(),
                    type_name: other.display_name(true),
                })?,
            },
            Step::Index(_) => match ty.strip_nullable() {
                Ty::Array(element) => (**element).clone(),
                Ty::Str => Ty::Char,
                other => {
                    return Err(Error::UnsupportedElementAccess(other.display_name(false)))
                }
            },
        };
    }

    let result_ty = result_ty.clone();
    let compiled: Getter = Arc::new(move |row: &Value| {
        let mut current = row.clone();
        for step in &steps {
            if current.is_null() {
                return Err(Error::eval("property access on null".to_string()));
            }
            current = apply_step(&current, step)?;
        }
        convert(&current, &result_ty)
    });

    GETTER_CACHE
        .lock()
        .unwrap()
        .insert(key, Arc::clone(&compiled));
    Ok(compiled)
}
