//! Dynamic runtime values
//!
//! Expressions evaluate over rows of dynamic [`Value`]s rather than native
//! structs. A [`RecordValue`] pairs a shared schema with a flat field
//! vector; arrays carry their element type so serialization can render
//! typed array literals.

use std::sync::Arc;

use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{EnumType, RecordType, Ty};

/// Kind marker for a timestamp, mirroring `DateTimeKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeKind {
    Unspecified,
    Utc,
    Local,
}

/// A timestamp plus its kind marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateTimeValue {
    pub stamp: NaiveDateTime,
    pub kind: DateTimeKind,
}

impl DateTimeValue {
    pub fn new(stamp: NaiveDateTime, kind: DateTimeKind) -> Self {
        Self { stamp, kind }
    }

    pub fn unspecified(stamp: NaiveDateTime) -> Self {
        Self::new(stamp, DateTimeKind::Unspecified)
    }

    pub fn utc(stamp: NaiveDateTime) -> Self {
        Self::new(stamp, DateTimeKind::Utc)
    }
}

/// A typed array value
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub element: Ty,
    pub items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(element: Ty, items: Vec<Value>) -> Self {
        Self { element, items }
    }
}

/// A record instance: a schema plus one value per visible field
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub ty: Arc<RecordType>,
    values: Vec<Value>,
}

impl RecordValue {
    /// Create an instance with every field set to its default
    pub fn new(ty: Arc<RecordType>) -> Self {
        let values = ty
            .all_fields()
            .iter()
            .map(|f| Value::default_of(&f.ty))
            .collect();
        Self { ty, values }
    }

    /// Look up a field value by name
    pub fn get_field(&self, name: &str) -> Result<&Value> {
        let idx = self.field_index(name)?;
        Ok(&self.values[idx])
    }

    /// Set a field value by name
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        let idx = self.field_index(name)?;
        self.values[idx] = value;
        Ok(())
    }

    fn field_index(&self, name: &str) -> Result<usize> {
        self.ty
            .all_fields()
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::MemberResolution {
                name: name.to_string(),
                type_name: self.ty.display_name(true),
            })
    }
}

/// A value of a named enum type
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub ty: Arc<EnumType>,
    pub value: i64,
}

/// A dynamic runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Str(String),
    DateTime(DateTimeValue),
    DateTimeOffset(ChronoDateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    Guid(Uuid),
    Array(ArrayValue),
    Record(RecordValue),
    Enum(EnumValue),
    /// A type used as a value (static-method receiver)
    Type(Ty),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of the value; `Null` reports as `Object`
    pub fn runtime_type(&self) -> Ty {
        match self {
            Value::Null => Ty::Object,
            Value::Bool(_) => Ty::Bool,
            Value::Char(_) => Ty::Char,
            Value::I32(_) => Ty::I32,
            Value::I64(_) => Ty::I64,
            Value::F32(_) => Ty::F32,
            Value::F64(_) => Ty::F64,
            Value::Decimal(_) => Ty::Decimal,
            Value::Str(_) => Ty::Str,
            Value::DateTime(_) => Ty::DateTime,
            Value::DateTimeOffset(_) => Ty::DateTimeOffset,
            Value::Date(_) => Ty::Date,
            Value::Time(_) => Ty::Time,
            Value::Guid(_) => Ty::Guid,
            Value::Array(a) => Ty::array_of(a.element.clone()),
            Value::Record(r) => Ty::Record(Arc::clone(&r.ty)),
            Value::Enum(e) => Ty::Enum(Arc::clone(&e.ty)),
            Value::Type(_) => Ty::Type,
        }
    }

    /// Default value of a static type: zero for value types, null otherwise
    pub fn default_of(ty: &Ty) -> Value {
        match ty {
            Ty::Bool => Value::Bool(false),
            Ty::Char => Value::Char('\0'),
            Ty::I32 => Value::I32(0),
            Ty::I64 => Value::I64(0),
            Ty::F32 => Value::F32(0.0),
            Ty::F64 => Value::F64(0.0),
            Ty::Decimal => Value::Decimal(Decimal::ZERO),
            Ty::DateTime => Value::DateTime(DateTimeValue::unspecified(
                NaiveDateTime::MIN,
            )),
            Ty::Date => Value::Date(NaiveDate::MIN),
            Ty::Time => Value::Time(NaiveTime::MIN),
            Ty::Guid => Value::Guid(Uuid::nil()),
            Ty::Enum(e) => Value::Enum(EnumValue {
                ty: Arc::clone(e),
                value: 0,
            }),
            Ty::DateTimeOffset => {
                let epoch = NaiveDateTime::MIN.and_utc().fixed_offset();
                Value::DateTimeOffset(epoch)
            }
            _ => Value::Null,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
