//! dynexpr
//!
//! Dynamic expression engine: parses C#-style lambda text into typed
//! expression trees over schema-described rows, evaluates them, and
//! serializes trees back to equivalent text.
//!
//! Row shapes are described by [`RecordType`] schemas rather than native
//! structs, so filters and projections can be built entirely at runtime:
//!
//! ```
//! use dynexpr::{parse_predicate, Field, RecordType, RecordValue, Ty, Value};
//!
//! let schema = RecordType::new(
//!     "Order",
//!     vec![Field::new("Total", Ty::F64), Field::new("Customer", Ty::Str)],
//! );
//! let element = Ty::Record(schema.clone());
//!
//! let predicate =
//!     parse_predicate(&element, "o => o.Total > 100 && o.Customer != null", None).unwrap();
//!
//! let mut row = RecordValue::new(schema);
//! row.set_field("Total", Value::F64(250.0)).unwrap();
//! row.set_field("Customer", Value::from("Acme")).unwrap();
//! assert!(predicate.test(&Value::Record(row)).unwrap());
//! ```

pub mod access;
pub mod binder;
pub mod convert;
pub mod error;
pub mod eval;
pub mod expr;
pub mod methods;
pub mod parse;
pub mod record;
pub mod serialize;
pub mod types;
pub mod value;

// Re-exports
pub use access::{get_property, getter, Getter};
pub use binder::bind_lambda;
pub use convert::{can_convert, convert};
pub use error::{Error, Result};
pub use eval::{eval, Scope};
pub use expr::{BinaryOp, CallKind, Expr, Param, UnaryOp};
pub use parse::{parse_lambda, parse_lambda_typed, parse_predicate, Lambda, Predicate};
pub use record::RecordTypeRegistry;
pub use serialize::{serialize, Serializer};
pub use types::{
    resolve_type_name, well_known_type, EnumType, Field, RecordType, Ty, TypeResolverFn,
};
pub use value::{
    ArrayValue, DateTimeKind, DateTimeValue, EnumValue, RecordValue, Value,
};
