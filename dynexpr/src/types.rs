//! Static type descriptors for the expression language
//!
//! Rust has no runtime reflection, so the element types expressions are
//! parsed against are described by [`RecordType`] schemas, and every typed
//! expression node carries a [`Ty`]. The well-known type-name table and the
//! source-like display renderer live here as well.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Static type of an expression node or record field
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    /// Untyped/unknown (the type of a bare `null` literal)
    Object,
    Bool,
    Char,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    Str,
    DateTime,
    DateTimeOffset,
    Date,
    Time,
    Guid,
    /// `T?` — wraps any resolved type, value or reference, unconditionally
    Nullable(Box<Ty>),
    /// `T[]`, also the sequence type for LINQ-style operators
    Array(Box<Ty>),
    /// A nominal record/interface schema
    Record(Arc<RecordType>),
    /// A named enum type
    Enum(Arc<EnumType>),
    /// The type of a constant holding a type (static-method receiver)
    Type,
}

impl Ty {
    /// Shorthand for `Ty::Array(Box::new(element))`
    pub fn array_of(element: Ty) -> Ty {
        Ty::Array(Box::new(element))
    }

    /// Shorthand for `Ty::Nullable(Box::new(inner))`
    pub fn nullable_of(inner: Ty) -> Ty {
        Ty::Nullable(Box::new(inner))
    }

    /// Check if this is the nullable wrapper
    pub fn is_nullable(&self) -> bool {
        matches!(self, Ty::Nullable(_))
    }

    /// Non-nullable value types reject null and null-conditional access
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Ty::Bool
                | Ty::Char
                | Ty::I32
                | Ty::I64
                | Ty::F32
                | Ty::F64
                | Ty::Decimal
                | Ty::DateTime
                | Ty::DateTimeOffset
                | Ty::Date
                | Ty::Time
                | Ty::Guid
                | Ty::Enum(_)
        )
    }

    /// Check if this is one of the numeric types
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Ty::I32 | Ty::I64 | Ty::F32 | Ty::F64 | Ty::Decimal
        )
    }

    /// Unwrap the nullable wrapper, if present
    pub fn strip_nullable(&self) -> &Ty {
        match self {
            Ty::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Element type of a sequence receiver
    pub fn element_type(&self) -> Option<&Ty> {
        match self {
            Ty::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Render the type as a source-like name.
    ///
    /// Handles arrays, nullable-of-T, and generic record names (backtick
    /// arity markers split off, nested-type `+` separators normalized to
    /// `.`). With `qualify` the namespace is prepended where known.
    pub fn display_name(&self, qualify: bool) -> String {
        match self {
            Ty::Object => "object".to_string(),
            Ty::Bool => "bool".to_string(),
            Ty::Char => "char".to_string(),
            Ty::I32 => "int".to_string(),
            Ty::I64 => "long".to_string(),
            Ty::F32 => "float".to_string(),
            Ty::F64 => "double".to_string(),
            Ty::Decimal => "decimal".to_string(),
            Ty::Str => "string".to_string(),
            Ty::DateTime => "DateTime".to_string(),
            Ty::DateTimeOffset => "DateTimeOffset".to_string(),
            Ty::Date => "DateOnly".to_string(),
            Ty::Time => "TimeOnly".to_string(),
            Ty::Guid => "Guid".to_string(),
            Ty::Nullable(inner) => format!("{}?", inner.display_name(qualify)),
            Ty::Array(element) => format!("{}[]", element.display_name(qualify)),
            Ty::Record(record) => record.display_name(qualify),
            Ty::Enum(e) => e.display_name(qualify),
            Ty::Type => "Type".to_string(),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name(false))
    }
}

/// One named, typed field of a record schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Ty,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A nominal record or interface schema: the stand-in for a CLR type.
///
/// Fields are fixed at creation time; schemas are immutable after
/// construction and shared behind `Arc`.
#[derive(Debug)]
pub struct RecordType {
    /// Simple or CLR-style name; may contain backtick arity markers
    /// (`List`1`) and nested-type `+` separators
    pub name: String,
    pub namespace: Option<String>,
    /// Fields declared directly on this schema
    pub fields: Vec<Field>,
    /// Extended schemas (interface bases), in declared order
    pub extends: Vec<Arc<RecordType>>,
    pub is_interface: bool,
    /// Closed generic type arguments, if any
    pub generic_args: Vec<Ty>,
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        // Nominal identity
        std::ptr::eq(self, other)
            || (self.name == other.name && self.namespace == other.namespace)
    }
}

impl RecordType {
    /// Create a plain record schema
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            namespace: None,
            fields,
            extends: Vec::new(),
            is_interface: false,
            generic_args: Vec::new(),
        })
    }

    /// Create an interface schema with extended bases
    pub fn interface(
        name: impl Into<String>,
        fields: Vec<Field>,
        extends: Vec<Arc<RecordType>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            namespace: None,
            fields,
            extends,
            is_interface: true,
            generic_args: Vec::new(),
        })
    }

    /// Create a record schema extending a base schema
    pub fn extending(
        name: impl Into<String>,
        fields: Vec<Field>,
        base: Arc<RecordType>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            namespace: None,
            fields,
            extends: vec![base],
            is_interface: false,
            generic_args: Vec::new(),
        })
    }

    /// Find a field declared directly on this schema
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All fields visible on this schema: own fields first, then inherited
    /// ones in declared base order, nearest declaration winning on a name
    /// collision.
    pub fn all_fields(&self) -> Vec<&Field> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out: Vec<&Field> = Vec::new();
        self.collect_fields(&mut seen, &mut out);
        out
    }

    fn collect_fields<'a>(&'a self, seen: &mut Vec<&'a str>, out: &mut Vec<&'a Field>) {
        for f in &self.fields {
            if !seen.contains(&f.name.as_str()) {
                seen.push(&f.name);
                out.push(f);
            }
        }
        for base in &self.extends {
            base.collect_fields(seen, out);
        }
    }

    /// Render the schema name in source-like form
    pub fn display_name(&self, qualify: bool) -> String {
        let mut name = self.name.clone();
        // Split off a CLR backtick arity marker: "Pair`2" -> "Pair"
        if let Some(pos) = name.find('`') {
            name.truncate(pos);
        }
        // Nested-type separators render as dots
        let mut name = name.replace('+', ".");
        if !self.generic_args.is_empty() {
            let args: Vec<String> = self
                .generic_args
                .iter()
                .map(|a| a.display_name(qualify))
                .collect();
            name = format!("{}<{}>", name, args.join(", "));
        }
        match (&self.namespace, qualify) {
            (Some(ns), true) => format!("{ns}.{name}"),
            _ => name,
        }
    }
}

/// A named enum type with an integral underlying representation
#[derive(Debug, PartialEq)]
pub struct EnumType {
    /// Fully qualified name; may contain nested-type `+` separators
    pub name: String,
    pub underlying: Ty,
}

impl EnumType {
    pub fn new(name: impl Into<String>, underlying: Ty) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            underlying,
        })
    }

    pub fn display_name(&self, _qualify: bool) -> String {
        self.name.replace('+', ".")
    }
}

/// Caller-supplied fallback resolver for type names outside the
/// well-known table
pub type TypeResolverFn = dyn Fn(&str) -> Option<Ty>;

/// Resolve a well-known type name (C# keyword or proper-case alias)
pub fn well_known_type(name: &str) -> Option<Ty> {
    Some(match name {
        "int" | "Int32" => Ty::I32,
        "long" | "Int64" => Ty::I64,
        "double" | "Double" => Ty::F64,
        "float" | "Single" => Ty::F32,
        "decimal" | "Decimal" => Ty::Decimal,
        "string" | "String" => Ty::Str,
        "bool" | "Boolean" => Ty::Bool,
        "char" | "Char" => Ty::Char,
        "DateTime" => Ty::DateTime,
        "DateTimeOffset" => Ty::DateTimeOffset,
        "DateOnly" => Ty::Date,
        "TimeOnly" => Ty::Time,
        "Guid" => Ty::Guid,
        _ => return None,
    })
}

/// Resolve a cast's target type name: well-known table first, then the
/// caller-supplied resolver. A nullable suffix wraps the result in
/// `Ty::Nullable` regardless of whether the base is a value type.
pub fn resolve_type_name(
    name: &str,
    nullable: bool,
    resolver: Option<&TypeResolverFn>,
) -> Result<Ty> {
    let base = well_known_type(name)
        .or_else(|| resolver.and_then(|r| r(name)))
        .ok_or_else(|| Error::UnsupportedCast(name.to_string()))?;
    if nullable {
        Ok(Ty::nullable_of(base))
    } else {
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_table() {
        assert_eq!(well_known_type("int"), Some(Ty::I32));
        assert_eq!(well_known_type("Int32"), Some(Ty::I32));
        assert_eq!(well_known_type("decimal"), Some(Ty::Decimal));
        assert_eq!(well_known_type("DateOnly"), Some(Ty::Date));
        assert_eq!(well_known_type("Widget"), None);
    }

    #[test]
    fn test_resolver_fallback() {
        let resolver = |name: &str| (name == "Money").then_some(Ty::Decimal);
        let ty = resolve_type_name("Money", false, Some(&resolver)).unwrap();
        assert_eq!(ty, Ty::Decimal);

        let err = resolve_type_name("Nope", false, Some(&resolver)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCast(name) if name == "Nope"));
    }

    #[test]
    fn test_nullable_suffix_wraps_unconditionally() {
        let ty = resolve_type_name("string", true, None).unwrap();
        assert_eq!(ty, Ty::nullable_of(Ty::Str));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Ty::I32.display_name(false), "int");
        assert_eq!(Ty::nullable_of(Ty::I32).display_name(false), "int?");
        assert_eq!(Ty::array_of(Ty::Str).display_name(false), "string[]");
        assert_eq!(
            Ty::array_of(Ty::nullable_of(Ty::I32)).display_name(false),
            "int?[]"
        );
    }

    #[test]
    fn test_generic_record_display() {
        let record = Arc::new(RecordType {
            name: "Pair`2".to_string(),
            namespace: Some("Data".to_string()),
            fields: vec![],
            extends: vec![],
            is_interface: false,
            generic_args: vec![Ty::I32, Ty::Str],
        });
        assert_eq!(record.display_name(false), "Pair<int, string>");
        assert_eq!(record.display_name(true), "Data.Pair<int, string>");
    }

    #[test]
    fn test_nested_type_name_normalized() {
        let record = RecordType::new("Outer+Inner", vec![]);
        assert_eq!(record.display_name(false), "Outer.Inner");
    }

    #[test]
    fn test_all_fields_nearest_wins() {
        let base = RecordType::new("Base", vec![Field::new("Id", Ty::I64)]);
        let derived = RecordType::extending(
            "Derived",
            vec![Field::new("Id", Ty::I32), Field::new("Name", Ty::Str)],
            base,
        );
        let fields = derived.all_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "Id");
        assert_eq!(fields[0].ty, Ty::I32);
    }

    #[test]
    fn test_value_type_predicate() {
        assert!(Ty::I32.is_value_type());
        assert!(Ty::Guid.is_value_type());
        assert!(!Ty::Str.is_value_type());
        assert!(!Ty::nullable_of(Ty::I32).is_value_type());
    }
}
