//! End-to-end tests: text to typed tree to evaluation over rows

use std::sync::Arc;

use dynexpr::{
    parse_lambda, parse_lambda_typed, parse_predicate, ArrayValue, Error, Field, RecordType,
    RecordValue, Ty, Value,
};
use pretty_assertions::assert_eq;

fn employee_schema() -> Arc<RecordType> {
    let manager = RecordType::new("Manager", vec![Field::new("Name", Ty::Str)]);
    RecordType::new(
        "Employee",
        vec![
            Field::new("Id", Ty::I32),
            Field::new("Name", Ty::Str),
            Field::new("Salary", Ty::F64),
            Field::new("Active", Ty::Bool),
            Field::new("HireDate", Ty::DateTime),
            Field::new("Tags", Ty::array_of(Ty::Str)),
            Field::new("Manager", Ty::Record(manager)),
        ],
    )
}

fn element() -> Ty {
    Ty::Record(employee_schema())
}

struct RowSpec<'a> {
    id: i32,
    name: Option<&'a str>,
    salary: f64,
    active: bool,
    hired: &'a str,
    tags: &'a [&'a str],
}

fn row(spec: RowSpec<'_>) -> Value {
    let schema = employee_schema();
    let manager_ty = match &schema.field("Manager").unwrap().ty {
        Ty::Record(r) => Arc::clone(r),
        _ => unreachable!(),
    };
    let mut rec = RecordValue::new(schema);
    rec.set_field("Id", Value::I32(spec.id)).unwrap();
    if let Some(name) = spec.name {
        rec.set_field("Name", Value::from(name)).unwrap();
    }
    rec.set_field("Salary", Value::F64(spec.salary)).unwrap();
    rec.set_field("Active", Value::Bool(spec.active)).unwrap();
    let hired = dynexpr::methods::parse_date_time(spec.hired).unwrap();
    rec.set_field("HireDate", Value::DateTime(hired)).unwrap();
    rec.set_field(
        "Tags",
        Value::Array(ArrayValue::new(
            Ty::Str,
            spec.tags.iter().map(|t| Value::from(*t)).collect(),
        )),
    )
    .unwrap();
    let mut manager = RecordValue::new(manager_ty);
    manager.set_field("Name", Value::from("Root")).unwrap();
    rec.set_field("Manager", Value::Record(manager)).unwrap();
    Value::Record(rec)
}

fn alice() -> Value {
    row(RowSpec {
        id: 1,
        name: Some("Alice"),
        salary: 90000.0,
        active: true,
        hired: "2019-04-01",
        tags: &["senior", "rust"],
    })
}

fn bob() -> Value {
    row(RowSpec {
        id: 2,
        name: Some("Bob"),
        salary: 55000.0,
        active: false,
        hired: "2023-09-15",
        tags: &["junior"],
    })
}

fn anonymous() -> Value {
    row(RowSpec {
        id: 3,
        name: None,
        salary: 40000.0,
        active: true,
        hired: "2024-01-01",
        tags: &[],
    })
}

#[test]
fn comparison_and_logical_operators() {
    let p = parse_predicate(&element(), "e => e.Salary >= 60000 && e.Active", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&bob()).unwrap());

    let p = parse_predicate(&element(), "e => e.Id == 2 || e.Salary < 50000", None).unwrap();
    assert!(p.test(&bob()).unwrap());
    assert!(p.test(&anonymous()).unwrap());
    assert!(!p.test(&alice()).unwrap());
}

#[test]
fn null_comparisons() {
    let p = parse_predicate(&element(), "e => e.Name == null", None).unwrap();
    assert!(p.test(&anonymous()).unwrap());
    assert!(!p.test(&alice()).unwrap());

    let p = parse_predicate(&element(), "e => e.Name != null", None).unwrap();
    assert!(p.test(&alice()).unwrap());
}

#[test]
fn nested_member_path() {
    let p = parse_predicate(&element(), "e => e.Manager.Name == \"Root\"", None).unwrap();
    assert!(p.test(&alice()).unwrap());
}

#[test]
fn string_methods() {
    let p = parse_predicate(&element(), "e => e.Name.StartsWith(\"Al\")", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&bob()).unwrap());

    let p = parse_predicate(
        &element(),
        "e => e.Name.ToLower().Contains(\"ob\")",
        None,
    )
    .unwrap();
    assert!(p.test(&bob()).unwrap());
}

#[test]
fn null_conditional_access() {
    // Guards against the null Name row instead of failing
    let p = parse_predicate(&element(), "e => e.Name?.Length > 3", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&anonymous()).unwrap());
}

#[test]
fn date_comparison() {
    let p = parse_predicate(
        &element(),
        "e => e.HireDate < DateTime.Parse(\"2020-01-01\")",
        None,
    )
    .unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&bob()).unwrap());
}

#[test]
fn sequence_operators_over_member_arrays() {
    let p = parse_predicate(&element(), "e => e.Tags.Any(t => t == \"rust\")", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&bob()).unwrap());

    let p = parse_predicate(&element(), "e => e.Tags.Count() > 1", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&bob()).unwrap());

    let p = parse_predicate(&element(), "e => e.Tags.All(t => t.Length > 3)", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(p.test(&anonymous()).unwrap());
}

#[test]
fn array_literal_contains() {
    let p = parse_predicate(&element(), "e => new[] { 1, 2 }.Contains(e.Id)", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&anonymous()).unwrap());
}

#[test]
fn ternary_expression() {
    let l = parse_lambda(
        &element(),
        "e => e.Active ? e.Name : \"inactive\"",
        None,
    )
    .unwrap();
    assert_eq!(l.invoke(&alice()).unwrap(), Value::from("Alice"));
    assert_eq!(l.invoke(&bob()).unwrap(), Value::from("inactive"));
}

#[test]
fn anonymous_projection_builds_record() {
    let l = parse_lambda(
        &element(),
        "e => new { e.Id, Label = e.Name }",
        None,
    )
    .unwrap();
    match l.invoke(&alice()).unwrap() {
        Value::Record(rec) => {
            assert_eq!(rec.get_field("Id").unwrap(), &Value::I32(1));
            assert_eq!(rec.get_field("Label").unwrap(), &Value::from("Alice"));
        }
        other => panic!("expected record, got {other:?}"),
    }
}

#[test]
fn cast_changes_static_type() {
    let l = parse_lambda(&element(), "e => (long)e.Id", None).unwrap();
    assert_eq!(l.return_type(), Ty::I64);
    assert_eq!(l.invoke(&alice()).unwrap(), Value::I64(1));
}

#[test]
fn nullable_cast_passes_null() {
    let l = parse_lambda(&element(), "e => (int?)e.Id", None).unwrap();
    assert_eq!(l.return_type(), Ty::nullable_of(Ty::I32));
    assert_eq!(l.invoke(&alice()).unwrap(), Value::I32(1));
}

#[test]
fn custom_type_resolver() {
    let resolver = |name: &str| (name == "EmployeeId").then_some(Ty::I64);
    let l = parse_lambda(&element(), "e => (EmployeeId)e.Id", Some(&resolver)).unwrap();
    assert_eq!(l.return_type(), Ty::I64);
}

#[test]
fn typed_lambda_conversion() {
    let l = parse_lambda_typed(&element(), "e => e.Id", &Ty::F64, None).unwrap();
    assert_eq!(l.invoke(&alice()).unwrap(), Value::F64(1.0));
}

#[test]
fn error_cases() {
    let e = element();
    assert!(matches!(
        parse_predicate(&e, "e => e.Missing == 1", None).unwrap_err(),
        Error::MemberResolution { .. }
    ));
    assert!(matches!(
        parse_predicate(&e, "e => other.Id == 1", None).unwrap_err(),
        Error::UnsupportedIdentifier(_)
    ));
    assert!(matches!(
        parse_predicate(&e, "e => e.Id % 2 == 0", None).unwrap_err(),
        Error::UnsupportedOperator(_)
    ));
    assert!(matches!(
        parse_predicate(&e, "e => (Widget)e.Id == null", None).unwrap_err(),
        Error::UnsupportedCast(_)
    ));
    assert!(matches!(
        parse_predicate(&e, "e => e.Name.Reverse() == null", None).unwrap_err(),
        Error::UnsupportedMethod(_)
    ));
    assert!(matches!(
        parse_predicate(&e, "e => e.Id?.ToString() == \"1\"", None).unwrap_err(),
        Error::UnsupportedConditionalAccess(_)
    ));
    assert!(matches!(
        parse_predicate(&e, "e => e.Id ==", None).unwrap_err(),
        Error::Grammar(_)
    ));
}

#[test]
fn guid_static_members() {
    let schema = RecordType::new("Doc", vec![Field::new("Key", Ty::Guid)]);
    let element = Ty::Record(Arc::clone(&schema));
    let p = parse_predicate(&element, "d => d.Key == Guid.Empty", None).unwrap();
    let rec = RecordValue::new(schema);
    assert!(p.test(&Value::Record(rec)).unwrap());
}

#[test]
fn string_indexer() {
    let p = parse_predicate(&element(), "e => e.Name[0] == 'A'", None).unwrap();
    assert!(p.test(&alice()).unwrap());
    assert!(!p.test(&bob()).unwrap());
}
