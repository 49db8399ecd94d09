//! Serialization tests: parsed trees render back to canonical text

use std::sync::Arc;

use dynexpr::{parse_lambda, serialize, Field, RecordType, Ty};
use pretty_assertions::assert_eq;

fn schema() -> Arc<RecordType> {
    RecordType::new(
        "Order",
        vec![
            Field::new("Id", Ty::I32),
            Field::new("Total", Ty::F64),
            Field::new("Customer", Ty::Str),
            Field::new("Placed", Ty::DateTime),
            Field::new("Lines", Ty::array_of(Ty::Str)),
        ],
    )
}

fn element() -> Ty {
    Ty::Record(schema())
}

fn rendered(text: &str) -> String {
    let lambda = parse_lambda(&element(), text, None).unwrap();
    serialize(lambda.expr()).unwrap()
}

#[test]
fn binary_nodes_are_parenthesized() {
    assert_eq!(rendered("o => o.Id == 1"), "o => (o.Id == 1)");
    assert_eq!(
        rendered("o => o.Id == 1 && o.Customer != null"),
        "o => ((o.Id == 1) && (o.Customer != null))"
    );
}

#[test]
fn implicit_conversions_are_invisible() {
    // The int literal converts to double during binding; the rendered
    // text shows the original literal, not a cast
    assert_eq!(rendered("o => o.Total > 100"), "o => (o.Total > 100)");
}

#[test]
fn string_constants_are_escaped() {
    assert_eq!(
        rendered("o => o.Customer == \"say \\\"hi\\\"\""),
        "o => (o.Customer == \"say \\\"hi\\\"\")"
    );
}

#[test]
fn method_calls_render_on_receiver() {
    assert_eq!(
        rendered("o => o.Customer.Contains(\"ac\")"),
        "o => o.Customer.Contains(\"ac\")"
    );
    assert_eq!(
        rendered("o => o.Lines.Any(l => l.StartsWith(\"x\"))"),
        "o => o.Lines.Any(l => l.StartsWith(\"x\"))"
    );
}

#[test]
fn static_calls_render_with_declaring_type() {
    assert_eq!(
        rendered("o => o.Placed > DateTime.Parse(\"2024-01-01\")"),
        "o => (o.Placed > DateTime.Parse(\"2024-01-01\"))"
    );
}

#[test]
fn ternary_renders_parenthesized() {
    assert_eq!(
        rendered("o => o.Id == 1 ? \"one\" : \"other\""),
        "o => ((o.Id == 1) ? \"one\" : \"other\")"
    );
}

#[test]
fn unary_not() {
    assert_eq!(
        rendered("o => !(o.Id == 1)"),
        "o => (!((o.Id == 1)))"
    );
}

#[test]
fn array_literal() {
    assert_eq!(
        rendered("o => new[] { 1, 2, 3 }.Contains(o.Id)"),
        "o => (new [] {1, 2, 3}).Contains(o.Id)"
    );
}

#[test]
fn indexer_renders_with_brackets() {
    assert_eq!(
        rendered("o => o.Lines[0] == \"first\""),
        "o => (o.Lines[0] == \"first\")"
    );
}

#[test]
fn null_conditional_renders_as_lowered_form() {
    // `?.` has no direct node; the lowered conditional is what prints
    assert_eq!(
        rendered("o => o.Customer?.Length == null"),
        "o => (((o.Customer != null) ? o.Customer.Length : null) == null)"
    );
}
