//! Grammar corpus: representative expression shapes the parser must accept
//! or reject

use dynexpr_parser::{parse, SynExpr, SynExprKind};

fn assert_parses(source: &str) {
    let result = parse(source);
    assert!(
        result.is_ok(),
        "Failed to parse: {}\nError: {:?}",
        source,
        result.err()
    );
}

fn assert_rejects(source: &str) {
    assert!(parse(source).is_err(), "Expected failure: {source}");
}

fn body_kind_name(source: &str) -> &'static str {
    let expr = parse(source).unwrap_or_else(|e| panic!("Failed to parse {source}: {e:?}"));
    match &expr.kind {
        SynExprKind::Lambda { body, .. } => body.kind_name(),
        _ => panic!("expected lambda: {source}"),
    }
}

// =============================================================================
// Lambdas and parameters
// =============================================================================

#[test]
fn test_lambda_forms() {
    assert_parses("x => x");
    assert_parses("(x) => x");
    assert_parses("it => it.Name == null");
}

#[test]
fn test_lambda_nested_in_call() {
    assert_parses("items.Where(i => i.Active).Select(i => i.Name)");
}

// =============================================================================
// Operators
// =============================================================================

#[test]
fn test_comparison_operators() {
    for op in ["==", "!=", "<", "<=", ">", ">="] {
        assert_parses(&format!("x => x.A {op} 1"));
    }
}

#[test]
fn test_logical_and_arithmetic_operators() {
    for op in ["&&", "||", "+", "-", "*", "/", "%", "??"] {
        assert_parses(&format!("x => x.A {op} x.B"));
    }
}

#[test]
fn test_unary_operators() {
    assert_eq!(body_kind_name("x => !x.Flag"), "Unary");
    assert_eq!(body_kind_name("x => -x.A"), "Unary");
    assert_eq!(body_kind_name("x => +x.A"), "Unary");
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_numeric_literal_suffixes() {
    for lit in ["1", "10L", "1.5", "1.5f", "2.5d", "3.25m", "1e10", "1.5E-3"] {
        assert_parses(&format!("x => x.A == {lit}"));
    }
}

#[test]
fn test_string_literals_with_escapes() {
    assert_parses(r#"x => x.Name == "simple""#);
    assert_parses(r#"x => x.Name == "with \"quotes\"""#);
    assert_parses(r#"x => x.Name == "tab\there""#);
    assert_parses(r#"x => x.Name == "unicode é""#);
}

#[test]
fn test_char_bool_null_literals() {
    assert_parses("x => x.Initial == 'a'");
    assert_parses("x => x.Initial == '\\n'");
    assert_parses("x => x.Active == true");
    assert_parses("x => x.Active == false");
    assert_parses("x => x.Name == null");
}

// =============================================================================
// Member access, calls, element access
// =============================================================================

#[test]
fn test_member_chains() {
    assert_eq!(body_kind_name("x => x.A.B.C"), "MemberAccess");
    assert_eq!(body_kind_name("x => x.Address?.City"), "ConditionalAccess");
}

#[test]
fn test_invocations() {
    assert_eq!(body_kind_name("x => x.Name.Trim()"), "Invocation");
    assert_eq!(body_kind_name("x => DateTime.Parse(\"2024-01-01\")"), "Invocation");
    assert_eq!(body_kind_name("x => x.Name?.Trim()"), "Invocation");
}

#[test]
fn test_element_access() {
    assert_eq!(body_kind_name("x => x.Items[0]"), "ElementAccess");
    assert_parses("x => x.Grid[1, 2]");
}

// =============================================================================
// Casts vs parenthesized expressions
// =============================================================================

#[test]
fn test_cast_forms() {
    assert_eq!(body_kind_name("x => (int)x.A"), "Cast");
    assert_eq!(body_kind_name("x => (int?)x.A"), "Cast");
    assert_eq!(body_kind_name("x => (DateTime)x.When"), "Cast");
    assert_eq!(body_kind_name("x => (x.A)"), "Parenthesized");
}

// =============================================================================
// Object and array construction
// =============================================================================

#[test]
fn test_construction_forms() {
    assert_eq!(body_kind_name("x => new [] { 1, 2 }"), "ImplicitArrayCreation");
    assert_eq!(body_kind_name("x => new[] {}"), "ImplicitArrayCreation");
    assert_eq!(
        body_kind_name("x => new { x.Id, Name = x.Title }"),
        "AnonymousObjectCreation"
    );
    assert_eq!(body_kind_name("x => new Foo(1) { A = 2 }"), "ObjectCreation");
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_malformed_input_rejected() {
    assert_rejects("");
    assert_rejects("x =>");
    assert_rejects("x => x.A ==");
    assert_rejects("x => (x.A");
    assert_rejects("x => x.A 42");
    assert_rejects("x => \"unterminated");
    assert_rejects("x => new");
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn test_spans_cover_source() {
    let source = "x => x.A == 1";
    let expr: SynExpr = parse(source).unwrap();
    assert_eq!(expr.span.start, 0);
    assert_eq!(expr.span.end, source.len());
}
