// tests/evaluator_tests.rs

use selector_lang::ast::IdentifierTypes;
use selector_lang::evaluator::Evaluator;
use selector_lang::parser::parse;
use selector_lang::typecheck::TypeChecker;
use selector_lang::{ExprType, Properties, Value};

fn value_of(expr: &str, props: &Properties) -> Value {
    value_with(expr, props, &IdentifierTypes::new())
}

fn value_with(expr: &str, props: &Properties, hints: &IdentifierTypes) -> Value {
    let tree = parse(expr).unwrap();
    let types = TypeChecker::new(hints).check(&tree).unwrap();
    Evaluator::new(&tree)
        .unwrap()
        .value_of(&tree, &types, props)
        .unwrap()
}

fn eval(expr: &str, props: &Properties) -> bool {
    value_of(expr, props).is_true()
}

fn none() -> Properties {
    Properties::new()
}

// ============================================================================
// Literals and properties
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(value_of("TRUE", &none()), Value::Bool(true));
    assert_eq!(value_of("'x'", &none()), Value::string("x"));
    assert_eq!(value_of("42", &none()), Value::int(42));
    assert_eq!(value_of("2.5", &none()), Value::float(2.5));
    assert_eq!(value_of("0x10", &none()), Value::int(16));
    assert_eq!(value_of("0xFFFFFFFFFFFFFFFF", &none()), Value::float(u64::MAX as f64));
}

#[test]
fn test_missing_property_is_unknown() {
    assert_eq!(value_of("a", &none()), Value::Unknown);
    assert_eq!(value_of("a = 1", &none()), Value::Unknown);
    assert!(!eval("a = 1", &none()));
    assert!(!eval("a <> 1", &none()));
}

#[test]
fn test_property_lookup() {
    let props = none().with("color", "blue").with("weight", 3000);
    assert!(eval("color = 'blue'", &props));
    assert!(eval("weight > 2500", &props));
    assert!(!eval("weight < 2500", &props));
}

// ============================================================================
// Comparison and arithmetic
// ============================================================================

#[test]
fn test_numeric_promotion() {
    assert!(eval("1 = 1.0", &none()));
    assert!(!eval("1 > 2.5", &none()));
    assert!(eval("3 >= 2.5", &none()));
    assert_eq!(value_of("1 + 0.5", &none()), Value::float(1.5));
    assert_eq!(value_of("7 / 2", &none()), Value::int(3));
}

#[test]
fn test_mismatched_property_types_are_unknown() {
    let props = none().with("a", "text");
    assert_eq!(value_of("a = 1", &props), Value::Unknown);
    assert_eq!(value_of("a > 1", &props), Value::Unknown);
    assert_eq!(value_of("a + 1 = 2", &props), Value::Unknown);
}

#[test]
fn test_integer_edge_cases_are_unknown() {
    let props = none().with("big", i64::MAX).with("zero", 0);
    assert_eq!(value_of("big + 1 > 0", &props), Value::Unknown);
    assert_eq!(value_of("1 / zero = 0", &props), Value::Unknown);
    assert_eq!(value_of("1.0 / zero > 0", &props), Value::Bool(true));
}

#[test]
fn test_minimum_integer_by_subtraction() {
    assert_eq!(value_of("-9223372036854775807 - 1", &none()), Value::int(i64::MIN));
    assert!(eval("a = -9223372036854775807 - 1", &none().with("a", i64::MIN)));
    assert_eq!(value_of("-(-9223372036854775807 - 1)", &none()), Value::Unknown);
}

#[test]
fn test_unary_operators() {
    let props = none().with("n", 5);
    assert!(eval("-n = -5", &props));
    assert!(eval("+n = 5", &props));
    assert_eq!(value_of("-s = 1", &none().with("s", "x")), Value::Unknown);
}

#[test]
fn test_string_and_bool_equality() {
    let props = none().with("flag", true).with("name", "x");
    assert!(eval("flag = TRUE", &props));
    assert!(eval("name <> 'y'", &props));
    assert!(eval("flag", &props));
}

// ============================================================================
// Special forms
// ============================================================================

#[test]
fn test_between() {
    let props = none().with("n", 5);
    assert!(eval("n BETWEEN 1 AND 10", &props));
    assert!(eval("n BETWEEN 5 AND 5", &props));
    assert!(!eval("n BETWEEN 6 AND 10", &props));
    assert!(eval("n NOT BETWEEN 6 AND 10", &props));
    assert_eq!(value_of("m BETWEEN 1 AND 10", &props), Value::Unknown);
    assert_eq!(value_of("m NOT BETWEEN 1 AND 10", &props), Value::Unknown);
}

#[test]
fn test_between_short_circuits_false_bound() {
    // 6 <= n is false, so the unknown upper bound does not matter.
    let props = none().with("n", 5);
    assert_eq!(value_of("n BETWEEN 6 AND m", &props), Value::Bool(false));
}

#[test]
fn test_in() {
    let props = none().with("region", "EU");
    assert!(eval("region IN ('EU', 'US')", &props));
    assert!(!eval("region IN ('APAC')", &props));
    assert!(eval("region NOT IN ('APAC')", &props));
    assert_eq!(value_of("other IN ('EU')", &props), Value::Unknown);
    assert_eq!(value_of("other NOT IN ('EU')", &props), Value::Unknown);
}

#[test]
fn test_in_with_numeric_property_is_unknown() {
    let props = none().with("n", 1);
    assert_eq!(value_of("n IN ('1')", &props), Value::Unknown);
}

#[test]
fn test_like() {
    let props = none().with("s", "foobar");
    assert!(eval("s LIKE 'foo%'", &props));
    assert!(!eval("s LIKE 'bar%'", &props));
    assert!(eval("s NOT LIKE 'bar%'", &props));
    assert!(eval("s LIKE 'fo_bar'", &props));
    assert_eq!(value_of("t LIKE 'x'", &props), Value::Unknown);
}

#[test]
fn test_like_with_escape() {
    assert!(eval(r"s LIKE '100\%' ESCAPE '\'", &none().with("s", "100%")));
    assert!(!eval(r"s LIKE '100\%' ESCAPE '\'", &none().with("s", "1000")));
}

#[test]
fn test_like_with_bad_escape_is_unknown() {
    // The checker types this Invalid; evaluation without rejecting it stays unknown.
    assert_eq!(value_of("s LIKE 'x' ESCAPE 'ab'", &none().with("s", "x")), Value::Unknown);
}

#[test]
fn test_is_null() {
    let props = none().with("a", 1);
    assert!(eval("b IS NULL", &props));
    assert!(!eval("a IS NULL", &props));
    assert!(eval("a IS NOT NULL", &props));
    assert!(!eval("b IS NOT NULL", &props));
}

// ============================================================================
// Logic
// ============================================================================

#[test]
fn test_and_or_short_circuit_with_unknown() {
    let props = none().with("t", true).with("f", false);
    assert_eq!(value_of("f AND u", &props), Value::Bool(false));
    assert_eq!(value_of("u AND f", &props), Value::Bool(false));
    assert_eq!(value_of("t OR u", &props), Value::Bool(true));
    assert_eq!(value_of("u OR t", &props), Value::Bool(true));
    assert_eq!(value_of("t AND u", &props), Value::Unknown);
    assert_eq!(value_of("f OR u", &props), Value::Unknown);
    assert_eq!(value_of("NOT u = 1", &props), Value::Unknown);
}

// ============================================================================
// Type hints
// ============================================================================

#[test]
fn test_hint_does_not_change_runtime_value() {
    let hints: IdentifierTypes = [("a".to_string(), ExprType::Arith)].into_iter().collect();
    let props = none().with("a", "not a number");
    assert_eq!(value_with("a IS NULL", &props, &hints), Value::Bool(false));
    assert_eq!(value_with("a IS NOT NULL", &props, &hints), Value::Bool(true));
    assert_eq!(value_with("a = a", &props, &hints), Value::Bool(true));
    assert_eq!(value_with("a > 1", &props, &hints), Value::Unknown);
    assert_eq!(value_with("a + 1 = 2", &props, &hints), Value::Unknown);
}

#[test]
fn test_evaluator_is_reusable() {
    let tree = parse("n > 1").unwrap();
    let types = TypeChecker::new(&IdentifierTypes::new()).check(&tree).unwrap();
    let evaluator = Evaluator::new(&tree).unwrap();
    for (n, expected) in [(0, false), (2, true), (5, true)] {
        let props = none().with("n", n);
        assert_eq!(evaluator.evaluate(&tree, &types, &props).unwrap(), expected);
    }
}
