// tests/selector_properties.rs

use selector_lang::ast::{ExprType, IdentifierTypes};
use selector_lang::evaluator::Evaluator;
use selector_lang::parser::parse;
use selector_lang::typecheck::TypeChecker;
use selector_lang::{Program, Properties, Selector, SelectorError, Value};

fn three_valued(expr: &str, props: &Properties) -> Value {
    let tree = parse(expr).unwrap();
    let types = TypeChecker::new(&IdentifierTypes::new()).check(&tree).unwrap();
    Evaluator::new(&tree)
        .unwrap()
        .value_of(&tree, &types, props)
        .unwrap()
}

// ============================================================================
// Deterministic expression generator
// ============================================================================

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

const NUMBERS: &[&str] = &["n1", "n2", "n3"];
const STRINGS: &[&str] = &["s1", "s2"];
const BOOLS: &[&str] = &["b1", "b2"];
const WORDS: &[&str] = &["alpha", "beta", "gamma", "al", "a_b", "100%"];

fn gen_arith(rng: &mut Lcg, depth: u32) -> String {
    let choice = if depth == 0 { rng.below(3) } else { rng.below(6) };
    match choice {
        0 => rng.below(20).to_string(),
        1 => format!("{}.5", rng.below(10)),
        2 => rng.pick(NUMBERS).to_string(),
        3 => format!("-({})", gen_arith(rng, depth - 1)),
        _ => {
            let op = rng.pick(&["+", "-", "*", "/"]);
            format!("({} {} {})", gen_arith(rng, depth - 1), op, gen_arith(rng, depth - 1))
        }
    }
}

fn gen_bool(rng: &mut Lcg, depth: u32) -> String {
    let choice = if depth == 0 { rng.below(7) } else { rng.below(10) };
    match choice {
        0 => {
            let op = rng.pick(&["=", "<>", "<", "<=", ">", ">="]);
            format!("{} {} {}", gen_arith(rng, 1), op, gen_arith(rng, 1))
        }
        1 => {
            let op = rng.pick(&["BETWEEN", "NOT BETWEEN"]);
            format!(
                "{} {} {} AND {}",
                gen_arith(rng, 1),
                op,
                gen_arith(rng, 0),
                gen_arith(rng, 0)
            )
        }
        2 => {
            let op = rng.pick(&["LIKE", "NOT LIKE"]);
            let pattern = rng.pick(&["al%", "_eta", "%a%", "a!_b", "100!%"]);
            format!("{} {} '{}' ESCAPE '!'", rng.pick(STRINGS), op, pattern)
        }
        3 => {
            let op = rng.pick(&["IN", "NOT IN"]);
            format!("{} {} ('{}', '{}')", rng.pick(STRINGS), op, rng.pick(WORDS), rng.pick(WORDS))
        }
        4 => {
            let op = rng.pick(&["IS NULL", "IS NOT NULL"]);
            format!("{} {}", rng.pick(&["n1", "s1", "b1", "missing"]), op)
        }
        5 => format!("{} = {}", rng.pick(BOOLS), rng.pick(&["TRUE", "FALSE"])),
        6 => format!("{} = '{}'", rng.pick(STRINGS), rng.pick(WORDS)),
        7 => format!("NOT ({})", gen_bool(rng, depth - 1)),
        _ => {
            let op = rng.pick(&["AND", "OR"]);
            format!("({}) {} ({})", gen_bool(rng, depth - 1), op, gen_bool(rng, depth - 1))
        }
    }
}

fn gen_props(rng: &mut Lcg) -> Properties {
    let mut props = Properties::new();
    for name in NUMBERS {
        if rng.below(2) == 0 {
            props.insert(*name, rng.below(10) as i64);
        } else {
            props.insert(*name, rng.below(10) as f64 / 2.0);
        }
    }
    for name in STRINGS {
        props.insert(*name, rng.pick(WORDS));
    }
    for name in BOOLS {
        props.insert(*name, rng.below(2) == 0);
    }
    props
}

/// Properties that sometimes carry a value of the wrong type for the name.
fn gen_mistyped_props(rng: &mut Lcg) -> Properties {
    let mut props = gen_props(rng);
    let names = [NUMBERS, STRINGS, BOOLS].concat();
    for name in names {
        match rng.below(5) {
            0 => props.insert(name, rng.pick(WORDS)),
            1 => props.insert(name, rng.below(10) as i64),
            2 => props.insert(name, rng.below(2) == 0),
            _ => {}
        }
    }
    props
}

/// Hints that agree with how the generator uses each name.
fn corpus_hints() -> IdentifierTypes {
    let mut hints = IdentifierTypes::new();
    for name in NUMBERS {
        hints.insert(name.to_string(), ExprType::Arith);
    }
    for name in STRINGS {
        hints.insert(name.to_string(), ExprType::String);
    }
    for name in BOOLS {
        hints.insert(name.to_string(), ExprType::Bool);
    }
    hints
}

fn corpus(seed: u64, count: usize) -> Vec<String> {
    let mut rng = Lcg(seed);
    (0..count).map(|_| gen_bool(&mut rng, 3)).collect()
}

// ============================================================================
// Round-trip and idempotence
// ============================================================================

#[test]
fn test_reprint_reparses_to_same_shape() {
    for expr in corpus(7, 200) {
        let tree = parse(&expr).unwrap();
        let printed = tree.to_string();
        let reparsed = parse(&printed).unwrap();
        assert!(tree.same_shape(&reparsed), "{} -> {}", expr, printed);
        assert_eq!(reparsed.to_string(), printed);
    }
}

#[test]
fn test_type_checking_is_idempotent() {
    let hints: IdentifierTypes = IdentifierTypes::new();
    for expr in corpus(11, 100) {
        let tree = parse(&expr).unwrap();
        let first = TypeChecker::new(&hints).check(&tree).unwrap();
        let second = TypeChecker::new(&hints).check(&tree).unwrap();
        assert_eq!(first, second, "{}", expr);
    }
}

// ============================================================================
// Three-valued logic
// ============================================================================

fn bound(name: &str, value: Option<bool>) -> Properties {
    let mut props = Properties::new();
    if let Some(b) = value {
        props.insert(name, b);
    }
    props
}

fn truth(value: Option<bool>) -> Value {
    value.map(Value::Bool).unwrap_or(Value::Unknown)
}

const T: Option<bool> = Some(true);
const F: Option<bool> = Some(false);
const U: Option<bool> = None;

#[test]
fn test_and_truth_table() {
    let table = [
        (T, T, T),
        (T, F, F),
        (T, U, U),
        (F, T, F),
        (F, F, F),
        (F, U, F),
        (U, T, U),
        (U, F, F),
        (U, U, U),
    ];
    for (a, b, expected) in table {
        let mut props = bound("a", a);
        if let Some(b) = b {
            props.insert("b", b);
        }
        assert_eq!(three_valued("a AND b", &props), truth(expected), "{:?} AND {:?}", a, b);
    }
}

#[test]
fn test_or_truth_table() {
    let table = [
        (T, T, T),
        (T, F, T),
        (T, U, T),
        (F, T, T),
        (F, F, F),
        (F, U, U),
        (U, T, T),
        (U, F, U),
        (U, U, U),
    ];
    for (a, b, expected) in table {
        let mut props = bound("a", a);
        if let Some(b) = b {
            props.insert("b", b);
        }
        assert_eq!(three_valued("a OR b", &props), truth(expected), "{:?} OR {:?}", a, b);
    }
}

#[test]
fn test_not_truth_table() {
    for (a, expected) in [(T, F), (F, T), (U, U)] {
        assert_eq!(three_valued("NOT a", &bound("a", a)), truth(expected), "NOT {:?}", a);
    }
}

// ============================================================================
// Numeric promotion and LIKE
// ============================================================================

#[test]
fn test_numeric_promotion() {
    let none = Properties::new();
    assert!(Selector::new("1 = 1.0").unwrap().matches(&none).unwrap());
    assert!(!Selector::new("1 > 2.5").unwrap().matches(&none).unwrap());
    assert!(matches!(Selector::new("'a' = 1"), Err(SelectorError::Type(_))));
}

#[test]
fn test_like_translation() {
    let matches = |pattern: &str, subject: &str| {
        Selector::new(&format!("s LIKE {}", pattern))
            .unwrap()
            .matches(&Properties::new().with("s", subject))
            .unwrap()
    };
    assert!(matches("'foo%'", "foobar"));
    assert!(!matches("'foo%'", "barfoo"));
    assert!(matches("'a_c'", "abc"));
    assert!(!matches("'a_c'", "ac"));
    assert!(matches(r"'100\%' ESCAPE '\'", "100%"));
    assert!(!matches(r"'100\%' ESCAPE '\'", "1000"));
    assert!(!matches(r"'100\%' ESCAPE '\'", "100"));
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_end_to_end_scenario() {
    let selector =
        Selector::new("JMSType = 'order' AND (priority > 3 OR region IN ('EU','US'))").unwrap();

    let order = Properties::new()
        .with("JMSType", "order")
        .with("priority", 2)
        .with("region", "US");
    let alert = Properties::new()
        .with("JMSType", "alert")
        .with("priority", 2)
        .with("region", "US");

    assert!(selector.matches(&order).unwrap());
    assert!(!selector.matches(&alert).unwrap());
}

// ============================================================================
// Compiler / evaluator equivalence
// ============================================================================

#[test]
fn test_compiled_program_agrees_with_evaluator() {
    let mut rng = Lcg(2024);
    for expr in corpus(3, 300) {
        let selector = Selector::new(&expr).unwrap();
        let program = Program::parse(&selector.compile().unwrap()).unwrap();
        for _ in 0..5 {
            let props = gen_props(&mut rng);
            assert_eq!(
                program.evaluate(&props).unwrap(),
                selector.matches(&props).unwrap(),
                "{} with {:?}",
                expr,
                props
            );
        }
    }
}

#[test]
fn test_compiled_program_agrees_on_unknown() {
    for expr in corpus(5, 100) {
        let selector = Selector::new(&expr).unwrap();
        let program = Program::parse(&selector.compile().unwrap()).unwrap();
        let empty = Properties::new();
        assert_eq!(
            program.evaluate(&empty).unwrap(),
            selector.matches(&empty).unwrap(),
            "{}",
            expr
        );
    }
}

#[test]
fn test_compiled_program_agrees_under_hints() {
    let hints = corpus_hints();
    let mut rng = Lcg(4096);
    for expr in corpus(13, 300) {
        let selector = Selector::with_types(&expr, &hints).unwrap();
        let program = Program::parse(&selector.compile().unwrap()).unwrap();
        for _ in 0..5 {
            let props = gen_mistyped_props(&mut rng);
            assert_eq!(
                program.evaluate(&props).unwrap(),
                selector.matches(&props).unwrap(),
                "{} with {:?}",
                expr,
                props
            );
        }
    }
}

#[test]
fn test_mistyped_hinted_property_agrees() {
    let hints: IdentifierTypes = [("a".to_string(), ExprType::Arith)].into_iter().collect();
    let props = Properties::new().with("a", "x");
    for (expr, expected) in [
        ("a IS NULL", false),
        ("a IS NOT NULL", true),
        ("a = a", true),
        ("a > 1", false),
        ("NOT (a > 1)", false),
    ] {
        let selector = Selector::with_types(expr, &hints).unwrap();
        let program = Program::parse(&selector.compile().unwrap()).unwrap();
        assert_eq!(selector.matches(&props).unwrap(), expected, "{}", expr);
        assert_eq!(program.evaluate(&props).unwrap(), expected, "{}", expr);
    }
}
