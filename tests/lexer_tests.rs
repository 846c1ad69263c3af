// tests/lexer_tests.rs

use selector_lang::ast::{TokenKind, TokenValue};
use selector_lang::lexer::{tokenize, Lexer};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).unwrap().iter().map(|t| t.kind).collect()
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_operator_tokens() {
    let test_cases = vec![
        ("=", TokenKind::Eq),
        ("<>", TokenKind::Ne),
        ("<", TokenKind::Lt),
        ("<=", TokenKind::Le),
        (">", TokenKind::Gt),
        (">=", TokenKind::Ge),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Mul),
        ("/", TokenKind::Div),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        (",", TokenKind::Comma),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "input: {}", input);
    }
}

#[test]
fn test_multi_char_operators_win() {
    assert_eq!(kinds("a<>b"), vec![TokenKind::Ident, TokenKind::Ne, TokenKind::Ident]);
    assert_eq!(kinds("a<=b"), vec![TokenKind::Ident, TokenKind::Le, TokenKind::Ident]);
    assert_eq!(kinds("a>=b"), vec![TokenKind::Ident, TokenKind::Ge, TokenKind::Ident]);
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn test_two_word_keywords() {
    assert_eq!(kinds("x NOT BETWEEN 1 AND 2")[1], TokenKind::NotBetween);
    assert_eq!(kinds("x not in ('a')")[1], TokenKind::NotIn);
    assert_eq!(kinds("x Not Like 'a'")[1], TokenKind::NotLike);
    assert_eq!(kinds("x IS NOT NULL")[1], TokenKind::IsNotNull);
    assert_eq!(kinds("x is null")[1], TokenKind::IsNull);
}

#[test]
fn test_two_word_keywords_allow_any_whitespace() {
    let tokens = tokenize("x NOT \t\n LIKE 'a'").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::NotLike);
    assert_eq!(tokens[1].text, "NOT \t\n LIKE");
}

#[test]
fn test_not_followed_by_other_word() {
    assert_eq!(
        kinds("NOT x = 1"),
        vec![TokenKind::Not, TokenKind::Ident, TokenKind::Eq, TokenKind::Int]
    );
}

#[test]
fn test_keyword_needs_word_boundary() {
    assert_eq!(kinds("INTEREST"), vec![TokenKind::Ident]);
    assert_eq!(kinds("Likely"), vec![TokenKind::Ident]);
    assert_eq!(kinds("true_value"), vec![TokenKind::Ident]);
    assert_eq!(kinds("AND.x"), vec![TokenKind::Ident]);
    assert_eq!(kinds("NULLABLE IS NULL"), vec![TokenKind::Ident, TokenKind::IsNull]);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_string_literal() {
    let tokens = tokenize("'it''s'").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "'it''s'");
    assert_eq!(tokens[0].value(), Some(TokenValue::Str("it's".to_string())));
}

#[test]
fn test_empty_string_literal() {
    let tokens = tokenize("''").unwrap();
    assert_eq!(tokens[0].value(), Some(TokenValue::Str(String::new())));
}

#[test]
fn test_numbers() {
    let tokens = tokenize("42 0x1F 3.5 .5 1e3 2.5f 7D").unwrap();
    let values: Vec<_> = tokens.iter().map(|t| t.value()).collect();
    assert_eq!(
        values,
        vec![
            Some(TokenValue::Int(42)),
            Some(TokenValue::Hex(31)),
            Some(TokenValue::Float(3.5)),
            Some(TokenValue::Float(0.5)),
            Some(TokenValue::Float(1000.0)),
            Some(TokenValue::Float(2.5)),
            Some(TokenValue::Float(7.0)),
        ]
    );
}

#[test]
fn test_integer_overflow_stops_tokenizing() {
    let run = Lexer::new("a = 99999999999999999999").tokenize();
    assert_eq!(run.tokens.len(), 2);
    assert_eq!(run.residue, "99999999999999999999");
    assert_eq!(run.residue_offset, 4);
    assert!(tokenize("a = 99999999999999999999").is_err());
}

#[test]
fn test_minimum_integer_is_not_a_literal() {
    // The sign is its own token, so the literal is 2^63 and overflows i64.
    let run = Lexer::new("a = -9223372036854775808").tokenize();
    assert_eq!(run.tokens.len(), 3);
    assert_eq!(run.residue, "9223372036854775808");
    assert!(tokenize("a = -9223372036854775807").is_ok());
}

#[test]
fn test_large_hex_fits_unsigned() {
    let tokens = tokenize("0xFFFFFFFFFFFFFFFF").unwrap();
    assert_eq!(tokens[0].value(), Some(TokenValue::Hex(u64::MAX)));
    assert!(tokenize("0x1FFFFFFFFFFFFFFFF").is_err());
}

#[test]
fn test_identifiers() {
    let tokens = tokenize("JMSType $size a.b.c _x1").unwrap();
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["JMSType", "$size", "a.b.c", "_x1"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Ident));
}

// ============================================================================
// Offsets and residue
// ============================================================================

#[test]
fn test_offsets_are_char_positions() {
    let tokens = tokenize("'é' = b").unwrap();
    assert_eq!(tokens[0].offset, 0);
    assert_eq!(tokens[1].offset, 4);
    assert_eq!(tokens[2].offset, 6);
}

#[test]
fn test_unterminated_string_is_residue() {
    let err = tokenize("a = 'open").unwrap_err();
    assert_eq!(err.offset, 4);
    assert_eq!(err.residue, "'open");
}

#[test]
fn test_whitespace_only() {
    let run = Lexer::new("  \t ").tokenize();
    assert!(run.tokens.is_empty());
    assert!(run.is_complete());
}
