//! Translation of `LIKE` patterns to regular expressions.
//!
//! The whole pattern is escaped literally, then `_` becomes "any one
//! character" and `%` "any sequence". A character preceded by the escape
//! character is always literal. The result is anchored at both ends.

use regex::Regex;

/// Builds the regex source for `pattern` with an optional escape character.
///
/// # Examples
///
/// ```
/// use selector_lang::like::to_regex_source;
///
/// assert_eq!(to_regex_source("foo%", None), "^(?s:foo.*)$");
/// assert_eq!(to_regex_source("a_c", None), "^(?s:a.c)$");
/// assert_eq!(to_regex_source(r"100\%", Some('\\')), r"^(?s:100%)$");
/// ```
pub fn to_regex_source(pattern: &str, escape: Option<char>) -> String {
    let mut body = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        if Some(ch) == escape {
            // A trailing escape character stands for itself.
            let literal = chars.next().unwrap_or(ch);
            body.push_str(&regex::escape(&literal.to_string()));
            continue;
        }
        match ch {
            '_' => body.push('.'),
            '%' => body.push_str(".*"),
            _ => body.push_str(&regex::escape(&ch.to_string())),
        }
    }

    format!("^(?s:{})$", body)
}

/// Compiles `pattern` into an anchored regex.
pub fn compile(pattern: &str, escape: Option<char>) -> Result<Regex, regex::Error> {
    Regex::new(&to_regex_source(pattern, escape))
}

/// Extracts the escape character from an `ESCAPE` string, which must be
/// exactly one character long.
pub fn escape_char(escape: &str) -> Option<char> {
    let mut chars = escape.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[test]
fn test_percent_and_underscore() {
    let re = compile("foo%", None).unwrap();
    assert!(re.is_match("foobar"));
    assert!(re.is_match("foo"));
    assert!(!re.is_match("barfoo"));

    let re = compile("a_c", None).unwrap();
    assert!(re.is_match("abc"));
    assert!(!re.is_match("ac"));
    assert!(!re.is_match("abbc"));
}

#[test]
fn test_regex_metacharacters_are_literal() {
    let re = compile("a.b*(c)", None).unwrap();
    assert!(re.is_match("a.b*(c)"));
    assert!(!re.is_match("axbbc"));
}

#[test]
fn test_escape_character() {
    let re = compile(r"100\%", Some('\\')).unwrap();
    assert!(re.is_match("100%"));
    assert!(!re.is_match("1000"));
    assert!(!re.is_match("100%x"));

    let re = compile("a!_b", Some('!')).unwrap();
    assert!(re.is_match("a_b"));
    assert!(!re.is_match("axb"));
}

#[test]
fn test_escape_char_must_be_single() {
    assert_eq!(escape_char("\\"), Some('\\'));
    assert_eq!(escape_char(""), None);
    assert_eq!(escape_char("ab"), None);
}
