use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    ast::{Token, TokenKind},
    error::LexError,
};

/// What a pattern produces when it matches.
#[derive(Debug, Clone, Copy)]
enum Produces {
    Whitespace,
    Token(TokenKind),
}

struct TokenPattern {
    produces: Produces,
    regex: Regex,
    /// Must not be followed by an identifier-body character
    keyword: bool,
}

const EXPONENT: &str = r"[eE][+-]?[0-9]+";
const SUFFIX: &str = r"[fFdD]";

/// Patterns in match order. The first one that matches at the current
/// position wins, so two-word keywords precede `NOT`, multi-char operators
/// precede their one-char prefixes, and hex and float precede integer.
static PATTERNS: LazyLock<Vec<TokenPattern>> = LazyLock::new(|| {
    use TokenKind::*;

    let keyword = |kind: TokenKind, words: &str| {
        let body = words.split(' ').collect::<Vec<_>>().join(r"\s+");
        (Produces::Token(kind), format!("(?i){}", body), true)
    };
    let symbol = |kind: TokenKind, re: &str| (Produces::Token(kind), re.to_string(), false);

    let table = vec![
        (Produces::Whitespace, r"\s+".to_string(), false),
        keyword(NotBetween, "NOT BETWEEN"),
        keyword(NotIn, "NOT IN"),
        keyword(NotLike, "NOT LIKE"),
        keyword(IsNotNull, "IS NOT NULL"),
        keyword(IsNull, "IS NULL"),
        keyword(Between, "BETWEEN"),
        keyword(In, "IN"),
        keyword(Like, "LIKE"),
        keyword(Escape, "ESCAPE"),
        keyword(Not, "NOT"),
        keyword(And, "AND"),
        keyword(Or, "OR"),
        keyword(True, "TRUE"),
        keyword(False, "FALSE"),
        symbol(Ne, "<>"),
        symbol(Le, "<="),
        symbol(Ge, ">="),
        symbol(Eq, "="),
        symbol(Lt, "<"),
        symbol(Gt, ">"),
        symbol(Plus, r"\+"),
        symbol(Minus, "-"),
        symbol(Mul, r"\*"),
        symbol(Div, "/"),
        symbol(LParen, r"\("),
        symbol(RParen, r"\)"),
        symbol(Comma, ","),
        symbol(String, "'(?:[^']|'')*'"),
        symbol(Hex, "0[xX][0-9a-fA-F]+"),
        (
            Produces::Token(Float),
            format!(
                "[0-9]+\\.[0-9]*(?:{e})?{s}?|\\.[0-9]+(?:{e})?{s}?|[0-9]+{e}{s}?|[0-9]+{s}",
                e = EXPONENT,
                s = SUFFIX
            ),
            false,
        ),
        symbol(Int, "[0-9]+"),
        symbol(Ident, r"[A-Za-z_$][A-Za-z0-9_$.]*"),
    ];

    table
        .into_iter()
        .map(|(produces, re, keyword)| {
            // Anchor every alternative at the scan position.
            let regex = Regex::new(&format!("^(?:{})", re))
                .unwrap_or_else(|err| panic!("token pattern `{}` does not compile: {}", re, err));
            TokenPattern {
                produces,
                regex,
                keyword,
            }
        })
        .collect()
});

fn is_ident_body(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '$' | '.')
}

/// Output of one tokenizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    /// Unconsumed remainder; empty when the whole input was tokenized
    pub residue: String,
    /// Char offset where the residue starts
    pub residue_offset: usize,
}

impl Tokenized {
    pub fn is_complete(&self) -> bool {
        self.residue.is_empty()
    }

    /// Converts an incomplete run into a [`LexError`].
    pub fn into_result(self) -> Result<Vec<Token>, LexError> {
        if self.is_complete() {
            Ok(self.tokens)
        } else {
            Err(LexError {
                offset: self.residue_offset,
                residue: self.residue,
            })
        }
    }
}

/// Ordered-pattern tokenizer.
///
/// Stateless: each call to [`Lexer::tokenize`] scans its input from the start.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input }
    }

    /// Scans the input until it ends or no pattern matches.
    pub fn tokenize(&self) -> Tokenized {
        let mut tokens = Vec::new();
        let mut byte = 0;
        let mut offset = 0;

        while byte < self.input.len() {
            let rest = &self.input[byte..];
            let Some((produces, len)) = Self::match_at(rest) else {
                break;
            };
            let text = &rest[..len];

            if let Produces::Token(kind) = produces {
                let token = Token::new(kind, text, offset);
                let numeric = matches!(kind, TokenKind::Int | TokenKind::Float | TokenKind::Hex);
                if numeric && token.value().is_none() {
                    // A number too large for its representation.
                    break;
                }
                tokens.push(token);
            }

            byte += len;
            offset += text.chars().count();
        }

        let residue = self.input[byte..].to_string();
        if !residue.is_empty() {
            debug!(offset, residue = %residue, "tokenizer stopped before end of input");
        }

        Tokenized {
            tokens,
            residue,
            residue_offset: offset,
        }
    }

    fn match_at(rest: &str) -> Option<(Produces, usize)> {
        PATTERNS.iter().find_map(|pattern| {
            let found = pattern.regex.find(rest)?;
            let len = found.end();
            if len == 0 {
                return None;
            }
            if pattern.keyword && rest[len..].chars().next().is_some_and(is_ident_body) {
                return None;
            }
            Some((pattern.produces, len))
        })
    }
}

/// Tokenizes `input`, failing if anything is left over.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize().into_result()
}

#[test]
fn test_keywords() {
    let tokens = tokenize("and OR Not true FALSE").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::True,
            TokenKind::False
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let tokens = tokenize("ORDER android").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].text, "ORDER");
    assert_eq!(tokens[1].kind, TokenKind::Ident);
}

#[test]
fn test_residue() {
    let run = Lexer::new("a = 1 # b").tokenize();
    assert_eq!(run.tokens.len(), 3);
    assert_eq!(run.residue, "# b");
    assert_eq!(run.residue_offset, 6);
}

#[test]
fn test_every_token_pattern_compiles() {
    assert_eq!(PATTERNS.len(), 33);
    let produced: Vec<_> = PATTERNS
        .iter()
        .filter_map(|p| match p.produces {
            Produces::Token(kind) => Some(kind),
            Produces::Whitespace => None,
        })
        .collect();
    assert_eq!(produced.len(), 32);
    assert!(produced.contains(&TokenKind::Ident));
    assert!(produced.contains(&TokenKind::IsNotNull));
}
