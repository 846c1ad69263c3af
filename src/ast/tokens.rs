use std::fmt;

/// Kinds of lexical tokens produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Two-word keywords
    /// `NOT BETWEEN`
    NotBetween,
    /// `NOT IN`
    NotIn,
    /// `NOT LIKE`
    NotLike,
    /// `IS NOT NULL`
    IsNotNull,
    /// `IS NULL`
    IsNull,

    // Keywords
    Between,
    In,
    Like,
    Escape,
    Not,
    And,
    Or,
    True,
    False,

    // Comparison
    /// Equality (`=`)
    Eq,
    /// Inequality (`<>`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,

    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,

    // Punctuation
    LParen,
    RParen,
    Comma,

    // Literals
    /// Single-quoted string literal, `''` stands for one quote
    ///
    /// # Examples
    /// ```text
    /// 'order'
    /// 'it''s'
    /// ```
    String,

    /// Hexadecimal integer literal
    ///
    /// # Examples
    /// ```text
    /// 0xFF
    /// 0x1a2b
    /// ```
    Hex,

    /// Floating point literal in one of the four SQL numeric forms
    ///
    /// # Examples
    /// ```text
    /// 1.5
    /// .25e-3
    /// 7E2
    /// 3f
    /// ```
    Float,

    /// Decimal integer literal
    Int,

    /// Property name
    ///
    /// Starts with a letter, `_` or `$`, followed by letters, digits, `_`, `$` or `.`.
    ///
    /// # Examples
    /// ```text
    /// JMSType
    /// order.region
    /// $size
    /// ```
    Ident,
}

impl TokenKind {
    /// True for tokens that carry a payload and can stand alone as a leaf.
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            TokenKind::True
                | TokenKind::False
                | TokenKind::String
                | TokenKind::Hex
                | TokenKind::Float
                | TokenKind::Int
                | TokenKind::Ident
        )
    }

    /// Canonical spelling used when re-printing an expression.
    pub fn spelling(self) -> &'static str {
        use TokenKind::*;
        match self {
            NotBetween => "NOT BETWEEN",
            NotIn => "NOT IN",
            NotLike => "NOT LIKE",
            IsNotNull => "IS NOT NULL",
            IsNull => "IS NULL",
            Between => "BETWEEN",
            In => "IN",
            Like => "LIKE",
            Escape => "ESCAPE",
            Not => "NOT",
            And => "AND",
            Or => "OR",
            True => "TRUE",
            False => "FALSE",
            Eq => "=",
            Ne => "<>",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            Plus => "+",
            Minus => "-",
            Mul => "*",
            Div => "/",
            LParen => "(",
            RParen => ")",
            Comma => ",",
            String => "string",
            Hex => "hex",
            Float => "float",
            Int => "integer",
            Ident => "identifier",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Payload of a token, derived from its source text on access.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Ident(String),
    /// String literal with `''` already collapsed to `'`
    Str(String),
    Int(i64),
    Float(f64),
    Hex(u64),
}

/// A lexical token: its kind, the exact source slice it matched and the
/// char offset where that slice starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Computes the payload of this token.
    ///
    /// Returns `None` for keywords, operators and punctuation, and for a
    /// numeric literal whose value does not fit its representation.
    pub fn value(&self) -> Option<TokenValue> {
        match self.kind {
            TokenKind::Ident => Some(TokenValue::Ident(self.text.clone())),
            TokenKind::String => Some(TokenValue::Str(unquote(&self.text))),
            TokenKind::Int => self.text.parse::<i64>().ok().map(TokenValue::Int),
            TokenKind::Float => parse_float(&self.text).map(TokenValue::Float),
            TokenKind::Hex => parse_hex(&self.text).map(TokenValue::Hex),
            _ => None,
        }
    }

    /// The unescaped string payload, if this is a string literal.
    pub fn string_value(&self) -> Option<String> {
        match self.value() {
            Some(TokenValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` at {}", self.kind, self.text, self.offset)
    }
}

/// Strips the surrounding quotes and collapses doubled quotes.
fn unquote(text: &str) -> String {
    let body = text
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(text);
    body.replace("''", "'")
}

fn parse_float(text: &str) -> Option<f64> {
    let digits = text.trim_end_matches(['f', 'F', 'd', 'D']);
    digits.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Digits after the `0x` prefix; `None` on overflow.
fn parse_hex(text: &str) -> Option<u64> {
    let digits = text.get(2..)?;
    if digits.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(16)?;
        value = value.checked_mul(16)?.checked_add(u64::from(digit))?;
    }
    Some(value)
}
