use std::cmp::Ordering;

use crate::ast::{ExprType, TokenKind};

/// A numeric value, kept in the shape it was written or stored in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    /// Compares two numbers. An integer is widened to floating point only
    /// when the other side is floating point.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Applies `+ - * /`. Integer overflow and integer division by zero
    /// have no result.
    pub fn arith(self, op: TokenKind, other: Number) -> Option<Number> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => {
                let result = match op {
                    TokenKind::Plus => a.checked_add(b),
                    TokenKind::Minus => a.checked_sub(b),
                    TokenKind::Mul => a.checked_mul(b),
                    TokenKind::Div => a.checked_div(b),
                    _ => None,
                };
                result.map(Number::Int)
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let result = match op {
                    TokenKind::Plus => a + b,
                    TokenKind::Minus => a - b,
                    TokenKind::Mul => a * b,
                    TokenKind::Div => a / b,
                    _ => return None,
                };
                Some(Number::Float(result))
            }
        }
    }

    pub fn negate(self) -> Option<Number> {
        match self {
            Number::Int(n) => n.checked_neg().map(Number::Int),
            Number::Float(n) => Some(Number::Float(-n)),
        }
    }
}

/// Runtime value of a subexpression.
///
/// `Unknown` is the third truth value: a missing property, or the result of
/// any operation that involves one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Unknown,
    Bool(bool),
    String(String),
    Number(Number),
    List(Vec<String>),
}

impl Value {
    pub fn int(n: i64) -> Self {
        Value::Number(Number::Int(n))
    }

    pub fn float(n: f64) -> Self {
        Value::Number(Number::Float(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// True only for `Bool(true)`; `Unknown` does not match.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The static type this value inhabits.
    pub fn type_of(&self) -> ExprType {
        match self {
            Value::Unknown => ExprType::Any,
            Value::Bool(_) => ExprType::Bool,
            Value::String(_) => ExprType::String,
            Value::Number(_) => ExprType::Arith,
            Value::List(_) => ExprType::List,
        }
    }

    /// Discards the value of a node typed `Invalid`.
    ///
    /// Every other type keeps the value as it is. Identifier hints constrain
    /// type checking only: a property whose runtime type disagrees with its
    /// hint keeps its value, and the operators above it see the mismatch.
    pub fn conform(self, ty: ExprType) -> Value {
        match ty {
            ExprType::Invalid => Value::Unknown,
            _ => self,
        }
    }

    /// Three-valued `AND`: false wins, then unknown.
    pub fn and(&self, other: &Value) -> Value {
        match (self.as_bool(), other.as_bool()) {
            (Some(false), _) | (_, Some(false)) => Value::Bool(false),
            (Some(true), Some(true)) => Value::Bool(true),
            _ => Value::Unknown,
        }
    }

    /// Three-valued `OR`: true wins, then unknown.
    pub fn or(&self, other: &Value) -> Value {
        match (self.as_bool(), other.as_bool()) {
            (Some(true), _) | (_, Some(true)) => Value::Bool(true),
            (Some(false), Some(false)) => Value::Bool(false),
            _ => Value::Unknown,
        }
    }

    pub fn not(&self) -> Value {
        match self.as_bool() {
            Some(b) => Value::Bool(!b),
            None => Value::Unknown,
        }
    }

    /// `=` between two values of the same kind; anything else is unknown.
    pub fn equals(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a == b),
            (Value::String(a), Value::String(b)) => Value::Bool(a == b),
            (Value::Number(a), Value::Number(b)) => match a.compare(*b) {
                Some(ordering) => Value::Bool(ordering == Ordering::Equal),
                None => Value::Bool(false),
            },
            _ => Value::Unknown,
        }
    }

    /// Applies a comparison operator token.
    pub fn compare(&self, op: TokenKind, other: &Value) -> Value {
        match op {
            TokenKind::Eq => self.equals(other),
            TokenKind::Ne => self.equals(other).not(),
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                let (Some(a), Some(b)) = (self.as_number(), other.as_number()) else {
                    return Value::Unknown;
                };
                let Some(ordering) = a.compare(b) else {
                    return Value::Bool(false);
                };
                Value::Bool(match op {
                    TokenKind::Lt => ordering == Ordering::Less,
                    TokenKind::Le => ordering != Ordering::Greater,
                    TokenKind::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                })
            }
            _ => Value::Unknown,
        }
    }

    /// Applies an arithmetic operator token.
    pub fn arith(&self, op: TokenKind, other: &Value) -> Value {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.arith(op, b).map(Value::Number).unwrap_or_default(),
            _ => Value::Unknown,
        }
    }

    /// `low <= self AND self <= high`.
    pub fn between(&self, low: &Value, high: &Value) -> Value {
        low.compare(TokenKind::Le, self)
            .and(&self.compare(TokenKind::Le, high))
    }

    /// Exact membership of a string in a list.
    pub fn is_in(&self, list: &[String]) -> Value {
        match self {
            Value::String(s) => Value::Bool(list.iter().any(|item| item == s)),
            _ => Value::Unknown,
        }
    }

    pub fn negate(&self) -> Value {
        match self.as_number().and_then(Number::negate) {
            Some(n) => Value::Number(n),
            None => Value::Unknown,
        }
    }

    pub fn plus(&self) -> Value {
        match self {
            Value::Number(_) => self.clone(),
            _ => Value::Unknown,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
