//! Reader and interpreter for compiled term programs.
//!
//! Gives the output of [`crate::compiler`] the same three-valued meaning the
//! tree evaluator gives the source selector.

use std::fmt;

use crate::{
    ast::TokenKind,
    compiler::{atom_text, binary, format_float},
    error::ProgramError,
    evaluator::hex_number,
    like,
    properties::PropertySource,
    value::{Number, Value},
};

/// One term of a program.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Int(i64),
    Float(f64),
    Binary(String),
    Tuple(Vec<Term>),
    List(Vec<Term>),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let join = |f: &mut fmt::Formatter, terms: &[Term]| -> fmt::Result {
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", term)?;
            }
            Ok(())
        };
        match self {
            Term::Atom(name) => write!(f, "{}", atom_text(name)),
            Term::Int(n) => write!(f, "{}", n),
            Term::Float(n) => match format_float(*n) {
                Some(text) => write!(f, "{}", text),
                None => write!(f, "{}", n),
            },
            Term::Binary(s) => write!(f, "{}", binary(s)),
            Term::Tuple(terms) => {
                write!(f, "{{")?;
                join(f, terms)?;
                write!(f, "}}")
            }
            Term::List(terms) => {
                write!(f, "[")?;
                join(f, terms)?;
                write!(f, "]")
            }
        }
    }
}

/// A parsed term program.
///
/// # Examples
///
/// ```
/// use selector_lang::{Program, Properties};
///
/// let program = Program::parse(r#"{'>', {'ident', <<"n">>}, 3}"#).unwrap();
/// assert!(program.evaluate(&Properties::new().with("n", 5)).unwrap());
/// assert!(!program.evaluate(&Properties::new()).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    root: Term,
}

impl Program {
    pub fn parse(text: &str) -> Result<Self, ProgramError> {
        let mut reader = Reader::new(text);
        let root = reader.read_term()?;
        reader.skip_whitespace();
        if let Some(ch) = reader.current_char() {
            return Err(reader.error(format!("unexpected trailing `{}`", ch)));
        }
        Ok(Program { root })
    }

    pub fn root(&self) -> &Term {
        &self.root
    }

    /// Runs the program against one message. `UNKNOWN` is `false`.
    pub fn evaluate(&self, props: &dyn PropertySource) -> Result<bool, ProgramError> {
        Ok(eval(&self.root, props)?.is_true())
    }

    /// Computes the three-valued result.
    pub fn value(&self, props: &dyn PropertySource) -> Result<Value, ProgramError> {
        eval(&self.root, props)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Deepest tuple and list nesting a program may use.
pub const MAX_TERM_DEPTH: usize = 1024;

struct Reader {
    input: Vec<char>,
    position: usize,
    depth: usize,
}

impl Reader {
    fn new(input: &str) -> Self {
        Reader {
            input: input.chars().collect(),
            position: 0,
            depth: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn error(&self, message: impl Into<String>) -> ProgramError {
        ProgramError::Syntax {
            offset: self.position,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: &str) -> Result<(), ProgramError> {
        for want in expected.chars() {
            match self.current_char() {
                Some(ch) if ch == want => self.advance(),
                Some(ch) => return Err(self.error(format!("expected `{}`, found `{}`", want, ch))),
                None => return Err(self.error(format!("expected `{}`, found end of input", want))),
            }
        }
        Ok(())
    }

    fn read_term(&mut self) -> Result<Term, ProgramError> {
        self.skip_whitespace();
        match self.current_char() {
            Some('\'') => self.read_atom(),
            Some('<') => self.read_binary(),
            Some('{') => Ok(Term::Tuple(self.read_sequence('{', '}')?)),
            Some('[') => Ok(Term::List(self.read_sequence('[', ']')?)),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.read_number(),
            Some(ch) => Err(self.error(format!("unexpected `{}`", ch))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn read_atom(&mut self) -> Result<Term, ProgramError> {
        self.advance();
        let mut name = String::new();
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '\'' {
                return Ok(Term::Atom(name));
            }
            name.push(ch);
        }
        Err(self.error("unterminated atom"))
    }

    fn read_binary(&mut self) -> Result<Term, ProgramError> {
        self.expect("<<\"")?;
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            self.advance();
            match ch {
                '"' => {
                    self.expect(">>")?;
                    return Ok(Term::Binary(result));
                }
                '\\' => match self.current_char() {
                    Some(escaped) => {
                        result.push(escaped);
                        self.advance();
                    }
                    None => break,
                },
                _ => result.push(ch),
            }
        }
        Err(self.error("unterminated binary"))
    }

    fn read_number(&mut self) -> Result<Term, ProgramError> {
        let start = self.position;
        let mut text = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            text.push('-');
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            match ch {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if matches!(text.chars().last(), Some('e' | 'E')) => {}
                _ => break,
            }
            text.push(ch);
            self.advance();
        }

        let malformed = || ProgramError::Syntax {
            offset: start,
            message: format!("malformed number `{}`", text),
        };
        if is_float {
            return text.parse::<f64>().map(Term::Float).map_err(|_| malformed());
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Term::Int(n));
        }
        // Hex literals above i64::MAX are emitted as unsigned decimals.
        let n = text.parse::<u64>().map_err(|_| malformed())?;
        Ok(match hex_number(n) {
            Number::Int(n) => Term::Int(n),
            Number::Float(n) => Term::Float(n),
        })
    }

    fn read_sequence(&mut self, open: char, close: char) -> Result<Vec<Term>, ProgramError> {
        if self.depth == MAX_TERM_DEPTH {
            return Err(self.error("terms nested too deeply"));
        }
        self.depth += 1;
        let terms = self.read_items(open, close);
        self.depth -= 1;
        terms
    }

    fn read_items(&mut self, open: char, close: char) -> Result<Vec<Term>, ProgramError> {
        self.expect(&open.to_string())?;
        let mut terms = Vec::new();
        self.skip_whitespace();
        if self.current_char() == Some(close) {
            self.advance();
            return Ok(terms);
        }
        loop {
            terms.push(self.read_term()?);
            self.skip_whitespace();
            match self.current_char() {
                Some(',') => self.advance(),
                Some(ch) if ch == close => {
                    self.advance();
                    return Ok(terms);
                }
                Some(ch) => {
                    return Err(self.error(format!("expected `,` or `{}`, found `{}`", close, ch)));
                }
                None => return Err(self.error(format!("missing `{}`", close))),
            }
        }
    }
}

fn operator(name: &str) -> Option<TokenKind> {
    Some(match name {
        "=" => TokenKind::Eq,
        "<>" => TokenKind::Ne,
        "<" => TokenKind::Lt,
        "<=" => TokenKind::Le,
        ">" => TokenKind::Gt,
        ">=" => TokenKind::Ge,
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Mul,
        "/" => TokenKind::Div,
        _ => return None,
    })
}

fn eval(term: &Term, props: &dyn PropertySource) -> Result<Value, ProgramError> {
    match term {
        Term::Atom(name) => match name.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ProgramError::UnknownTerm(term.to_string())),
        },
        Term::Int(n) => Ok(Value::int(*n)),
        Term::Float(n) => Ok(Value::float(*n)),
        Term::Binary(s) => Ok(Value::String(s.clone())),
        Term::List(items) => Ok(Value::List(string_list(term, items)?)),
        Term::Tuple(terms) => eval_tuple(term, terms, props),
    }
}

fn eval_tuple(
    term: &Term,
    terms: &[Term],
    props: &dyn PropertySource,
) -> Result<Value, ProgramError> {
    let unknown = || ProgramError::UnknownTerm(term.to_string());
    let Some((Term::Atom(tag), args)) = terms.split_first() else {
        return Err(unknown());
    };

    Ok(match (tag.as_str(), args) {
        ("ident", [Term::Binary(name)]) => props.property(name).unwrap_or_default(),
        ("and", [left, right]) => {
            let left = eval(left, props)?;
            if left.as_bool() == Some(false) {
                left
            } else {
                left.and(&eval(right, props)?)
            }
        }
        ("or", [left, right]) => {
            let left = eval(left, props)?;
            if left.is_true() {
                left
            } else {
                left.or(&eval(right, props)?)
            }
        }
        ("not", [operand]) => eval(operand, props)?.not(),
        ("-", [operand]) => eval(operand, props)?.negate(),
        ("+", [operand]) => eval(operand, props)?.plus(),
        ("is_null", [operand]) => Value::Bool(eval(operand, props)?.is_unknown()),
        ("not_null", [operand]) => Value::Bool(!eval(operand, props)?.is_unknown()),
        ("between" | "not_between", [subject, Term::Tuple(range)]) => {
            let [Term::Atom(range_tag), low, high] = range.as_slice() else {
                return Err(unknown());
            };
            if range_tag != "range" {
                return Err(unknown());
            }
            let within = eval(subject, props)?.between(&eval(low, props)?, &eval(high, props)?);
            if tag == "between" { within } else { within.not() }
        }
        ("like" | "not_like", [subject, Term::Tuple(pattern)]) => {
            let matched = like_value(&eval(subject, props)?, pattern).ok_or_else(unknown)??;
            if tag == "like" { matched } else { matched.not() }
        }
        ("in" | "not_in", [subject, list @ Term::List(items)]) => {
            let found = eval(subject, props)?.is_in(&string_list(list, items)?);
            if tag == "in" { found } else { found.not() }
        }
        (name, [left, right]) => {
            let op = operator(name).ok_or_else(unknown)?;
            let (left, right) = (eval(left, props)?, eval(right, props)?);
            match op {
                TokenKind::Plus | TokenKind::Minus | TokenKind::Mul | TokenKind::Div => {
                    left.arith(op, &right)
                }
                _ => left.compare(op, &right),
            }
        }
        _ => return Err(unknown()),
    })
}

/// `None` when `pattern` is not a `{Pattern, Escape}` pair.
fn like_value(subject: &Value, pattern: &[Term]) -> Option<Result<Value, ProgramError>> {
    let [Term::Binary(text), escape] = pattern else {
        return None;
    };
    let escape = match escape {
        Term::Atom(name) if name == "no_escape" => Some(None),
        Term::Binary(escape) => like::escape_char(escape).map(Some),
        _ => return None,
    };
    let Some(escape) = escape else {
        return Some(Ok(Value::Unknown));
    };
    let Value::String(subject) = subject else {
        return Some(Ok(Value::Unknown));
    };
    Some(
        like::compile(text, escape)
            .map(|re| Value::Bool(re.is_match(subject)))
            .map_err(|e| ProgramError::Pattern(e.to_string())),
    )
}

fn string_list(term: &Term, items: &[Term]) -> Result<Vec<String>, ProgramError> {
    items
        .iter()
        .map(|item| match item {
            Term::Binary(s) => Ok(s.clone()),
            _ => Err(ProgramError::UnknownTerm(term.to_string())),
        })
        .collect()
}
