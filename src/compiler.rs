//! Code generator for term programs.
//!
//! Serializes a parse tree as an Erlang-style term that a downstream
//! interpreter evaluates with the same semantics as [`crate::evaluator`].
//!
//! | Node | Encoding |
//! |---|---|
//! | `TRUE` / `FALSE` | `'true'` / `'false'` |
//! | integer, float, hex | bare numeral |
//! | string | `<<"…">>`, with `"` and `\` backslash-escaped |
//! | identifier | `{'ident', <<"name">>}` |
//! | string list | `[<<"a">>, <<"b">>]` |
//! | `l op r` | `{'op', L, R}` |
//! | `l AND r` / `l OR r` | `{'and', L, R}` / `{'or', L, R}` |
//! | `NOT e`, `-e`, `+e` | `{'not', E}`, `{'-', E}`, `{'+', E}` |
//! | `x IS NULL` / `x IS NOT NULL` | `{'is_null', X}` / `{'not_null', X}` |
//! | `x BETWEEN a AND b` | `{'between', X, {'range', A, B}}` |
//! | `x NOT BETWEEN a AND b` | `{'not_between', X, {'range', A, B}}` |
//! | `x LIKE p` | `{'like', X, {<<"p">>, 'no_escape'}}` |
//! | `x LIKE p ESCAPE e` | `{'like', X, {<<"p">>, <<"e">>}}` |
//! | `x NOT LIKE …` | `{'not_like', …}` |
//! | `x IN (…)` / `x NOT IN (…)` | `{'in', X, […]}` / `{'not_in', X, […]}` |

use crate::{
    ast::{Node, NodeKind, Token, TokenKind, TokenValue},
    error::{CompileError, InternalError},
};

/// Generates the term program for `root`.
///
/// Either the whole program is produced or an error is returned; there is
/// no partial output.
///
/// # Examples
///
/// ```
/// use selector_lang::{compiler, parser};
///
/// let tree = parser::parse("a = 1 AND b IN ('x')").unwrap();
/// assert_eq!(
///     compiler::compile(&tree).unwrap(),
///     r#"{'and', {'=', {'ident', <<"a">>}, 1}, {'in', {'ident', <<"b">>}, [<<"x">>]}}"#
/// );
/// ```
pub fn compile(root: &Node) -> Result<String, CompileError> {
    let mut compiler = Compiler::default();
    compiler.emit(root)?;
    Ok(compiler.out)
}

#[derive(Default)]
struct Compiler {
    out: String,
}

impl Compiler {
    fn emit(&mut self, node: &Node) -> Result<(), CompileError> {
        match &node.kind {
            NodeKind::Leaf(token) => self.emit_leaf(token),
            NodeKind::Binary { op, left, right } => match op.kind {
                TokenKind::And => self.tuple("and", &[left, right]),
                TokenKind::Or => self.tuple("or", &[left, right]),
                TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Mul
                | TokenKind::Div => self.tuple(op.kind.spelling(), &[left, right]),
                TokenKind::Like | TokenKind::NotLike => {
                    let atom = if op.kind == TokenKind::Like { "like" } else { "not_like" };
                    self.open(atom);
                    self.emit(left)?;
                    self.out.push_str(", ");
                    self.emit_pattern(right)?;
                    self.out.push('}');
                    Ok(())
                }
                TokenKind::In | TokenKind::NotIn => {
                    let atom = if op.kind == TokenKind::In { "in" } else { "not_in" };
                    let NodeKind::List(items) = &right.kind else {
                        return Err(misplaced("IN operand", right));
                    };
                    self.open(atom);
                    self.emit(left)?;
                    self.out.push_str(", ");
                    self.emit_list(items);
                    self.out.push('}');
                    Ok(())
                }
                other => Err(unsupported("binary", other)),
            },
            NodeKind::Ternary {
                op,
                first,
                second,
                third,
            } => {
                let atom = match op.kind {
                    TokenKind::Between => "between",
                    TokenKind::NotBetween => "not_between",
                    other => return Err(unsupported("ternary", other)),
                };
                self.open(atom);
                self.emit(first)?;
                self.out.push_str(", ");
                self.tuple("range", &[second, third])?;
                self.out.push('}');
                Ok(())
            }
            NodeKind::Prefix { op, operand } => match op.kind {
                TokenKind::Not => self.tuple("not", &[operand]),
                TokenKind::Minus | TokenKind::Plus => self.tuple(op.kind.spelling(), &[operand]),
                other => Err(unsupported("prefix", other)),
            },
            NodeKind::Postfix { op, operand } => match op.kind {
                TokenKind::IsNull => self.tuple("is_null", &[operand]),
                TokenKind::IsNotNull => self.tuple("not_null", &[operand]),
                other => Err(unsupported("postfix", other)),
            },
            NodeKind::Pattern { .. } | NodeKind::List(_) => Err(misplaced("operand", node)),
        }
    }

    fn open(&mut self, atom: &str) {
        self.out.push('{');
        self.out.push_str(&atom_text(atom));
        self.out.push_str(", ");
    }

    /// `{'atom', C1, C2, ...}`
    fn tuple(&mut self, atom: &str, children: &[&Box<Node>]) -> Result<(), CompileError> {
        self.out.push('{');
        self.out.push_str(&atom_text(atom));
        for child in children {
            self.out.push_str(", ");
            self.emit(child)?;
        }
        self.out.push('}');
        Ok(())
    }

    fn emit_leaf(&mut self, token: &Token) -> Result<(), CompileError> {
        let text = match token.kind {
            TokenKind::True => atom_text("true"),
            TokenKind::False => atom_text("false"),
            TokenKind::Ident => format!("{{'ident', {}}}", binary(&token.text)),
            _ => match token.value() {
                Some(TokenValue::Str(s)) => binary(&s),
                Some(TokenValue::Int(n)) => n.to_string(),
                Some(TokenValue::Hex(n)) => n.to_string(),
                Some(TokenValue::Float(n)) => format_float(n)
                    .ok_or_else(|| CompileError::UnsupportedLiteral(token.text.clone()))?,
                _ => {
                    return Err(InternalError::new(format!(
                        "`{}` cannot be compiled as a leaf",
                        token.text
                    ))
                    .into());
                }
            },
        };
        self.out.push_str(&text);
        Ok(())
    }

    fn emit_pattern(&mut self, node: &Node) -> Result<(), CompileError> {
        let NodeKind::Pattern { pattern, escape } = &node.kind else {
            return Err(misplaced("LIKE operand", node));
        };
        let pattern = string_literal(pattern)?;
        let escape = match escape {
            Some(escape) => binary(&string_literal(escape)?),
            None => atom_text("no_escape"),
        };
        self.out
            .push_str(&format!("{{{}, {}}}", binary(&pattern), escape));
        Ok(())
    }

    fn emit_list(&mut self, items: &[String]) {
        let items: Vec<String> = items.iter().map(|s| binary(s)).collect();
        self.out.push('[');
        self.out.push_str(&items.join(", "));
        self.out.push(']');
    }
}

fn string_literal(node: &Node) -> Result<String, CompileError> {
    let value = match &node.kind {
        NodeKind::Leaf(token) => token.string_value(),
        _ => None,
    };
    value.ok_or_else(|| misplaced("pattern string", node))
}

fn misplaced(position: &str, node: &Node) -> CompileError {
    InternalError::new(format!("node {:?} cannot be compiled as {}", node.kind, position)).into()
}

fn unsupported(position: &str, kind: TokenKind) -> CompileError {
    InternalError::new(format!("cannot compile `{}` as a {} node", kind, position)).into()
}

/// Quoted atom.
pub fn atom_text(name: &str) -> String {
    format!("'{}'", name)
}

/// Binary string literal with `"` and `\` escaped.
pub fn binary(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 6);
    out.push_str("<<\"");
    for ch in s.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push_str("\">>");
    out
}

/// Float numeral that always has a decimal point before any exponent.
pub fn format_float(n: f64) -> Option<String> {
    if !n.is_finite() {
        return None;
    }
    let text = format!("{:?}", n);
    Some(match text.find('e') {
        Some(at) if !text[..at].contains('.') => format!("{}.0{}", &text[..at], &text[at..]),
        _ => text,
    })
}

#[test]
fn test_format_float() {
    assert_eq!(format_float(1.0).unwrap(), "1.0");
    assert_eq!(format_float(2.5).unwrap(), "2.5");
    assert_eq!(format_float(1e20).unwrap(), "1.0e20");
    assert_eq!(format_float(f64::INFINITY), None);
}

#[test]
fn test_binary_escaping() {
    assert_eq!(binary(r#"a"b\c"#), r#"<<"a\"b\\c">>"#);
}
