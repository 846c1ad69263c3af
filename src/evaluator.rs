use std::collections::HashMap;

use regex::Regex;
use tracing::{error, trace};

use crate::{
    ast::{Node, NodeId, NodeKind, Token, TokenKind, TokenValue},
    error::InternalError,
    like,
    properties::PropertySource,
    typecheck::TypeTable,
    value::{Number, Value},
};

/// Tree-walking evaluator with three-valued logic.
///
/// Holds the compiled regex of every `LIKE` pattern in one tree, so a tree
/// is evaluated against many messages without recompiling them.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    /// `None` marks a pattern whose ESCAPE string is not one character;
    /// matching against it is unknown.
    patterns: HashMap<NodeId, Option<Regex>>,
}

impl Evaluator {
    /// Prepares an evaluator for the tree rooted at `root`.
    pub fn new(root: &Node) -> Result<Self, InternalError> {
        let mut evaluator = Evaluator::default();
        evaluator.collect_patterns(root)?;
        Ok(evaluator)
    }

    fn collect_patterns(&mut self, node: &Node) -> Result<(), InternalError> {
        if let NodeKind::Pattern { pattern, escape } = &node.kind {
            let text = string_literal(pattern)?;
            let escape = match escape {
                None => Some(None),
                Some(escape) => like::escape_char(&string_literal(escape)?).map(Some),
            };
            let regex = match escape {
                Some(escape) => Some(like::compile(&text, escape).map_err(|e| {
                    InternalError::new(format!("LIKE pattern `{}` produced a bad regex: {}", text, e))
                })?),
                None => None,
            };
            self.patterns.insert(node.id, regex);
        }
        for child in node.children() {
            self.collect_patterns(child)?;
        }
        Ok(())
    }

    /// Evaluates the selector against one message. `UNKNOWN` is `false`.
    pub fn evaluate(
        &self,
        root: &Node,
        types: &TypeTable,
        props: &dyn PropertySource,
    ) -> Result<bool, InternalError> {
        let value = self.value_of(root, types, props).inspect_err(|e| {
            error!(error = %e, "selector evaluation aborted");
        })?;
        trace!(result = ?value, "selector evaluated");
        Ok(value.is_true())
    }

    /// Computes the three-valued value of `node`.
    pub fn value_of(
        &self,
        node: &Node,
        types: &TypeTable,
        props: &dyn PropertySource,
    ) -> Result<Value, InternalError> {
        let eval = |child: &Node| self.value_of(child, types, props);

        let value = match &node.kind {
            NodeKind::Leaf(token) => leaf_value(token, props)?,
            NodeKind::Binary { op, left, right } => match op.kind {
                TokenKind::And => {
                    let left = eval(left)?;
                    if left.as_bool() == Some(false) {
                        left
                    } else {
                        left.and(&eval(right)?)
                    }
                }
                TokenKind::Or => {
                    let left = eval(left)?;
                    if left.is_true() {
                        left
                    } else {
                        left.or(&eval(right)?)
                    }
                }
                TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge => eval(left)?.compare(op.kind, &eval(right)?),
                TokenKind::Plus | TokenKind::Minus | TokenKind::Mul | TokenKind::Div => {
                    eval(left)?.arith(op.kind, &eval(right)?)
                }
                TokenKind::Like | TokenKind::NotLike => {
                    let matched = self.like(&eval(left)?, right)?;
                    if op.kind == TokenKind::NotLike {
                        matched.not()
                    } else {
                        matched
                    }
                }
                TokenKind::In | TokenKind::NotIn => {
                    let NodeKind::List(items) = &right.kind else {
                        return Err(InternalError::new("IN without a list operand"));
                    };
                    let found = eval(left)?.is_in(items);
                    if op.kind == TokenKind::NotIn {
                        found.not()
                    } else {
                        found
                    }
                }
                other => return Err(unsupported("binary", other)),
            },
            NodeKind::Ternary {
                op,
                first,
                second,
                third,
            } => {
                let within = eval(first)?.between(&eval(second)?, &eval(third)?);
                match op.kind {
                    TokenKind::Between => within,
                    TokenKind::NotBetween => within.not(),
                    other => return Err(unsupported("ternary", other)),
                }
            }
            NodeKind::Prefix { op, operand } => {
                let operand = eval(operand)?;
                match op.kind {
                    TokenKind::Not => operand.not(),
                    TokenKind::Minus => operand.negate(),
                    TokenKind::Plus => operand.plus(),
                    other => return Err(unsupported("prefix", other)),
                }
            }
            NodeKind::Postfix { op, operand } => {
                let missing = eval(operand)?.is_unknown();
                match op.kind {
                    TokenKind::IsNull => Value::Bool(missing),
                    TokenKind::IsNotNull => Value::Bool(!missing),
                    other => return Err(unsupported("postfix", other)),
                }
            }
            NodeKind::Pattern { .. } => {
                return Err(InternalError::new("LIKE pattern evaluated outside LIKE"));
            }
            NodeKind::List(_) => {
                return Err(InternalError::new("string list evaluated outside IN"));
            }
        };

        Ok(value.conform(types.get(node.id)))
    }

    fn like(&self, subject: &Value, pattern: &Node) -> Result<Value, InternalError> {
        let Some(regex) = self.patterns.get(&pattern.id) else {
            return Err(InternalError::new(format!(
                "no compiled pattern for node {:?}",
                pattern.id
            )));
        };
        Ok(match (subject, regex) {
            (Value::String(s), Some(regex)) => Value::Bool(regex.is_match(s)),
            _ => Value::Unknown,
        })
    }
}

fn unsupported(position: &str, kind: TokenKind) -> InternalError {
    InternalError::new(format!("cannot evaluate `{}` as a {} node", kind, position))
}

fn string_literal(node: &Node) -> Result<String, InternalError> {
    let value = match &node.kind {
        NodeKind::Leaf(token) => token.string_value(),
        _ => None,
    };
    value.ok_or_else(|| InternalError::new("LIKE pattern is not a string literal"))
}

/// Value of a literal or identifier.
pub fn leaf_value(token: &Token, props: &dyn PropertySource) -> Result<Value, InternalError> {
    Ok(match token.kind {
        TokenKind::True => Value::Bool(true),
        TokenKind::False => Value::Bool(false),
        TokenKind::Ident => props.property(&token.text).unwrap_or_default(),
        _ => match token.value() {
            Some(TokenValue::Str(s)) => Value::String(s),
            Some(TokenValue::Int(n)) => Value::int(n),
            Some(TokenValue::Float(n)) => Value::float(n),
            Some(TokenValue::Hex(n)) => Value::Number(hex_number(n)),
            _ => {
                return Err(InternalError::new(format!(
                    "`{}` cannot be evaluated as a leaf",
                    token.text
                )));
            }
        },
    })
}

/// Hex literals above `i64::MAX` are kept as floating point.
pub fn hex_number(n: u64) -> Number {
    match i64::try_from(n) {
        Ok(n) => Number::Int(n),
        Err(_) => Number::Float(n as f64),
    }
}

/// Evaluates `root` once, compiling its patterns on the way.
pub fn evaluate(
    root: &Node,
    types: &TypeTable,
    props: &dyn PropertySource,
) -> Result<bool, InternalError> {
    Evaluator::new(root)?.evaluate(root, types, props)
}
