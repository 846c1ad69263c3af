//! Canonical selector text for a parse tree.
//!
//! Every operator node is wrapped in parentheses, so re-tokenizing and
//! re-parsing the output yields a tree of the same shape no matter how the
//! original was grouped. Literals keep their source spelling.

use std::fmt;

use crate::ast::{Node, NodeKind, TokenKind};

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Leaf(token) => match token.kind {
                TokenKind::True | TokenKind::False => f.write_str(token.kind.spelling()),
                _ => f.write_str(&token.text),
            },
            NodeKind::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.kind.spelling(), right)
            }
            NodeKind::Ternary {
                op,
                first,
                second,
                third,
            } => write!(
                f,
                "({} {} {} AND {})",
                first,
                op.kind.spelling(),
                second,
                third
            ),
            NodeKind::Prefix { op, operand } => match op.kind {
                TokenKind::Not => write!(f, "(NOT {})", operand),
                _ => write!(f, "({}{})", op.kind.spelling(), operand),
            },
            NodeKind::Postfix { op, operand } => {
                write!(f, "({} {})", operand, op.kind.spelling())
            }
            NodeKind::Pattern { pattern, escape } => {
                write!(f, "{}", pattern)?;
                if let Some(escape) = escape {
                    write!(f, " ESCAPE {}", escape)?;
                }
                Ok(())
            }
            NodeKind::List(items) => {
                let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
                write!(f, "({})", quoted.join(", "))
            }
        }
    }
}

/// Quotes a string as a selector literal, doubling embedded quotes.
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Re-prints `node` as selector text.
pub fn print(node: &Node) -> String {
    node.to_string()
}
