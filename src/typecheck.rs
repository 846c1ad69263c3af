use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{ExprType, IdentifierTypes, Node, NodeId, NodeKind, Token, TokenKind},
    error::{InternalError, TypeError},
};

/// Types assigned to the nodes of one tree, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    types: HashMap<NodeId, ExprType>,
}

impl TypeTable {
    /// Type of a node; `NotSet` if the checker never reached it.
    pub fn get(&self, id: NodeId) -> ExprType {
        self.types.get(&id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn set(&mut self, id: NodeId, ty: ExprType) {
        self.types.insert(id, ty);
    }
}

/// Post-order type assignment.
///
/// Each node's type depends only on its own operator and the types of its
/// children. The tree is never modified; types go into a [`TypeTable`].
pub struct TypeChecker<'a> {
    hints: &'a IdentifierTypes,
    table: TypeTable,
}

impl<'a> TypeChecker<'a> {
    pub fn new(hints: &'a IdentifierTypes) -> Self {
        TypeChecker {
            hints,
            table: TypeTable::default(),
        }
    }

    /// Types every node under `root`.
    pub fn check(mut self, root: &Node) -> Result<TypeTable, InternalError> {
        self.visit(root)?;
        Ok(self.table)
    }

    fn visit(&mut self, node: &Node) -> Result<ExprType, InternalError> {
        let child_types = node
            .children()
            .into_iter()
            .map(|child| self.visit(child))
            .collect::<Result<Vec<_>, _>>()?;

        let ty = if child_types.contains(&ExprType::Invalid) {
            ExprType::Invalid
        } else {
            self.type_node(node, &child_types)?
        };

        self.table.set(node.id, ty);
        Ok(ty)
    }

    fn type_node(&self, node: &Node, children: &[ExprType]) -> Result<ExprType, InternalError> {
        use ExprType::*;

        let ty = match &node.kind {
            NodeKind::Leaf(token) => self.type_leaf(token)?,
            NodeKind::List(_) => List,
            NodeKind::Pattern { pattern, escape } => {
                let escape_ok = match escape.as_deref() {
                    None => true,
                    Some(Node {
                        kind: NodeKind::Leaf(token),
                        ..
                    }) => token
                        .string_value()
                        .is_some_and(|s| s.chars().count() == 1),
                    Some(_) => false,
                };
                let pattern_ok = matches!(&pattern.kind, NodeKind::Leaf(t) if t.kind == TokenKind::String);
                if pattern_ok && escape_ok { String } else { Invalid }
            }
            NodeKind::Binary { op, .. } => {
                let (left, right) = (children[0], children[1]);
                match op.kind {
                    TokenKind::Eq | TokenKind::Ne => {
                        let comparable = [Bool, Arith, String]
                            .iter()
                            .any(|&want| left.is_compatible(want) && right.is_compatible(want));
                        if comparable { Bool } else { Invalid }
                    }
                    TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                        both(left, right, Arith, Bool)
                    }
                    TokenKind::Plus | TokenKind::Minus | TokenKind::Mul | TokenKind::Div => {
                        both(left, right, Arith, Arith)
                    }
                    TokenKind::And | TokenKind::Or => both(left, right, Bool, Bool),
                    TokenKind::Like | TokenKind::NotLike => {
                        if left.is_compatible(String) && right == String { Bool } else { Invalid }
                    }
                    TokenKind::In | TokenKind::NotIn => {
                        if left.is_compatible(String) && right == List { Bool } else { Invalid }
                    }
                    other => return Err(unexpected("binary", other)),
                }
            }
            NodeKind::Ternary { op, .. } => match op.kind {
                TokenKind::Between | TokenKind::NotBetween => {
                    if children.iter().all(|t| t.is_compatible(Arith)) { Bool } else { Invalid }
                }
                other => return Err(unexpected("ternary", other)),
            },
            NodeKind::Prefix { op, .. } => match op.kind {
                TokenKind::Not => if children[0].is_compatible(Bool) { Bool } else { Invalid },
                TokenKind::Plus | TokenKind::Minus => {
                    if children[0].is_compatible(Arith) { Arith } else { Invalid }
                }
                other => return Err(unexpected("prefix", other)),
            },
            NodeKind::Postfix { op, .. } => match op.kind {
                TokenKind::IsNull | TokenKind::IsNotNull => Bool,
                other => return Err(unexpected("postfix", other)),
            },
        };
        Ok(ty)
    }

    fn type_leaf(&self, token: &Token) -> Result<ExprType, InternalError> {
        Ok(match token.kind {
            TokenKind::True | TokenKind::False => ExprType::Bool,
            TokenKind::String => ExprType::String,
            TokenKind::Int | TokenKind::Float | TokenKind::Hex => ExprType::Arith,
            TokenKind::Ident => self
                .hints
                .get(&token.text)
                .copied()
                .unwrap_or(ExprType::Any),
            other => return Err(unexpected("leaf", other)),
        })
    }
}

fn both(left: ExprType, right: ExprType, want: ExprType, result: ExprType) -> ExprType {
    if left.is_compatible(want) && right.is_compatible(want) {
        result
    } else {
        ExprType::Invalid
    }
}

fn unexpected(position: &str, kind: TokenKind) -> InternalError {
    InternalError::new(format!("`{}` cannot appear as a {} node", kind, position))
}

/// Types `root` and returns the type of the root node.
pub fn type_of(root: &Node, hints: &IdentifierTypes) -> Result<ExprType, InternalError> {
    let table = TypeChecker::new(hints).check(root)?;
    Ok(table.get(root.id))
}

/// Accepts a typed tree as a selector if its root is `Bool` or `Any`.
pub fn accept(root: &Node, table: &TypeTable) -> Result<ExprType, TypeError> {
    let found = table.get(root.id);
    match found {
        ExprType::Bool | ExprType::Any => Ok(found),
        _ => {
            let err = TypeError {
                found,
                culprit: innermost_invalid(root, table).map(|n| n.to_string()),
            };
            debug!(error = %err, "selector rejected by type checker");
            Err(err)
        }
    }
}

/// The deepest `Invalid` node none of whose children are `Invalid`.
fn innermost_invalid<'n>(node: &'n Node, table: &TypeTable) -> Option<&'n Node> {
    if table.get(node.id) != ExprType::Invalid {
        return None;
    }
    node.children()
        .into_iter()
        .find_map(|child| innermost_invalid(child, table))
        .or(Some(node))
}
