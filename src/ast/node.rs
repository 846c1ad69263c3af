use crate::ast::{Token, TokenKind};

/// Identifier of a node within one parse tree.
///
/// Ids are assigned in pre-order once parsing succeeds, so the root is always
/// `NodeId(0)`. Passes that decorate the tree key their side tables by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub usize);

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Shape of a parse tree node.
///
/// Grammar-only wrapper rules are collapsed while parsing and never show up
/// here.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A literal or identifier
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 'EU'
    /// priority
    /// ```
    Leaf(Token),

    /// Infix operator, including `LIKE`/`IN` whose right side is a
    /// pattern or list node
    ///
    /// # Examples
    /// ```text
    /// a + b
    /// region IN ('EU', 'US')
    /// ```
    Binary {
        op: Token,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// `BETWEEN` / `NOT BETWEEN`
    ///
    /// # Example
    /// ```text
    /// size BETWEEN 1 AND 10
    /// ```
    Ternary {
        op: Token,
        first: Box<Node>,
        second: Box<Node>,
        third: Box<Node>,
    },

    /// `NOT x`, `-x`, `+x`
    Prefix { op: Token, operand: Box<Node> },

    /// `x IS NULL`, `x IS NOT NULL`
    Postfix { op: Token, operand: Box<Node> },

    /// Right side of `LIKE`: a pattern string and an optional escape string
    Pattern {
        pattern: Box<Node>,
        escape: Option<Box<Node>>,
    },

    /// Right side of `IN`: the string list, already unescaped
    List(Vec<String>),
}

impl Node {
    /// Builds a node with a placeholder id; see [`Node::number`].
    pub fn new(kind: NodeKind) -> Self {
        Node {
            id: NodeId::default(),
            kind,
        }
    }

    pub fn leaf(token: Token) -> Self {
        Node::new(NodeKind::Leaf(token))
    }

    /// Assigns pre-order ids to this node and all descendants, starting at 0.
    /// Returns the number of nodes.
    pub fn number(&mut self) -> usize {
        let mut next = 0;
        self.number_from(&mut next);
        next
    }

    fn number_from(&mut self, next: &mut usize) {
        self.id = NodeId(*next);
        *next += 1;
        for child in self.children_mut() {
            child.number_from(next);
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Leaf(_) | NodeKind::List(_) => vec![],
            NodeKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeKind::Ternary {
                first,
                second,
                third,
                ..
            } => vec![first.as_ref(), second.as_ref(), third.as_ref()],
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => {
                vec![operand.as_ref()]
            }
            NodeKind::Pattern { pattern, escape } => {
                let mut children = vec![pattern.as_ref()];
                if let Some(escape) = escape {
                    children.push(escape.as_ref());
                }
                children
            }
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Node> {
        match &mut self.kind {
            NodeKind::Leaf(_) | NodeKind::List(_) => vec![],
            NodeKind::Binary { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            NodeKind::Ternary {
                first,
                second,
                third,
                ..
            } => vec![first.as_mut(), second.as_mut(), third.as_mut()],
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => {
                vec![operand.as_mut()]
            }
            NodeKind::Pattern { pattern, escape } => {
                let mut children = vec![pattern.as_mut()];
                if let Some(escape) = escape {
                    children.push(escape.as_mut());
                }
                children
            }
        }
    }

    /// Operator token of an operator node.
    pub fn operator(&self) -> Option<TokenKind> {
        match &self.kind {
            NodeKind::Binary { op, .. }
            | NodeKind::Ternary { op, .. }
            | NodeKind::Prefix { op, .. }
            | NodeKind::Postfix { op, .. } => Some(op.kind),
            _ => None,
        }
    }

    /// Total number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    /// Structural equality that ignores node ids, source offsets and the
    /// spelling of keywords and literals: `TRUE` and `true`, or `1.0` and
    /// `1.0d`, have the same shape.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (&self.kind, &other.kind) {
            (NodeKind::Leaf(a), NodeKind::Leaf(b)) => a.kind == b.kind && a.value() == b.value(),
            (NodeKind::List(a), NodeKind::List(b)) => a == b,
            (
                NodeKind::Pattern {
                    pattern: pa,
                    escape: ea,
                },
                NodeKind::Pattern {
                    pattern: pb,
                    escape: eb,
                },
            ) => {
                pa.same_shape(pb)
                    && match (ea, eb) {
                        (None, None) => true,
                        (Some(a), Some(b)) => a.same_shape(b),
                        _ => false,
                    }
            }
            (a, b) if std::mem::discriminant(a) == std::mem::discriminant(b) => {
                self.operator() == other.operator()
                    && self
                        .children()
                        .iter()
                        .zip(other.children())
                        .all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }
}
