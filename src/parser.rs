use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{Node, NodeKind, Token, TokenKind},
    error::{InternalError, ParseError, SelectorError},
    grammar::{Action, Rule, Term},
    lexer,
    stream::TokenStream,
};

/// Deepest chain of nested rule applications a selector may need.
///
/// One level of parentheses costs ten rules, each link of an `AND`, `OR` or
/// arithmetic chain costs one.
pub const MAX_RULE_DEPTH: usize = 512;

/// Memoized outcome of a rule that matched: which alternative, and where it
/// stopped.
#[derive(Debug, Clone, Copy)]
struct Match {
    alternative: usize,
    end: usize,
}

/// Table-driven backtracking parser.
///
/// Parsing runs in two passes. The first recognizes the input: it tries the
/// alternatives of a rule in order, resetting the stream to the rule's start
/// before each one, and the first alternative whose terms all match wins.
/// Outcomes are memoized per `(rule, position)`, so a prefix shared by
/// several alternatives is matched once. The second pass walks the memo from
/// the root and builds each node of the winning derivation exactly once.
pub struct Parser {
    stream: TokenStream,
    memo: HashMap<(Rule, usize), Option<Match>>,
    /// Furthest position at which a token failed to match
    furthest: usize,
}

impl Parser {
    pub fn new(tokens: impl Into<TokenStream>) -> Self {
        Parser {
            stream: tokens.into(),
            memo: HashMap::new(),
            furthest: 0,
        }
    }

    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    /// Parses the whole stream as a selector.
    ///
    /// Fails if the root rule does not match, if tokens remain after it, or
    /// if the input nests deeper than [`MAX_RULE_DEPTH`]. The returned tree
    /// has its node ids assigned.
    pub fn parse(mut self) -> Result<Node, SelectorError> {
        if self.stream.is_empty() {
            return Err(ParseError::Empty.into());
        }

        if !self.recognize(Rule::ROOT, 0)? {
            let err = self.error_at(self.furthest, false);
            debug!(error = %err, "selector rejected by grammar");
            return Err(err.into());
        }

        if self.stream.has_more() {
            let err = self.error_at(self.stream.position(), true);
            debug!(error = %err, "selector has trailing tokens");
            return Err(err.into());
        }

        let mut root = self.build_rule(Rule::ROOT, 0)?;
        root.number();
        Ok(root)
    }

    /// Matches `rule` at the current position, `depth` rules below the root.
    ///
    /// On `Ok(true)` the stream is left just past the match. On `Ok(false)`
    /// the position is unspecified and the caller must reset it.
    pub fn recognize(&mut self, rule: Rule, depth: usize) -> Result<bool, ParseError> {
        let start = self.stream.position();

        if depth > MAX_RULE_DEPTH {
            let offset = self.offset_at(start);
            debug!(position = start, "selector nests too deeply");
            return Err(ParseError::TooDeep {
                position: start,
                offset,
            });
        }

        if let Some(entry) = self.memo.get(&(rule, start)) {
            return Ok(match *entry {
                Some(found) => {
                    self.stream.reset(found.end);
                    true
                }
                None => false,
            });
        }

        let mut result = None;
        for (index, alternative) in rule.alternatives().iter().enumerate() {
            self.stream.reset(start);
            if self.recognize_terms(alternative.terms, depth)? {
                result = Some(Match {
                    alternative: index,
                    end: self.stream.position(),
                });
                break;
            }
        }

        self.memo.insert((rule, start), result);
        Ok(result.is_some())
    }

    fn recognize_terms(&mut self, terms: &[Term], depth: usize) -> Result<bool, ParseError> {
        for term in terms {
            let matched = match *term {
                Term::Token(kind) => self.match_token(kind),
                Term::Rule(rule) => self.recognize(rule, depth + 1)?,
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        let position = self.stream.position();
        match self.stream.peek() {
            Some(token) if token.kind == kind => {
                self.stream.advance();
                true
            }
            _ => {
                self.furthest = self.furthest.max(position);
                false
            }
        }
    }

    fn matched(&self, rule: Rule, start: usize) -> Result<Match, InternalError> {
        match self.memo.get(&(rule, start)) {
            Some(Some(found)) => Ok(*found),
            _ => Err(InternalError::new(format!(
                "{:?} was not recognized at token {}",
                rule, start
            ))),
        }
    }

    /// Builds the node `rule` recognized at `start`.
    fn build_rule(&self, rule: Rule, start: usize) -> Result<Node, InternalError> {
        let found = self.matched(rule, start)?;
        let alternative = rule.alternatives().get(found.alternative).ok_or_else(|| {
            InternalError::new(format!(
                "{:?} has no alternative {}",
                rule, found.alternative
            ))
        })?;

        let mut children = Vec::with_capacity(alternative.terms.len());
        let mut position = start;
        for term in alternative.terms {
            match *term {
                Term::Token(_) => {
                    let token = self.stream.token_at(position).cloned().ok_or_else(|| {
                        InternalError::new(format!("no token at recognized position {}", position))
                    })?;
                    children.push(Node::leaf(token));
                    position += 1;
                }
                Term::Rule(sub) => {
                    children.push(self.build_rule(sub, position)?);
                    position = self.matched(sub, position)?.end;
                }
            }
        }
        build(alternative.action, children)
    }

    /// Char offset of the token at `position`, or of the end of input.
    fn offset_at(&self, position: usize) -> usize {
        match self.stream.token_at(position) {
            Some(token) => token.offset,
            None => position
                .checked_sub(1)
                .and_then(|last| self.stream.token_at(last))
                .map(|t| t.offset + t.text.chars().count())
                .unwrap_or(0),
        }
    }

    fn error_at(&self, position: usize, trailing: bool) -> ParseError {
        let offset = self.offset_at(position);
        let found = match self.stream.token_at(position) {
            Some(token) => token.text.clone(),
            None => "end of input".to_string(),
        };
        if trailing {
            ParseError::TrailingTokens {
                position,
                offset,
                found,
            }
        } else {
            ParseError::NoMatch {
                position,
                offset,
                found,
            }
        }
    }
}

/// Tokenizes and parses `input`.
pub fn parse(input: &str) -> Result<Node, SelectorError> {
    let tokens = lexer::tokenize(input)?;
    Parser::new(tokens).parse()
}

fn take<const N: usize>(action: Action, children: Vec<Node>) -> Result<[Node; N], InternalError> {
    let count = children.len();
    children.try_into().map_err(|_| {
        InternalError::new(format!(
            "{:?} expects {} children, grammar produced {}",
            action, N, count
        ))
    })
}

fn operator(action: Action, node: Node) -> Result<Token, InternalError> {
    match node.kind {
        NodeKind::Leaf(token) => Ok(token),
        other => Err(InternalError::new(format!(
            "{:?} expects an operator token, grammar produced {:?}",
            action, other
        ))),
    }
}

fn string_of(action: Action, node: &Node) -> Result<String, InternalError> {
    let value = match &node.kind {
        NodeKind::Leaf(token) => token.string_value(),
        _ => None,
    };
    value.ok_or_else(|| InternalError::new(format!("{:?} expects a string literal", action)))
}

/// Applies a tree-construction action to the matched children.
fn build(action: Action, children: Vec<Node>) -> Result<Node, InternalError> {
    let node = match action {
        Action::CollapseOne => {
            let [child] = take(action, children)?;
            return Ok(child);
        }
        Action::CollapseInterior => {
            let [_, child, _] = take(action, children)?;
            return Ok(child);
        }
        Action::Binary => {
            let [left, op, right] = take(action, children)?;
            NodeKind::Binary {
                op: operator(action, op)?,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        Action::BinaryList => {
            let [left, op, _, list, _] = take(action, children)?;
            NodeKind::Binary {
                op: operator(action, op)?,
                left: Box::new(left),
                right: Box::new(list),
            }
        }
        Action::Ternary => {
            let [first, op, second, _, third] = take(action, children)?;
            NodeKind::Ternary {
                op: operator(action, op)?,
                first: Box::new(first),
                second: Box::new(second),
                third: Box::new(third),
            }
        }
        Action::Prefix => {
            let [op, operand] = take(action, children)?;
            NodeKind::Prefix {
                op: operator(action, op)?,
                operand: Box::new(operand),
            }
        }
        Action::Postfix => {
            let [operand, op] = take(action, children)?;
            NodeKind::Postfix {
                op: operator(action, op)?,
                operand: Box::new(operand),
            }
        }
        Action::Pattern => {
            if children.len() == 1 {
                let [pattern] = take(action, children)?;
                NodeKind::Pattern {
                    pattern: Box::new(pattern),
                    escape: None,
                }
            } else {
                let [pattern, _, escape] = take(action, children)?;
                NodeKind::Pattern {
                    pattern: Box::new(pattern),
                    escape: Some(Box::new(escape)),
                }
            }
        }
        Action::ListStart => {
            let [item] = take(action, children)?;
            NodeKind::List(vec![string_of(action, &item)?])
        }
        Action::ListJoin => {
            let [item, _, rest] = take(action, children)?;
            let mut items = vec![string_of(action, &item)?];
            match rest.kind {
                NodeKind::List(tail) => items.extend(tail),
                other => {
                    return Err(InternalError::new(format!(
                        "{:?} expects a list tail, grammar produced {:?}",
                        action, other
                    )));
                }
            }
            NodeKind::List(items)
        }
    };
    Ok(Node::new(node))
}
