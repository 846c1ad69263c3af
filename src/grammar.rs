//! Grammar table of the selector language.
//!
//! The grammar is data. Each [`Rule`] owns an ordered list of
//! [`Alternative`]s, and each alternative is a sequence of [`Term`]s plus the
//! [`Action`] that turns the matched children into a tree node. The parser in
//! [`crate::parser`] interprets this table and has no per-rule logic.
//!
//! ```text
//! expr      := or_expr
//! or_expr   := and_expr OR or_expr | and_expr
//! and_expr  := not_expr AND and_expr | not_expr
//! not_expr  := NOT cmp_expr | cmp_expr
//! cmp_expr  := arith cmp_op arith
//!            | arith BETWEEN arith AND arith
//!            | arith NOT_BETWEEN arith AND arith
//!            | arith
//! arith     := plus_expr
//! plus_expr := mult_expr add_op plus_expr | mult_expr
//! mult_expr := sign_expr mul_op mult_expr | sign_expr
//! sign_expr := add_op simple | simple
//! simple    := '(' expr ')' | TRUE | FALSE | STRING | number
//!            | IDENT IS_NULL | IDENT IS_NOT_NULL
//!            | IDENT NOT_IN '(' string_list ')' | IDENT IN '(' string_list ')'
//!            | IDENT NOT_LIKE pattern | IDENT LIKE pattern
//!            | IDENT
//! pattern   := STRING ESCAPE STRING | STRING
//! string_list := STRING ',' string_list | STRING
//! number    := HEX | FLOAT | INT
//! ```
//!
//! When one alternative is a prefix of another, the longer one comes first.

use crate::ast::TokenKind;

/// Non-terminal rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Expr,
    OrExpr,
    AndExpr,
    NotExpr,
    CmpExpr,
    CmpOp,
    Arith,
    PlusExpr,
    AddOp,
    MultExpr,
    MulOp,
    SignExpr,
    Simple,
    Pattern,
    StringList,
    Number,
}

/// One element of an alternative: a sub-rule or a single token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Rule(Rule),
    Token(TokenKind),
}

/// How to build a node from the children an alternative matched.
///
/// Indexes below refer to the matched terms, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pass child 0 through unchanged
    CollapseOne,
    /// Pass child 1 through unchanged, dropping the brackets around it
    CollapseInterior,
    /// `left op right` from children 0, 1, 2
    Binary,
    /// `left op ( list )`: operator at 1, list at 3
    BinaryList,
    /// `first op second AND third` from children 0, 1, 2, 4
    Ternary,
    /// `op operand` from children 0, 1
    Prefix,
    /// `operand op` from children 0, 1
    Postfix,
    /// `STRING` or `STRING ESCAPE STRING`
    Pattern,
    /// A one-element string list from child 0
    ListStart,
    /// Child 0 prepended to the list at child 2
    ListJoin,
}

impl Action {
    /// Number of terms an alternative using this action must have, when fixed.
    pub fn arity(self) -> Option<usize> {
        match self {
            Action::CollapseOne | Action::ListStart => Some(1),
            Action::CollapseInterior | Action::Binary | Action::ListJoin => Some(3),
            Action::BinaryList | Action::Ternary => Some(5),
            Action::Prefix | Action::Postfix => Some(2),
            Action::Pattern => None,
        }
    }
}

/// An ordered sequence of terms and the action that builds its node.
#[derive(Debug)]
pub struct Alternative {
    pub action: Action,
    pub terms: &'static [Term],
}

use Action as A;
use Term::{Rule as R, Token as T};
use TokenKind as K;

const fn alt(action: Action, terms: &'static [Term]) -> Alternative {
    Alternative { action, terms }
}

const EXPR: &[Alternative] = &[alt(A::CollapseOne, &[R(Rule::OrExpr)])];

const OR_EXPR: &[Alternative] = &[
    alt(A::Binary, &[R(Rule::AndExpr), T(K::Or), R(Rule::OrExpr)]),
    alt(A::CollapseOne, &[R(Rule::AndExpr)]),
];

const AND_EXPR: &[Alternative] = &[
    alt(A::Binary, &[R(Rule::NotExpr), T(K::And), R(Rule::AndExpr)]),
    alt(A::CollapseOne, &[R(Rule::NotExpr)]),
];

const NOT_EXPR: &[Alternative] = &[
    alt(A::Prefix, &[T(K::Not), R(Rule::CmpExpr)]),
    alt(A::CollapseOne, &[R(Rule::CmpExpr)]),
];

const CMP_EXPR: &[Alternative] = &[
    alt(A::Binary, &[R(Rule::Arith), R(Rule::CmpOp), R(Rule::Arith)]),
    alt(
        A::Ternary,
        &[
            R(Rule::Arith),
            T(K::Between),
            R(Rule::Arith),
            T(K::And),
            R(Rule::Arith),
        ],
    ),
    alt(
        A::Ternary,
        &[
            R(Rule::Arith),
            T(K::NotBetween),
            R(Rule::Arith),
            T(K::And),
            R(Rule::Arith),
        ],
    ),
    alt(A::CollapseOne, &[R(Rule::Arith)]),
];

const CMP_OP: &[Alternative] = &[
    alt(A::CollapseOne, &[T(K::Eq)]),
    alt(A::CollapseOne, &[T(K::Ne)]),
    alt(A::CollapseOne, &[T(K::Lt)]),
    alt(A::CollapseOne, &[T(K::Le)]),
    alt(A::CollapseOne, &[T(K::Gt)]),
    alt(A::CollapseOne, &[T(K::Ge)]),
];

const ARITH: &[Alternative] = &[alt(A::CollapseOne, &[R(Rule::PlusExpr)])];

const PLUS_EXPR: &[Alternative] = &[
    alt(A::Binary, &[R(Rule::MultExpr), R(Rule::AddOp), R(Rule::PlusExpr)]),
    alt(A::CollapseOne, &[R(Rule::MultExpr)]),
];

const ADD_OP: &[Alternative] = &[
    alt(A::CollapseOne, &[T(K::Plus)]),
    alt(A::CollapseOne, &[T(K::Minus)]),
];

const MULT_EXPR: &[Alternative] = &[
    alt(A::Binary, &[R(Rule::SignExpr), R(Rule::MulOp), R(Rule::MultExpr)]),
    alt(A::CollapseOne, &[R(Rule::SignExpr)]),
];

const MUL_OP: &[Alternative] = &[
    alt(A::CollapseOne, &[T(K::Mul)]),
    alt(A::CollapseOne, &[T(K::Div)]),
];

const SIGN_EXPR: &[Alternative] = &[
    alt(A::Prefix, &[R(Rule::AddOp), R(Rule::Simple)]),
    alt(A::CollapseOne, &[R(Rule::Simple)]),
];

const SIMPLE: &[Alternative] = &[
    alt(A::CollapseInterior, &[T(K::LParen), R(Rule::Expr), T(K::RParen)]),
    alt(A::CollapseOne, &[T(K::True)]),
    alt(A::CollapseOne, &[T(K::False)]),
    alt(A::CollapseOne, &[T(K::String)]),
    alt(A::CollapseOne, &[R(Rule::Number)]),
    alt(A::Postfix, &[T(K::Ident), T(K::IsNull)]),
    alt(A::Postfix, &[T(K::Ident), T(K::IsNotNull)]),
    alt(
        A::BinaryList,
        &[
            T(K::Ident),
            T(K::NotIn),
            T(K::LParen),
            R(Rule::StringList),
            T(K::RParen),
        ],
    ),
    alt(
        A::BinaryList,
        &[
            T(K::Ident),
            T(K::In),
            T(K::LParen),
            R(Rule::StringList),
            T(K::RParen),
        ],
    ),
    alt(A::Binary, &[T(K::Ident), T(K::NotLike), R(Rule::Pattern)]),
    alt(A::Binary, &[T(K::Ident), T(K::Like), R(Rule::Pattern)]),
    alt(A::CollapseOne, &[T(K::Ident)]),
];

const PATTERN: &[Alternative] = &[
    alt(A::Pattern, &[T(K::String), T(K::Escape), T(K::String)]),
    alt(A::Pattern, &[T(K::String)]),
];

const STRING_LIST: &[Alternative] = &[
    alt(A::ListJoin, &[T(K::String), T(K::Comma), R(Rule::StringList)]),
    alt(A::ListStart, &[T(K::String)]),
];

const NUMBER: &[Alternative] = &[
    alt(A::CollapseOne, &[T(K::Hex)]),
    alt(A::CollapseOne, &[T(K::Float)]),
    alt(A::CollapseOne, &[T(K::Int)]),
];

impl Rule {
    /// Root of the grammar.
    pub const ROOT: Rule = Rule::Expr;

    /// Every rule, for table checks.
    pub const ALL: [Rule; 16] = [
        Rule::Expr,
        Rule::OrExpr,
        Rule::AndExpr,
        Rule::NotExpr,
        Rule::CmpExpr,
        Rule::CmpOp,
        Rule::Arith,
        Rule::PlusExpr,
        Rule::AddOp,
        Rule::MultExpr,
        Rule::MulOp,
        Rule::SignExpr,
        Rule::Simple,
        Rule::Pattern,
        Rule::StringList,
        Rule::Number,
    ];

    /// Alternatives in the order they are tried.
    pub fn alternatives(self) -> &'static [Alternative] {
        match self {
            Rule::Expr => EXPR,
            Rule::OrExpr => OR_EXPR,
            Rule::AndExpr => AND_EXPR,
            Rule::NotExpr => NOT_EXPR,
            Rule::CmpExpr => CMP_EXPR,
            Rule::CmpOp => CMP_OP,
            Rule::Arith => ARITH,
            Rule::PlusExpr => PLUS_EXPR,
            Rule::AddOp => ADD_OP,
            Rule::MultExpr => MULT_EXPR,
            Rule::MulOp => MUL_OP,
            Rule::SignExpr => SIGN_EXPR,
            Rule::Simple => SIMPLE,
            Rule::Pattern => PATTERN,
            Rule::StringList => STRING_LIST,
            Rule::Number => NUMBER,
        }
    }
}

#[test]
fn test_action_arity_matches_terms() {
    for rule in Rule::ALL {
        for alternative in rule.alternatives() {
            if let Some(arity) = alternative.action.arity() {
                assert_eq!(
                    arity,
                    alternative.terms.len(),
                    "{:?} alternative {:?}",
                    rule,
                    alternative.terms
                );
            }
        }
    }
}

#[test]
fn test_longer_alternatives_come_first() {
    for rule in Rule::ALL {
        let alts = rule.alternatives();
        for (i, earlier) in alts.iter().enumerate() {
            for later in &alts[i + 1..] {
                let is_strict_prefix = earlier.terms.len() < later.terms.len()
                    && later.terms.starts_with(earlier.terms);
                assert!(
                    !is_strict_prefix,
                    "{:?}: {:?} shadows {:?}",
                    rule,
                    earlier.terms,
                    later.terms
                );
            }
        }
    }
}
