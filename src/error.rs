//! Error taxonomy of the selector engine.
//!
//! Lexical, syntax and type errors mean the selector text is bad and the
//! caller should reject it. [`InternalError`] means the grammar and a tree
//! pass disagree, which is a defect in this crate rather than in the input.

use thiserror::Error;

use crate::ast::ExprType;

/// Input that no token pattern matches.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unrecognized input at offset {offset}: `{residue}`")]
pub struct LexError {
    /// Char offset of the first unmatched character
    pub offset: usize,
    /// Unconsumed remainder of the input
    pub residue: String,
}

/// Token sequence that the grammar does not accept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No alternative of the root rule matches.
    #[error("syntax error at token {position} (offset {offset}): unexpected {found}")]
    NoMatch {
        /// Index of the furthest token the parser reached
        position: usize,
        /// Char offset of that token, or the input length at end of input
        offset: usize,
        /// Text of that token, or `end of input`
        found: String,
    },

    /// The root rule matched but tokens are left over.
    #[error("syntax error at token {position} (offset {offset}): unexpected trailing `{found}`")]
    TrailingTokens {
        position: usize,
        offset: usize,
        found: String,
    },

    /// Rule nesting exceeded [`crate::parser::MAX_RULE_DEPTH`].
    #[error("selector nested too deeply at token {position} (offset {offset})")]
    TooDeep { position: usize, offset: usize },

    /// Empty selector text.
    #[error("empty selector")]
    Empty,
}

/// Selector whose root is not boolean.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("type error: selector has type {found}{}", describe_culprit(.culprit))]
pub struct TypeError {
    /// Type computed for the root
    pub found: ExprType,
    /// The innermost subexpression typed `Invalid`, re-printed
    pub culprit: Option<String>,
}

fn describe_culprit(culprit: &Option<String>) -> String {
    match culprit {
        Some(expr) => format!(", invalid subexpression `{}`", expr),
        None => String::new(),
    }
}

/// A tree shape the grammar should never produce reached a tree pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("internal error: {0}")]
pub struct InternalError(pub String);

impl InternalError {
    pub fn new(msg: impl Into<String>) -> Self {
        InternalError(msg.into())
    }
}

/// Failure to generate a term program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// A literal the term encoding cannot express.
    #[error("cannot encode literal `{0}`")]
    UnsupportedLiteral(String),
}

/// Failure to read a term program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    #[error("malformed program at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("unknown term `{0}`")]
    UnknownTerm(String),

    #[error("invalid LIKE pattern: {0}")]
    Pattern(String),
}

/// Any failure while turning selector text into a [`crate::Selector`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl SelectorError {
    /// True when the error is a defect in this crate, not a bad selector.
    pub fn is_internal(&self) -> bool {
        matches!(self, SelectorError::Internal(_))
    }
}
