//! # Selector Language - Syntax Tree
//!
//! This module defines the tokens, parse tree and static types of the selector
//! language, a SQL-92 flavoured boolean filter used to decide whether a
//! message is delivered to a consumer.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the tokenizer
//! - **[node]** - Parse tree nodes built by the grammar engine
//! - **[types]** - Expression types assigned by the type checker
//!
//! ## Quick Start
//!
//! ```text
//! JMSType = 'order' AND (priority > 3 OR region IN ('EU', 'US'))
//! ```
//!
//! Delivers orders that are either urgent or bound for Europe or the US.
//!
//! ## Core Concepts
//!
//! ### Three-valued logic
//!
//! Every subexpression is `true`, `false` or `UNKNOWN`. A property missing
//! from the message is `UNKNOWN`, and so is any comparison that involves one.
//! A message matches only when the whole selector is `true`.
//!
//! ### Types
//!
//! Literals have fixed types (`Bool`, `String`, `Arith`). Identifiers are
//! `Any` unless the caller supplies a hint, and `Any` unifies with every
//! other type, so a selector over unknown properties is accepted and settled
//! at evaluation time.
//!
//! ### Operator precedence
//!
//! Lowest to highest: `OR`, `AND`, `NOT`, comparisons (`=`, `<>`, `<`, `<=`,
//! `>`, `>=`, `BETWEEN`), `+`/`-`, `*`/`/`, unary sign. Binary operators
//! group to the right.
//!
//! ## Examples
//!
//! ```text
//! size BETWEEN 1 AND 0x10
//! name LIKE 'acme\_%' ESCAPE '\'
//! discount IS NOT NULL AND NOT expired
//! ```
pub mod node;
pub mod tokens;
pub mod types;

pub use node::{Node, NodeId, NodeKind};
pub use tokens::{Token, TokenKind, TokenValue};
pub use types::{ExprType, IdentifierTypes};
