pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod grammar;
pub mod lexer;
pub mod like;
pub mod parser;
pub mod printer;
pub mod program;
pub mod properties;
pub mod selector;
pub mod stream;
pub mod typecheck;
pub mod value;

pub use ast::{ExprType, IdentifierTypes, Node, NodeId, NodeKind, Token, TokenKind, TokenValue};
pub use compiler::compile;
pub use error::{
    CompileError, InternalError, LexError, ParseError, ProgramError, SelectorError, TypeError,
};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, parse};
pub use program::{Program, Term};
pub use properties::{Properties, PropertySource};
pub use selector::Selector;
pub use typecheck::{TypeChecker, TypeTable};
pub use value::{Number, Value};
