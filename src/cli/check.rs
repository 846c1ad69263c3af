//! Check, evaluate and compile selectors

use crate::{ExprType, IdentifierTypes, Lexer, Program, Selector};
use super::{json_to_properties, json_to_types, CliError};

/// Options for the check and compile commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The selector expression
    pub expr: String,
    /// JSON object mapping identifiers to type names
    pub types: Option<String>,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// `bool`, or `any` when the result depends on unhinted identifiers
    pub root_type: ExprType,
    /// Fully parenthesized re-print
    pub canonical: String,
}

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The selector expression
    pub expr: String,
    /// JSON object of message properties
    pub input: Option<String>,
    /// JSON object mapping identifiers to type names
    pub types: Option<String>,
}

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// A compiled term program
    pub program: String,
    /// JSON object of message properties
    pub input: Option<String>,
}

fn build(expr: &str, types: Option<&str>) -> Result<Selector, CliError> {
    let hints = match types {
        Some(json) => json_to_types(json)?,
        None => IdentifierTypes::new(),
    };
    Ok(Selector::with_types(expr, &hints)?)
}

/// Lists the tokens of `expr`, one per line, followed by any residue.
pub fn execute_tokens(expr: &str) -> Vec<String> {
    let run = Lexer::new(expr).tokenize();
    let mut lines: Vec<String> = run.tokens.iter().map(|t| t.to_string()).collect();
    if !run.is_complete() {
        lines.push(format!("residue `{}` at {}", run.residue, run.residue_offset));
    }
    lines
}

/// Parses and type checks a selector
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let selector = build(&options.expr, options.types.as_deref())?;
    Ok(CheckResult {
        root_type: selector.root_type(),
        canonical: selector.canonical(),
    })
}

/// Evaluates a selector against one message
pub fn execute_eval(options: &EvalOptions) -> Result<bool, CliError> {
    let selector = build(&options.expr, options.types.as_deref())?;
    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let props = json_to_properties(json)?;
    Ok(selector.matches(&props)?)
}

/// Generates the term program of a selector
pub fn execute_compile(options: &CheckOptions) -> Result<String, CliError> {
    let selector = build(&options.expr, options.types.as_deref())?;
    Ok(selector.compile()?)
}

/// Runs a compiled term program against one message
pub fn execute_run(options: &RunOptions) -> Result<bool, CliError> {
    let program = Program::parse(&options.program)?;
    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let props = json_to_properties(json)?;
    Ok(program.evaluate(&props)?)
}
