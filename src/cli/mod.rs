//! CLI support for selector-lang
//!
//! Provides programmatic access to the `selector` commands so they can be
//! embedded in other tools.

mod check;
mod convert;
mod docs;

pub use check::{
    execute_check, execute_compile, execute_eval, execute_run, execute_tokens, CheckOptions,
    CheckResult, EvalOptions, RunOptions,
};
pub use convert::{json_to_properties, json_to_types};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Selector rejected while building
    Selector(crate::SelectorError),
    /// Selector evaluation hit an internal error
    Internal(crate::InternalError),
    /// Term program could not be generated
    Compile(crate::CompileError),
    /// Term program could not be read or run
    Program(crate::ProgramError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Properties JSON has the wrong shape
    InvalidProperties(String),
    /// Type hints JSON has the wrong shape
    InvalidTypes(String),
    /// Unknown documentation category
    UnknownCategory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Selector(e) => write!(f, "Invalid selector: {}", e),
            CliError::Internal(e) => write!(f, "Evaluation failed: {}", e),
            CliError::Compile(e) => write!(f, "Compilation failed: {}", e),
            CliError::Program(e) => write!(f, "Invalid program: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Use --input or pipe JSON to stdin."),
            CliError::InvalidProperties(msg) => write!(f, "Invalid properties: {}", msg),
            CliError::InvalidTypes(msg) => write!(f, "Invalid type hints: {}", msg),
            CliError::UnknownCategory(c) => {
                write!(
                    f,
                    "Unknown category: '{}'\nRun 'selector docs' to see available categories.",
                    c
                )
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Selector(e) => Some(e),
            CliError::Internal(e) => Some(e),
            CliError::Compile(e) => Some(e),
            CliError::Program(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::SelectorError> for CliError {
    fn from(e: crate::SelectorError) -> Self {
        CliError::Selector(e)
    }
}

impl From<crate::InternalError> for CliError {
    fn from(e: crate::InternalError) -> Self {
        CliError::Internal(e)
    }
}

impl From<crate::CompileError> for CliError {
    fn from(e: crate::CompileError) -> Self {
        CliError::Compile(e)
    }
}

impl From<crate::ProgramError> for CliError {
    fn from(e: crate::ProgramError) -> Self {
        CliError::Program(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
