use std::{collections::HashMap, fmt};

/// Static type of a subexpression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExprType {
    /// Not computed yet
    #[default]
    NotSet,
    Bool,
    String,
    /// Numeric, integer or floating point
    Arith,
    /// Type of an identifier with no hint; unifies with anything
    Any,
    /// Right operand of `IN` / `NOT IN`
    List,
    /// A type error somewhere at or below this node
    Invalid,
}

impl ExprType {
    /// True if a value of this type may be used where `wanted` is expected.
    ///
    /// `Any` is compatible with everything; `Invalid` and `NotSet` with nothing.
    pub fn is_compatible(self, wanted: ExprType) -> bool {
        match self {
            ExprType::Any => true,
            ExprType::Invalid | ExprType::NotSet => false,
            ty => ty == wanted,
        }
    }

    /// Parses a type hint name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(ExprType::Bool),
            "string" | "str" => Some(ExprType::String),
            "arith" | "number" | "numeric" => Some(ExprType::Arith),
            "any" => Some(ExprType::Any),
            _ => None,
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprType::NotSet => "not-set",
            ExprType::Bool => "bool",
            ExprType::String => "string",
            ExprType::Arith => "arith",
            ExprType::Any => "any",
            ExprType::List => "list",
            ExprType::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Caller-supplied type hints for identifiers. Names that are absent are `Any`.
pub type IdentifierTypes = HashMap<String, ExprType>;
