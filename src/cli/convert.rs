//! JSON -> selector input conversion utilities

use crate::{ExprType, IdentifierTypes, Properties};
use super::CliError;

/// Parse a JSON object of scalars into message properties
pub fn json_to_properties(json: &str) -> Result<Properties, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Properties::from_json(&value).map_err(CliError::InvalidProperties)
}

/// Parse a JSON object of type names into identifier type hints
pub fn json_to_types(json: &str) -> Result<IdentifierTypes, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(members) = value else {
        return Err(CliError::InvalidTypes("type hints must be a JSON object".to_string()));
    };

    let mut hints = IdentifierTypes::new();
    for (name, ty) in members {
        let ty = ty
            .as_str()
            .and_then(ExprType::from_name)
            .ok_or_else(|| CliError::InvalidTypes(format!("unknown type for `{}`: {}", name, ty)))?;
        hints.insert(name, ty);
    }
    Ok(hints)
}
