//! YAML parser for query definitions
//!
//! Parses and validates query files. JSON documents are accepted too since
//! they are valid YAML.

use crate::error::{Error, Result, ResultExt};
use crate::loader::types::QueryDefinition;
use std::fs;
use std::path::Path;

/// Load a query definition from a file path
pub fn load_query(path: impl AsRef<Path>) -> Result<QueryDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file '{}'", path.display()))?;
    load_query_from_str(&content)
}

/// Load a query definition from a YAML string
pub fn load_query_from_str(yaml: &str) -> Result<QueryDefinition> {
    let def: QueryDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse query YAML: {e}")))?;

    validate_query(&def)?;
    Ok(def)
}

/// Validate a query definition
fn validate_query(def: &QueryDefinition) -> Result<()> {
    if let Some(name) = &def.name {
        if name.trim().is_empty() {
            return Err(Error::config("Query name cannot be empty"));
        }
    }

    if def.filters.is_empty() {
        return Err(Error::config("Query must have at least one filter"));
    }

    if let Some(pos) = def.filters.iter().position(|f| f.trim().is_empty()) {
        return Err(Error::config(format!("Filter {} is empty", pos + 1)));
    }

    if def.structure.is_empty() {
        return Err(Error::config("Query structure must name at least one field"));
    }

    Ok(())
}
