//! Loader types
//!
//! Declarative dataset query definition for YAML parsing.

use crate::types::{DatasetQuery, Filters, OutputFormat, Structure};
use serde::{Deserialize, Serialize};

/// A saved dataset query
///
/// ```yaml
/// name: nation-cases
/// filters:
///   - areaType=nation
/// structure:
///   date: date
///   newCases: newCasesByPublishDate
/// format: csv
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryDefinition {
    /// Optional label used in logs
    #[serde(default)]
    pub name: Option<String>,
    /// Filter expressions, joined with `;` on the wire
    pub filters: Filters,
    /// Requested field layout
    pub structure: Structure,
    /// Response encoding (defaults to json)
    #[serde(default)]
    pub format: OutputFormat,
}

impl QueryDefinition {
    /// Convert into a dataset query, optionally overriding the format
    pub fn into_query(self, format: Option<OutputFormat>) -> DatasetQuery {
        DatasetQuery::new(self.filters, self.structure, format.unwrap_or(self.format))
    }
}
