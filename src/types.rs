//! Common types used throughout ukcovid-fetch
//!
//! Query inputs (filters, structure, output format) and the aggregate
//! dataset returned by a fetch.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use url::Url;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A single record returned by the API in JSON mode
pub type Record = JsonObject;

/// Fixed endpoint of the coronavirus dashboard data API
pub const DEFAULT_ENDPOINT: &str = "https://api.coronavirus.data.gov.uk/v1/data";

// ============================================================================
// Filters
// ============================================================================

/// Ordered set of API filter expressions, e.g. `areaType=nation`
///
/// Serialized into a single `filters` query parameter joined with `;`.
/// Filter semantics are validated by the remote API, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(Vec<String>);

impl Filters {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter expression
    #[must_use]
    pub fn with(mut self, filter: impl Into<String>) -> Self {
        self.0.push(filter.into());
        self
    }

    /// Value of the `filters` query parameter
    pub fn joined(&self) -> String {
        self.0.join(";")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Filters {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for Filters {
    fn from(filters: Vec<S>) -> Self {
        filters.into_iter().collect()
    }
}

// ============================================================================
// Structure
// ============================================================================

/// Field layout requested from the API
///
/// Maps each output field name either to a metric path (a string) or to a
/// nested structure of the same shape. Key order is kept as inserted and is
/// reflected in the serialized parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JsonObject", into = "JsonObject")]
pub struct Structure(JsonObject);

impl Structure {
    /// Create an empty structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field mapped to a metric path
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.0.insert(name.into(), JsonValue::String(path.into()));
        self
    }

    /// Add a nested group of fields
    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, inner: Structure) -> Self {
        self.0.insert(name.into(), JsonValue::Object(inner.0));
        self
    }

    /// Build a structure from an arbitrary JSON value, checking its shape
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Self::try_from(map),
            other => Err(Error::invalid_structure(format!(
                "expected a mapping, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Compact JSON encoding used for the `structure` query parameter
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<JsonObject> for Structure {
    type Error = Error;

    fn try_from(map: JsonObject) -> Result<Self> {
        validate_structure(&map, "")?;
        Ok(Self(map))
    }
}

impl From<Structure> for JsonObject {
    fn from(structure: Structure) -> Self {
        structure.0
    }
}

fn validate_structure(map: &JsonObject, prefix: &str) -> Result<()> {
    for (key, value) in map {
        let field = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            JsonValue::String(_) => {}
            JsonValue::Object(inner) => validate_structure(inner, &field)?,
            other => {
                return Err(Error::invalid_structure(format!(
                    "field '{field}' must be a string or a mapping, got {}",
                    json_kind(other)
                )))
            }
        }
    }
    Ok(())
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "mapping",
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// Response encoding requested from the API
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured records
    #[default]
    Json,
    /// Delimited text with a header row
    Csv,
}

impl OutputFormat {
    /// Pick the format from an `as_csv` flag
    pub fn from_csv_flag(as_csv: bool) -> Self {
        if as_csv {
            Self::Csv
        } else {
            Self::Json
        }
    }

    /// Value of the `format` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Dataset Query
// ============================================================================

/// Everything needed to request one dataset, minus the page number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetQuery {
    pub filters: Filters,
    pub structure: Structure,
    #[serde(default)]
    pub format: OutputFormat,
}

impl DatasetQuery {
    pub fn new(filters: Filters, structure: Structure, format: OutputFormat) -> Self {
        Self {
            filters,
            structure,
            format,
        }
    }

    /// Query parameters for the given page
    pub fn params(&self, page: u32) -> Result<HashMap<String, String>> {
        let mut params = HashMap::new();
        params.insert("filters".to_string(), self.filters.joined());
        params.insert("structure".to_string(), self.structure.to_compact_json()?);
        params.insert("format".to_string(), self.format.as_str().to_string());
        params.insert("page".to_string(), page.to_string());
        Ok(params)
    }

    /// Full request URL for the given page
    pub fn request_url(&self, endpoint: &str, page: u32) -> Result<Url> {
        let structure = self.structure.to_compact_json()?;
        let page = page.to_string();
        let url = Url::parse_with_params(
            endpoint,
            [
                ("filters", self.filters.joined().as_str()),
                ("structure", structure.as_str()),
                ("format", self.format.as_str()),
                ("page", page.as_str()),
            ],
        )?;
        Ok(url)
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Aggregate result of a full fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// All records from every page, in page order
    Records(Vec<Record>),
    /// First page header followed by every page's rows
    Csv(String),
}

impl Dataset {
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Records(_) => OutputFormat::Json,
            Self::Csv(_) => OutputFormat::Csv,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Records(records) => records.is_empty(),
            Self::Csv(text) => text.is_empty(),
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Self::Records(records) => Some(records),
            Self::Csv(_) => None,
        }
    }

    pub fn as_csv(&self) -> Option<&str> {
        match self {
            Self::Csv(text) => Some(text),
            Self::Records(_) => None,
        }
    }

    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Self::Records(records) => Some(records),
            Self::Csv(_) => None,
        }
    }

    pub fn into_csv(self) -> Option<String> {
        match self {
            Self::Csv(text) => Some(text),
            Self::Records(_) => None,
        }
    }

    /// Write the dataset: records as a pretty JSON array, CSV verbatim
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        match self {
            Self::Records(records) => {
                serde_json::to_writer_pretty(&mut writer, records)?;
            }
            Self::Csv(text) => writer.write_all(text.as_bytes())?,
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset::Records(records)
    }
}

impl From<String> for Dataset {
    fn from(text: String) -> Self {
        Dataset::Csv(text)
    }
}
