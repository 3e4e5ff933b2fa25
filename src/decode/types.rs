//! Decoder types and traits
//!
//! Defines the decoded page shapes and the decoder trait.

use crate::error::Result;
use crate::types::{JsonValue, Record};

/// A decoded structured page
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPage {
    /// Records from the page's `data` field, in order
    pub records: Vec<Record>,
    /// Raw value of `pagination.next`
    pub next: JsonValue,
}

impl JsonPage {
    /// Whether the server announced a further page
    ///
    /// `null`, `false`, zero, and empty strings, arrays or mappings all
    /// mean there is no next page.
    pub fn has_next(&self) -> bool {
        !is_empty_marker(&self.next)
    }
}

pub(crate) fn is_empty_marker(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}

/// A decoded CSV page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPage {
    /// Page text with surrounding whitespace trimmed, header removed unless
    /// this is the first page
    pub chunk: String,
}

impl CsvPage {
    /// Number of non-empty lines in the chunk
    pub fn line_count(&self) -> usize {
        self.chunk.lines().filter(|l| !l.trim().is_empty()).count()
    }
}

/// Trait for decoding one page body
pub trait PageDecoder: Send + Sync {
    /// Decoded page type
    type Page;

    /// Decode the raw body of page `page_number` (1-based)
    fn decode(&self, body: &[u8], page_number: u32) -> Result<Self::Page>;
}
