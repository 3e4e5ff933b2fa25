//! Decoder implementations
//!
//! One decoder per response encoding.

use super::types::{CsvPage, JsonPage, PageDecoder};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};

// ============================================================================
// JSON Page Decoder
// ============================================================================

/// Decoder for structured pages
///
/// Expects `{"data": [...], "pagination": {"next": ...}}`. The `next` key
/// must be present even when null.
#[derive(Debug, Clone, Default)]
pub struct JsonPageDecoder;

impl JsonPageDecoder {
    /// Create a new JSON page decoder
    pub fn new() -> Self {
        Self
    }
}

impl PageDecoder for JsonPageDecoder {
    type Page = JsonPage;

    fn decode(&self, body: &[u8], page_number: u32) -> Result<JsonPage> {
        let value: JsonValue = serde_json::from_slice(body).map_err(|e| {
            Error::decode(format!("Failed to parse JSON on page {page_number}: {e}"))
        })?;

        let JsonValue::Object(mut root) = value else {
            return Err(Error::schema(format!(
                "page {page_number} is not a JSON object"
            )));
        };

        let data = root
            .remove("data")
            .ok_or_else(|| Error::schema(format!("page {page_number} has no 'data' field")))?;
        let JsonValue::Array(items) = data else {
            return Err(Error::schema(format!(
                "'data' on page {page_number} is not a list"
            )));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                JsonValue::Object(record) => Ok(record),
                _ => Err(Error::schema(format!(
                    "record {i} on page {page_number} is not an object"
                ))),
            })
            .collect::<Result<Vec<Record>>>()?;

        let next = match root.remove("pagination") {
            Some(JsonValue::Object(mut pagination)) => {
                pagination.remove("next").ok_or_else(|| {
                    Error::schema(format!("page {page_number} has no 'pagination.next' field"))
                })?
            }
            Some(_) => {
                return Err(Error::schema(format!(
                    "'pagination' on page {page_number} is not an object"
                )))
            }
            None => {
                return Err(Error::schema(format!(
                    "page {page_number} has no 'pagination' field"
                )))
            }
        };

        Ok(JsonPage { records, next })
    }
}

// ============================================================================
// CSV Page Decoder
// ============================================================================

/// Decoder for CSV pages
///
/// Every page repeats the header row; all but the first page drop it so the
/// merged text carries a single header.
#[derive(Debug, Clone, Default)]
pub struct CsvPageDecoder;

impl CsvPageDecoder {
    /// Create a new CSV page decoder
    pub fn new() -> Self {
        Self
    }
}

impl PageDecoder for CsvPageDecoder {
    type Page = CsvPage;

    fn decode(&self, body: &[u8], page_number: u32) -> Result<CsvPage> {
        let text = std::str::from_utf8(body).map_err(|e| {
            Error::decode(format!("CSV page {page_number} is not valid UTF-8: {e}"))
        })?;

        let text = if page_number > 1 {
            strip_header(text)
        } else {
            text
        };

        Ok(CsvPage {
            chunk: text.trim().to_string(),
        })
    }
}

/// Everything after the first line; empty if there is only one line
fn strip_header(text: &str) -> &str {
    text.split_once('\n').map_or("", |(_, rest)| rest)
}
