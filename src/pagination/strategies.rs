//! Merge strategy implementations
//!
//! Each strategy handles one response encoding.

use super::types::{NextPage, PageMerger, FIRST_PAGE};
use crate::decode::{CsvPageDecoder, JsonPageDecoder, PageDecoder};
use crate::error::Result;
use crate::types::{OutputFormat, Record};
use tracing::trace;

// ============================================================================
// Record Merger
// ============================================================================

/// Accumulates JSON records across pages
///
/// Stops as soon as a page carries an empty `pagination.next`.
#[derive(Debug, Clone, Default)]
pub struct RecordMerger {
    decoder: JsonPageDecoder,
    records: Vec<Record>,
}

impl RecordMerger {
    /// Create a new record merger
    pub fn new() -> Self {
        Self::default()
    }

    /// Records merged so far
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl PageMerger for RecordMerger {
    type Output = Vec<Record>;

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn merge(&mut self, page_number: u32, body: &[u8]) -> Result<NextPage> {
        let page = self.decoder.decode(body, page_number)?;
        let has_next = page.has_next();
        trace!(page_number, records = page.records.len(), has_next, "Merging JSON page");

        self.records.extend(page.records);

        if has_next {
            Ok(NextPage::Continue)
        } else {
            Ok(NextPage::Done)
        }
    }

    fn item_count(&self) -> u64 {
        self.records.len() as u64
    }

    fn finish(self) -> Vec<Record> {
        self.records
    }
}

// ============================================================================
// CSV Merger
// ============================================================================

/// Accumulates CSV text chunks across pages
///
/// CSV pages carry no continuation marker, so every page continues and only
/// a 204 response ends the loop. The first page's header is the only one
/// kept; chunks are joined with `\n`.
#[derive(Debug, Clone, Default)]
pub struct CsvMerger {
    decoder: CsvPageDecoder,
    chunks: Vec<String>,
    rows: u64,
}

impl CsvMerger {
    /// Create a new CSV merger
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks merged so far, one per page
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }
}

impl PageMerger for CsvMerger {
    type Output = String;

    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn merge(&mut self, page_number: u32, body: &[u8]) -> Result<NextPage> {
        let page = self.decoder.decode(body, page_number)?;

        // The first page's line count includes its header.
        let lines = page.line_count() as u64;
        let rows = if page_number == FIRST_PAGE {
            lines.saturating_sub(1)
        } else {
            lines
        };
        trace!(page_number, rows, "Merging CSV page");

        self.rows += rows;
        self.chunks.push(page.chunk);
        Ok(NextPage::Continue)
    }

    fn item_count(&self) -> u64 {
        self.rows
    }

    fn finish(self) -> String {
        self.chunks.join("\n")
    }
}
