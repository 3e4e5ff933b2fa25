//! Pagination types and traits
//!
//! Defines the merge abstraction shared by the JSON and CSV strategies.

use crate::error::Result;
use crate::types::{Dataset, OutputFormat};

/// First page number requested from the API
pub const FIRST_PAGE: u32 = 1;

/// Result of merging one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request the following page
    Continue,
    /// The page announced it is the last one
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Why the pagination loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The server answered 204 No Content
    NoContent,
    /// A JSON page carried an empty `pagination.next`
    NextEmpty,
}

/// Tracks pagination state during one fetch
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// Page number of the next request
    pub page: u32,
    /// Pages whose content has been merged
    pub pages_merged: u32,
    /// Records or CSV rows merged so far
    pub items_merged: u64,
    /// Set once the loop has terminated
    pub end: Option<EndReason>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            pages_merged: 0,
            items_merged: 0,
            end: None,
        }
    }
}

impl PaginationState {
    /// Create a new pagination state starting at page 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a merged page
    pub fn record_page(&mut self, items: u64) {
        self.pages_merged += 1;
        self.items_merged += items;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Mark pagination as complete
    pub fn finish(&mut self, reason: EndReason) {
        self.end = Some(reason);
    }

    /// Is pagination complete?
    pub fn is_done(&self) -> bool {
        self.end.is_some()
    }
}

/// Strategy for folding page bodies into one result
///
/// A merger is created fresh for each fetch and consumed by `finish`.
pub trait PageMerger: Send {
    /// Aggregate produced once pagination ends
    type Output: Into<Dataset>;

    /// Response encoding this merger expects
    fn format(&self) -> OutputFormat;

    /// Merge the body of page `page_number` and decide whether to continue
    fn merge(&mut self, page_number: u32, body: &[u8]) -> Result<NextPage>;

    /// Records or rows merged so far
    fn item_count(&self) -> u64;

    /// Produce the aggregate
    fn finish(self) -> Self::Output;
}
