//! Fetcher types
//!
//! Statistics reported alongside a fetched dataset.

use crate::pagination::{EndReason, PaginationState};
use crate::types::OutputFormat;

/// Statistics from one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStats {
    /// Response encoding that was requested
    pub format: OutputFormat,
    /// Requests sent, including the terminating 204 if any
    pub requests: u32,
    /// Pages whose content was merged
    pub pages_merged: u32,
    /// Records (JSON) or data rows (CSV) merged
    pub items: u64,
    /// How pagination ended
    pub end: EndReason,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl FetchStats {
    pub(crate) fn from_state(
        format: OutputFormat,
        state: &PaginationState,
        end: EndReason,
        duration_ms: u64,
    ) -> Self {
        Self {
            format,
            requests: state.page,
            pages_merged: state.pages_merged,
            items: state.items_merged,
            end,
            duration_ms,
        }
    }
}
