//! Pagination module
//!
//! Supports: JSON record pages, CSV text pages
//!
//! # Overview
//!
//! Pages are requested by number starting at 1. Each response encoding has
//! its own merge strategy, chosen once when a fetch starts:
//!
//! - [`RecordMerger`] appends every page's records and stops when
//!   `pagination.next` is empty
//! - [`CsvMerger`] keeps the first header, strips it from later pages and
//!   keeps going until the server answers 204

mod strategies;
mod types;

pub use strategies::{CsvMerger, RecordMerger};
pub use types::{EndReason, NextPage, PageMerger, PaginationState, FIRST_PAGE};
