//! # ukcovid-fetch
//!
//! Fetch a complete dataset from the paginated UK coronavirus dashboard API
//! and return it as one result: either every JSON record in page order, or
//! a single CSV text with one header row.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ukcovid_fetch::{get_paginated_dataset, Structure};
//!
//! #[tokio::main]
//! async fn main() -> ukcovid_fetch::Result<()> {
//!     let structure = Structure::new()
//!         .field("date", "date")
//!         .field("newCases", "newCasesByPublishDate");
//!
//!     let dataset = get_paginated_dataset(vec!["areaType=nation"], structure, false).await?;
//!     println!("{} records", dataset.as_records().map_or(0, <[_]>::len));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │              Fetcher: page 1, 2, 3, ... until end         │
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴──────────┬──────────────────┐
//! │     HTTP     │         Decode          │     Paginate     │
//! ├──────────────┼─────────────────────────┼──────────────────┤
//! │ GET + 10s    │ JSON: data + next       │ RecordMerger     │
//! │ >=400 fails  │ CSV: strip later header │ CsvMerger        │
//! │ 204 = end    │                         │                  │
//! └──────────────┴─────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Query inputs and the aggregate dataset
pub mod types;

/// HTTP client for single page requests
pub mod http;

/// Page body decoders (JSON, CSV)
pub mod decode;

/// Merge strategies and pagination state
pub mod pagination;

/// The paginated fetch loop
pub mod fetcher;

/// Client settings from environment and flags
pub mod config;

/// YAML loader for query definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use fetcher::{
    get_paginated_dataset, get_paginated_dataset_blocking,
    get_paginated_dataset_blocking_with_endpoint, get_paginated_dataset_with_endpoint,
    FetchStats, Fetcher,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
