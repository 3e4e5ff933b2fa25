//! Response decoder module
//!
//! Supports: JSON pages, CSV pages
//!
//! # Overview
//!
//! Each decoder turns one raw page body into a typed page. JSON pages yield
//! records plus the `pagination.next` marker; CSV pages yield a trimmed text
//! chunk with the repeated header removed after the first page.

mod decoders;
mod types;

pub use decoders::{CsvPageDecoder, JsonPageDecoder};
pub use types::{CsvPage, JsonPage, PageDecoder};
