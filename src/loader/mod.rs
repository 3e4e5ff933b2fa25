//! Query definition loader
//!
//! Parse saved dataset queries from YAML (or JSON) files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `QueryDefinition` - filters, structure and format in one document
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_query, load_query_from_str};
pub use types::QueryDefinition;
