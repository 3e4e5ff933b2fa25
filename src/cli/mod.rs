//! CLI module
//!
//! Command-line interface for fetching datasets.
//!
//! # Commands
//!
//! - `fetch` - Fetch every page and print the combined dataset
//! - `url` - Print the request URL for a page
//! - `validate` - Check a query definition file

mod commands;
mod runner;

pub use commands::{Cli, Commands, QueryArgs};
pub use runner::{build_query, Runner};
