//! CLI commands and argument parsing

use crate::types::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fetch complete datasets from the UK coronavirus dashboard API
#[derive(Parser, Debug)]
#[command(name = "ukcovid-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data endpoint (overrides UKCOVID_API_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds (overrides UKCOVID_API_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and print the combined dataset
    Fetch {
        #[command(flatten)]
        query: QueryArgs,

        /// Write the dataset to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the request URL for a page without sending it
    Url {
        #[command(flatten)]
        query: QueryArgs,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Validate a query definition file
    Validate {
        /// Query definition file (YAML or JSON)
        query: PathBuf,
    },
}

/// Arguments describing the dataset to request
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Query definition file (YAML or JSON)
    #[arg(short, long)]
    pub query: Option<PathBuf>,

    /// Filter expression, e.g. areaType=nation (repeatable)
    #[arg(short = 'F', long = "filter")]
    pub filters: Vec<String>,

    /// Structure as a JSON mapping, e.g. '{"date":"date"}'
    #[arg(short, long)]
    pub structure: Option<String>,

    /// Response format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}
