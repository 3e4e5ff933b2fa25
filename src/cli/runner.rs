//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, QueryArgs};
use crate::config::FetchSettings;
use crate::error::{Error, Result, ResultExt};
use crate::fetcher::Fetcher;
use crate::http::HttpClientConfig;
use crate::loader::load_query;
use crate::types::{DatasetQuery, Filters, JsonValue, Structure};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch { query, output } => self.fetch(query, output.as_deref()).await,
            Commands::Url { query, page } => self.url(query, *page),
            Commands::Validate { query } => self.validate(query),
        }
    }

    /// Client configuration from the environment and global flags
    fn client_config(&self) -> Result<HttpClientConfig> {
        let flags = FetchSettings {
            endpoint: self.cli.endpoint.clone(),
            timeout_secs: self.cli.timeout,
        };
        FetchSettings::from_env()?.merge(flags).into_client_config()
    }

    /// Fetch the dataset and write it out
    async fn fetch(&self, args: &QueryArgs, output: Option<&Path>) -> Result<()> {
        let query = build_query(args)?;
        let fetcher = Fetcher::with_config(self.client_config()?)?;

        let (dataset, stats) = fetcher.fetch_with_stats(&query).await?;
        info!(
            requests = stats.requests,
            items = stats.items,
            end = ?stats.end,
            "Dataset assembled"
        );

        match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create '{}'", path.display()))?;
                dataset
                    .write_to(BufWriter::new(file))
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
                info!("Wrote {}", path.display());
            }
            None => dataset.write_to(io::stdout().lock())?,
        }

        Ok(())
    }

    /// Print the request URL for one page
    fn url(&self, args: &QueryArgs, page: u32) -> Result<()> {
        if page == 0 {
            return Err(Error::config("Pages are numbered from 1"));
        }
        let query = build_query(args)?;
        let config = self.client_config()?;
        println!("{}", query.request_url(&config.endpoint, page)?);
        Ok(())
    }

    /// Validate a query definition file
    fn validate(&self, path: &Path) -> Result<()> {
        let def = load_query(path)?;
        println!(
            "Query '{}' is valid: {} filter(s), format {}",
            def.name.as_deref().unwrap_or("unnamed"),
            def.filters.len(),
            def.format
        );
        Ok(())
    }
}

/// Assemble a dataset query from a definition file and/or inline flags
///
/// Inline filters are appended to the file's filters; an inline structure or
/// format replaces the file's.
pub fn build_query(args: &QueryArgs) -> Result<DatasetQuery> {
    let (mut filters, file_structure, file_format) = match &args.query {
        Some(path) => {
            let def = load_query(path)?;
            (
                def.filters.iter().map(String::from).collect::<Vec<_>>(),
                Some(def.structure),
                Some(def.format),
            )
        }
        None => (Vec::new(), None, None),
    };
    filters.extend(args.filters.iter().cloned());

    if filters.is_empty() {
        return Err(Error::config(
            "At least one filter is required (use --filter or --query)",
        ));
    }

    let structure = match &args.structure {
        Some(raw) => parse_structure(raw)?,
        None => file_structure
            .ok_or_else(|| Error::config("A structure is required (use --structure or --query)"))?,
    };

    let format = args.format.or(file_format).unwrap_or_default();

    Ok(DatasetQuery::new(Filters::from(filters), structure, format))
}

fn parse_structure(raw: &str) -> Result<Structure> {
    let value: JsonValue = serde_json::from_str(raw)
        .map_err(|e| Error::config(format!("Invalid structure JSON: {e}")))?;
    Structure::from_value(value)
}
