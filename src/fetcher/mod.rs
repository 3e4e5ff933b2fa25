//! Paginated fetcher module
//!
//! Drives the page loop against the data endpoint and assembles the full
//! dataset.
//!
//! # Overview
//!
//! The fetcher requests page 1, 2, 3, ... one at a time. Each page is handed
//! to the merge strategy chosen for the requested format:
//! - a status >= 400 aborts the fetch with the server's body text
//! - a 204 ends the loop successfully
//! - a JSON page with an empty `pagination.next` ends the loop successfully
//!
//! Nothing is returned unless every page succeeds.

mod types;

pub use types::FetchStats;

use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, PageResponse, RequestConfig};
use crate::pagination::{CsvMerger, EndReason, PageMerger, PaginationState, RecordMerger};
use crate::types::{
    Dataset, DatasetQuery, Filters, OutputFormat, Record, Structure, DEFAULT_ENDPOINT,
};
use std::time::Instant;
use tracing::{debug, info};

/// Fetches complete datasets from the paginated data endpoint
#[derive(Debug, Clone)]
pub struct Fetcher {
    /// HTTP client
    client: HttpClient,
}

impl Fetcher {
    /// Create a fetcher for the public endpoint with the default 10s timeout
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Create a fetcher with a custom client configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::with_client(HttpClient::with_config(config)?))
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch every page of `query` and merge them into one dataset
    pub async fn fetch(&self, query: &DatasetQuery) -> Result<Dataset> {
        let (dataset, _) = self.fetch_with_stats(query).await?;
        Ok(dataset)
    }

    /// Like [`Fetcher::fetch`], also reporting how the loop went
    pub async fn fetch_with_stats(&self, query: &DatasetQuery) -> Result<(Dataset, FetchStats)> {
        match query.format {
            OutputFormat::Json => {
                let (records, stats) = self.run(query, RecordMerger::new()).await?;
                Ok((records.into(), stats))
            }
            OutputFormat::Csv => {
                let (text, stats) = self.run(query, CsvMerger::new()).await?;
                Ok((text.into(), stats))
            }
        }
    }

    /// Fetch all records in JSON mode
    pub async fn fetch_records(
        &self,
        filters: &Filters,
        structure: &Structure,
    ) -> Result<Vec<Record>> {
        let query = DatasetQuery::new(filters.clone(), structure.clone(), OutputFormat::Json);
        let (records, _) = self.run(&query, RecordMerger::new()).await?;
        Ok(records)
    }

    /// Fetch the whole dataset as CSV text with a single header row
    pub async fn fetch_csv(&self, filters: &Filters, structure: &Structure) -> Result<String> {
        let query = DatasetQuery::new(filters.clone(), structure.clone(), OutputFormat::Csv);
        let (text, _) = self.run(&query, CsvMerger::new()).await?;
        Ok(text)
    }

    /// Blocking variant of [`Fetcher::fetch`]
    ///
    /// Runs the fetch on a private current-thread runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tokio runtime, since the private
    /// runtime cannot be entered there.
    pub fn fetch_blocking(&self, query: &DatasetQuery) -> Result<Dataset> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.fetch(query))
    }

    /// Page loop shared by both formats
    async fn run<M: PageMerger>(
        &self,
        query: &DatasetQuery,
        mut merger: M,
    ) -> Result<(M::Output, FetchStats)> {
        let start = Instant::now();
        let mut state = PaginationState::new();

        info!(
            filters = %query.filters.joined(),
            format = %merger.format(),
            "Starting paginated fetch"
        );

        let end = loop {
            let request = RequestConfig::with_query(query.params(state.page)?);

            let body = match self.client.get_page(request).await? {
                PageResponse::NoContent => break EndReason::NoContent,
                PageResponse::Content { body, .. } => body,
            };

            let before = merger.item_count();
            let next = merger.merge(state.page, &body)?;
            state.record_page(merger.item_count() - before);

            debug!(
                page = state.page,
                items = merger.item_count() - before,
                "Merged page"
            );

            if next.is_done() {
                break EndReason::NextEmpty;
            }
            state.next_page();
        };
        state.finish(end);

        let stats = FetchStats::from_state(
            query.format,
            &state,
            end,
            start.elapsed().as_millis() as u64,
        );

        info!(
            pages = stats.pages_merged,
            items = stats.items,
            duration_ms = stats.duration_ms,
            "Fetch complete"
        );

        Ok((merger.finish(), stats))
    }
}

/// Fetch a complete dataset from the public endpoint
///
/// Returns [`Dataset::Records`] when `as_csv` is false and [`Dataset::Csv`]
/// otherwise.
pub async fn get_paginated_dataset(
    filters: impl Into<Filters>,
    structure: Structure,
    as_csv: bool,
) -> Result<Dataset> {
    get_paginated_dataset_with_endpoint(DEFAULT_ENDPOINT, filters, structure, as_csv).await
}

/// Like [`get_paginated_dataset`], against another data endpoint
pub async fn get_paginated_dataset_with_endpoint(
    endpoint: &str,
    filters: impl Into<Filters>,
    structure: Structure,
    as_csv: bool,
) -> Result<Dataset> {
    let query = DatasetQuery::new(filters.into(), structure, OutputFormat::from_csv_flag(as_csv));
    endpoint_fetcher(endpoint)?.fetch(&query).await
}

/// Blocking variant of [`get_paginated_dataset`]
///
/// # Panics
///
/// Panics when called from inside a tokio runtime, like
/// [`Fetcher::fetch_blocking`].
pub fn get_paginated_dataset_blocking(
    filters: impl Into<Filters>,
    structure: Structure,
    as_csv: bool,
) -> Result<Dataset> {
    get_paginated_dataset_blocking_with_endpoint(DEFAULT_ENDPOINT, filters, structure, as_csv)
}

/// Blocking variant of [`get_paginated_dataset_with_endpoint`]
///
/// # Panics
///
/// Panics when called from inside a tokio runtime.
pub fn get_paginated_dataset_blocking_with_endpoint(
    endpoint: &str,
    filters: impl Into<Filters>,
    structure: Structure,
    as_csv: bool,
) -> Result<Dataset> {
    let query = DatasetQuery::new(filters.into(), structure, OutputFormat::from_csv_flag(as_csv));
    endpoint_fetcher(endpoint)?.fetch_blocking(&query)
}

fn endpoint_fetcher(endpoint: &str) -> Result<Fetcher> {
    Fetcher::with_config(HttpClientConfig::builder().endpoint(endpoint).build())
}

#[cfg(test)]
mod tests;
