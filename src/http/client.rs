//! HTTP client for the dashboard API
//!
//! Thin wrapper over `reqwest` that:
//! - Applies a per-request timeout (10 seconds by default)
//! - Classifies the response status into page content, end-of-data or failure
//! - Surfaces the raw body of failed requests verbatim
//!
//! No retry or rate limiting is applied: one failed request fails the
//! whole fetch.

use crate::error::{Error, Result};
use crate::types::DEFAULT_ENDPOINT;
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single page request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Data endpoint every page is requested from
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("ukcovid-fetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the data endpoint
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request config from a prepared parameter map
    pub fn with_query(query: HashMap<String, String>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

}

/// Outcome of a single successful page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse {
    /// The server returned a page body
    Content {
        /// HTTP status of the response
        status: u16,
        /// Raw response body
        body: Vec<u8>,
    },
    /// 204 No Content: there is no further page
    NoContent,
}

impl PageResponse {
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }
}

/// HTTP client bound to one data endpoint
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Endpoint this client requests pages from
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Request one page from the endpoint and classify the response
    ///
    /// Status >= 400 becomes [`Error::RequestFailed`] carrying the raw body,
    /// 204 becomes [`PageResponse::NoContent`], anything else is content.
    pub async fn get_page(&self, config: RequestConfig) -> Result<PageResponse> {
        let timeout = self.config.timeout;
        let response = self.send(&config, timeout).await?;
        let status = response.status();

        if status.as_u16() >= StatusCode::BAD_REQUEST.as_u16() {
            let body = read_body(response, timeout).await?;
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(status = status.as_u16(), "Request failed");
            return Err(Error::request_failed(status.as_u16(), body));
        }

        if status == StatusCode::NO_CONTENT {
            debug!("Received 204 No Content");
            return Ok(PageResponse::NoContent);
        }

        let body = read_body(response, timeout).await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Received page");
        Ok(PageResponse::Content {
            status: status.as_u16(),
            body,
        })
    }

    async fn send(&self, config: &RequestConfig, timeout: Duration) -> Result<Response> {
        let mut req = self.client.get(&self.config.endpoint);

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        req = req.timeout(timeout);

        debug!("GET {}", self.config.endpoint);
        req.send().await.map_err(|e| transport_error(e, timeout))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn read_body(response: Response, timeout: Duration) -> Result<Vec<u8>> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(e, timeout))?;
    Ok(bytes.to_vec())
}

/// Map a reqwest failure, singling out timeouts
fn transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        Error::Http(e)
    }
}
