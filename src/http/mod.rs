//! HTTP client module
//!
//! Issues single page requests against the data endpoint.
//!
//! # Features
//!
//! - **Bounded requests**: every request carries a timeout (10s default)
//! - **Status classification**: content, end-of-data (204) or failure (>= 400)
//! - **Verbatim diagnostics**: failed requests keep the server's body text

mod client;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, PageResponse, RequestConfig,
    DEFAULT_TIMEOUT,
};
