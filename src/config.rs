//! Client settings for the command-line front end
//!
//! Settings are layered: built-in defaults, then environment variables, then
//! explicit command-line flags. The library's fetch operation itself never
//! reads the environment; only the binary calls [`FetchSettings::from_env`].

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use std::time::Duration;
use url::Url;

/// Environment variable overriding the data endpoint
pub const ENDPOINT_ENV: &str = "UKCOVID_API_ENDPOINT";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "UKCOVID_API_TIMEOUT_SECS";

/// Optional overrides for the HTTP client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSettings {
    /// Data endpoint URL
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl FetchSettings {
    /// Create empty settings (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty());
        let timeout_secs = match lookup(TIMEOUT_ENV) {
            Some(raw) if !raw.trim().is_empty() => Some(raw.trim().parse().map_err(|e| {
                Error::config(format!("{TIMEOUT_ENV} must be a whole number of seconds: {e}"))
            })?),
            _ => None,
        };

        Ok(Self {
            endpoint,
            timeout_secs,
        })
    }

    /// Layer `overrides` on top of these settings
    #[must_use]
    pub fn merge(self, overrides: FetchSettings) -> Self {
        Self {
            endpoint: overrides.endpoint.or(self.endpoint),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Validate and turn the settings into a client configuration
    pub fn into_client_config(self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder();

        if let Some(endpoint) = self.endpoint {
            Url::parse(&endpoint)?;
            builder = builder.endpoint(endpoint);
        }

        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err(Error::config("timeout must be at least one second"));
            }
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }
}
