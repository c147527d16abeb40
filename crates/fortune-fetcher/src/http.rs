//! HTTP fetcher implementation
//!
//! Retrieves source content over HTTP(S) with a bounded per-request timeout.
//!
//! # Features
//!
//! - Configurable timeout (default 10 seconds)
//! - Locator validation before any network I/O
//! - Non-success statuses surfaced as typed errors
//!
//! # Examples
//!
//! ```no_run
//! use fortune_fetcher::HttpFetcher;
//! use std::time::Duration;
//!
//! let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
//! ```

use crate::FetchError;
use fortune_domain::traits::ContentFetcher;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Default timeout for source requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("fortune-collector/", env!("CARGO_PKG_VERSION"));

/// Fetches source content over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Create a fetcher with the default 10 second timeout
    pub fn with_default_timeout() -> Result<Self, FetchError> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(locator: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(locator.to_string())
        } else {
            FetchError::Transport(format!("{}: {}", locator, error))
        }
    }
}

impl ContentFetcher for HttpFetcher {
    type Error = FetchError;

    async fn fetch(&self, locator: &str) -> Result<String, Self::Error> {
        let url = Url::parse(locator)
            .map_err(|e| FetchError::InvalidLocator(format!("{}: {}", locator, e)))?;

        debug!("GET {} (timeout {:?})", url, self.timeout);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| Self::classify(locator, e))
    }
}
