//! Fortune Content Fetchers
//!
//! Implementations of the `ContentFetcher` trait from `fortune-domain`.
//!
//! # Fetchers
//!
//! - `StubFetcher`: fixed content, no network; used offline and in tests
//! - `HttpFetcher`: bounded-timeout HTTP retrieval
//!
//! Neither retries. A failed fetch is returned to the caller, which decides
//! whether to skip the source.
//!
//! # Examples
//!
//! ```
//! use fortune_domain::traits::ContentFetcher;
//! use fortune_fetcher::StubFetcher;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let fetcher = StubFetcher::new("<html>hello</html>");
//! let body = fetcher.fetch("https://example.com/western").await.unwrap();
//! assert_eq!(body, "<html>hello</html>");
//! # }
//! ```

#![warn(missing_docs)]

pub mod http;

use fortune_domain::traits::ContentFetcher;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::HttpFetcher;

/// Body returned by the stub when no override is registered
pub const STUB_CONTENT: &str = "<html>Mock Content</html>";

/// Errors that can occur while fetching a source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Locator is not a valid absolute URL
    #[error("Invalid locator {0}")]
    InvalidLocator(String),

    /// Request exceeded the configured timeout
    #[error("Timed out fetching {0}")]
    Timeout(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {locator}")]
    Status {
        /// Source locator
        locator: String,
        /// Response status code
        status: u16,
    },

    /// Connection, TLS or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP client could not be built
    #[error("Client setup failed: {0}")]
    Client(String),
}

/// Fixed-content fetcher for offline runs and tests
///
/// Returns the same body for every locator unless a specific body or a
/// failure has been registered for it.
///
/// # Examples
///
/// ```
/// use fortune_fetcher::{FetchError, StubFetcher};
///
/// let mut fetcher = StubFetcher::default();
/// fetcher.add_response("https://example.com/animal", "<html>animals</html>");
/// fetcher.add_failure("https://example.com/ziwei", FetchError::Timeout("https://example.com/ziwei".into()));
/// ```
#[derive(Debug, Clone)]
pub struct StubFetcher {
    default_body: String,
    responses: Arc<Mutex<HashMap<String, Result<String, FetchError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl StubFetcher {
    /// Create a stub that answers every locator with `body`
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            default_body: body.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Register a specific body for a locator
    pub fn add_response(&mut self, locator: impl Into<String>, body: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(locator.into(), Ok(body.into()));
        }
    }

    /// Make fetches of `locator` fail with `error`
    pub fn add_failure(&mut self, locator: impl Into<String>, error: FetchError) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(locator.into(), Err(error));
        }
    }

    /// Number of fetches performed so far
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|count| *count).unwrap_or(0)
    }

    fn respond(&self, locator: &str) -> Result<String, FetchError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }

        let responses = self
            .responses
            .lock()
            .map_err(|e| FetchError::Transport(format!("Stub lock poisoned: {}", e)))?;
        match responses.get(locator) {
            Some(response) => response.clone(),
            None => Ok(self.default_body.clone()),
        }
    }
}

impl Default for StubFetcher {
    fn default() -> Self {
        Self::new(STUB_CONTENT)
    }
}

impl ContentFetcher for StubFetcher {
    type Error = FetchError;

    async fn fetch(&self, locator: &str) -> Result<String, Self::Error> {
        self.respond(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_default_body() {
        let fetcher = StubFetcher::default();
        let body = fetcher.fetch("https://example.com/western").await.unwrap();
        assert_eq!(body, STUB_CONTENT);
    }

    #[tokio::test]
    async fn test_stub_specific_responses() {
        let mut fetcher = StubFetcher::new("fallback");
        fetcher.add_response("https://a", "alpha");

        assert_eq!(fetcher.fetch("https://a").await.unwrap(), "alpha");
        assert_eq!(fetcher.fetch("https://b").await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_stub_injected_failure() {
        let mut fetcher = StubFetcher::default();
        fetcher.add_failure("https://down", FetchError::Timeout("https://down".to_string()));

        let result = fetcher.fetch("https://down").await;
        assert_eq!(result, Err(FetchError::Timeout("https://down".to_string())));
    }

    #[tokio::test]
    async fn test_stub_call_count_shared_between_clones() {
        let fetcher = StubFetcher::default();
        let clone = fetcher.clone();

        fetcher.fetch("https://a").await.unwrap();
        clone.fetch("https://b").await.unwrap();

        assert_eq!(fetcher.call_count(), 2);
        assert_eq!(clone.call_count(), 2);
    }
}
