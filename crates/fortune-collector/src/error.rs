//! Error types for the collector.

use crate::registry::RegistryError;
use fortune_fetcher::FetchError;
use thiserror::Error;

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Errors that stop a run.
///
/// Per-source fetch failures and warehouse failures are not in here: they
/// are recovered inside the run and reported in its summary.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Invalid flag or environment value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source registry could not be loaded
    #[error("Source registry error: {0}")]
    Registry(#[from] RegistryError),

    /// HTTP fetcher could not be built
    #[error("Fetcher setup failed: {0}")]
    Fetcher(#[from] FetchError),

    /// I/O error while writing the fallback dump
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
