//! Error types for domain value construction

use thiserror::Error;

/// Errors raised when building domain values from untrusted input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Reliability score outside [0.0, 1.0] or NaN
    #[error("Reliability score {0} out of range [0.0, 1.0]")]
    InvalidScore(f64),

    /// Tag that does not name a known fortune system
    #[error("Unrecognized fortune system: {0}")]
    UnknownSystem(String),
}
