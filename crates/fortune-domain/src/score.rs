//! Reliability score module

use crate::DomainError;
use serde::{Deserialize, Serialize};

/// Source confidence for an interpretation, always within [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ReliabilityScore(f64);

impl ReliabilityScore {
    /// Create a new score
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidScore`] when `value` is NaN or outside [0, 1]
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::InvalidScore(value));
        }
        Ok(Self(value))
    }

    /// Create a score from a literal, for catalogue constants
    ///
    /// # Panics
    /// Panics if `value` is NaN or outside [0, 1]; in a `const` item this is a
    /// compile error.
    pub const fn constant(value: f64) -> Self {
        assert!(value >= 0.0 && value <= 1.0, "Reliability score must be in [0, 1]");
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ReliabilityScore {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReliabilityScore> for f64 {
    fn from(score: ReliabilityScore) -> Self {
        score.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: construction succeeds exactly for values in [0, 1]
        #[test]
        fn test_score_accepts_only_unit_interval(value in -2.0f64..2.0) {
            let result = ReliabilityScore::new(value);
            prop_assert_eq!(result.is_ok(), (0.0..=1.0).contains(&value));
        }
    }
}
