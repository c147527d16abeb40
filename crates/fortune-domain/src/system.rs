//! Fortune system tags

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A divination methodology with its own catalogue of interpretable entities
///
/// The set is closed: registry entries naming anything else are rejected at
/// load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FortuneSystem {
    /// Western astrology (planetary aspects)
    Western,

    /// Animal-sign astrology (animal characters in colour groups)
    Animal,

    /// Shukuyo lunar-mansion astrology (27 inns)
    Shukuyo,

    /// Zi Wei Dou Shu purple-star astrology
    Ziwei,
}

impl FortuneSystem {
    /// Every known system, in registry order
    pub const ALL: [FortuneSystem; 4] = [
        FortuneSystem::Western,
        FortuneSystem::Animal,
        FortuneSystem::Shukuyo,
        FortuneSystem::Ziwei,
    ];

    /// Get the wire tag (as stored in the warehouse)
    pub fn as_str(&self) -> &'static str {
        match self {
            FortuneSystem::Western => "WESTERN",
            FortuneSystem::Animal => "ANIMAL",
            FortuneSystem::Shukuyo => "SHUKUYO",
            FortuneSystem::Ziwei => "ZIWEI",
        }
    }

    /// Parse a tag, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WESTERN" => Some(FortuneSystem::Western),
            "ANIMAL" => Some(FortuneSystem::Animal),
            "SHUKUYO" => Some(FortuneSystem::Shukuyo),
            "ZIWEI" => Some(FortuneSystem::Ziwei),
            _ => None,
        }
    }
}

impl fmt::Display for FortuneSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FortuneSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::UnknownSystem(s.to_string()))
    }
}
