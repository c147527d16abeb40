//! Entity catalogues and the standard synthesis rules
//!
//! Catalogues are fixed placeholders until fetched content is parsed; the
//! entity lists are not the final data set.

use chrono::{DateTime, Utc};
use fortune_domain::{FortuneSystem, InterpretationRecord, ReliabilityScore, SourceDescriptor};

/// Fixed description of one system's interpretable entities
#[derive(Debug, Clone, Copy)]
pub struct Catalogue {
    /// System the catalogue belongs to
    pub system: FortuneSystem,

    /// Entity names, in emission order
    pub entities: &'static [&'static str],

    /// Prefix joined to the entity name with `_` to form the primary key
    pub key_prefix: Option<&'static str>,

    /// Secondary key shared by every entity, if any
    pub secondary_key: Option<&'static str>,

    /// Category label
    pub context: &'static str,

    /// Default reliability of the system's sources
    pub reliability: ReliabilityScore,

    /// Builds the interpretation body from the entity name
    pub describe: fn(&str) -> String,
}

impl Catalogue {
    /// Primary key of `entity` under this catalogue
    pub fn primary_key(&self, entity: &str) -> String {
        match self.key_prefix {
            Some(prefix) => format!("{}_{}", prefix, entity),
            None => entity.to_string(),
        }
    }

    /// Emit one record per entity
    pub fn expand(
        &self,
        source: &SourceDescriptor,
        captured_at: DateTime<Utc>,
    ) -> Vec<InterpretationRecord> {
        self.entities
            .iter()
            .map(|entity| {
                InterpretationRecord::new(
                    self.system,
                    self.primary_key(entity),
                    self.secondary_key.map(str::to_string),
                    self.context.to_string(),
                    (self.describe)(entity),
                    self.reliability,
                    source.locator.clone(),
                    captured_at,
                )
            })
            .collect()
    }
}

/// Planetary aspects
pub const WESTERN: Catalogue = Catalogue {
    system: FortuneSystem::Western,
    entities: &["SUN_CONJ_MOON", "VENUS_SQUARE_MARS"],
    key_prefix: None,
    secondary_key: None,
    context: "Personality",
    reliability: ReliabilityScore::constant(0.8),
    describe: |aspect| format!("Interpretation for {}...", aspect),
};

/// Animal characters of the gold colour group
pub const ANIMAL: Catalogue = Catalogue {
    system: FortuneSystem::Animal,
    entities: &["Cheetah", "Pegasus", "Wolf", "Monkey"],
    key_prefix: Some("Animal"),
    secondary_key: Some("Gold"),
    context: "General",
    reliability: ReliabilityScore::constant(0.9),
    describe: |animal| format!("{} people are known for...", animal),
};

/// Lunar mansions (inns)
pub const SHUKUYO: Catalogue = Catalogue {
    system: FortuneSystem::Shukuyo,
    entities: &["Subaru", "Bi", "Kaku"],
    key_prefix: Some("Shuku"),
    secondary_key: None,
    context: "Daily",
    reliability: ReliabilityScore::constant(0.85),
    describe: |inn| format!("Today's fortune for {}...", inn),
};

/// Major stars of the life palace
pub const ZIWEI: Catalogue = Catalogue {
    system: FortuneSystem::Ziwei,
    entities: &["ZiWei", "TianJi", "TaiYang"],
    key_prefix: Some("Star"),
    secondary_key: Some("LifePalace"),
    context: "Destiny",
    reliability: ReliabilityScore::constant(0.75),
    describe: |star| format!("{} in the Life Palace suggests...", star),
};

/// Standard rule for Western astrology
pub fn western(source: &SourceDescriptor, captured_at: DateTime<Utc>) -> Vec<InterpretationRecord> {
    WESTERN.expand(source, captured_at)
}

/// Standard rule for Animal-sign astrology
pub fn animal(source: &SourceDescriptor, captured_at: DateTime<Utc>) -> Vec<InterpretationRecord> {
    ANIMAL.expand(source, captured_at)
}

/// Standard rule for Shukuyo
pub fn shukuyo(source: &SourceDescriptor, captured_at: DateTime<Utc>) -> Vec<InterpretationRecord> {
    SHUKUYO.expand(source, captured_at)
}

/// Standard rule for Zi Wei Dou Shu
pub fn ziwei(source: &SourceDescriptor, captured_at: DateTime<Utc>) -> Vec<InterpretationRecord> {
    ZIWEI.expand(source, captured_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_prefix() {
        assert_eq!(ANIMAL.primary_key("Wolf"), "Animal_Wolf");
        assert_eq!(SHUKUYO.primary_key("Bi"), "Shuku_Bi");
        assert_eq!(WESTERN.primary_key("SUN_CONJ_MOON"), "SUN_CONJ_MOON");
    }

    #[test]
    fn test_catalogues_not_empty() {
        for catalogue in [WESTERN, ANIMAL, SHUKUYO, ZIWEI] {
            assert!(!catalogue.entities.is_empty(), "{} catalogue is empty", catalogue.system);
        }
    }
}
