//! Tag-dispatched record synthesis

use crate::catalogue;
use chrono::{DateTime, Utc};
use fortune_domain::{FortuneSystem, InterpretationRecord, SourceDescriptor};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A synthesis rule: pure function from source and capture time to records
pub type Rule = fn(&SourceDescriptor, DateTime<Utc>) -> Vec<InterpretationRecord>;

/// Dispatches each source to the rule registered for its fortune system
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    rules: HashMap<FortuneSystem, Rule>,
}

impl Synthesizer {
    /// Synthesizer with no rules; every source yields nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Synthesizer with the built-in rule for every fortune system
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(FortuneSystem::Western, catalogue::western)
            .with_rule(FortuneSystem::Animal, catalogue::animal)
            .with_rule(FortuneSystem::Shukuyo, catalogue::shukuyo)
            .with_rule(FortuneSystem::Ziwei, catalogue::ziwei)
    }

    /// Register (or replace) the rule for `system`
    pub fn with_rule(mut self, system: FortuneSystem, rule: Rule) -> Self {
        self.rules.insert(system, rule);
        self
    }

    /// Whether `system` has a registered rule
    pub fn has_rule(&self, system: FortuneSystem) -> bool {
        self.rules.contains_key(&system)
    }

    /// Produce the records for one source
    ///
    /// Every record carries the source's system, its locator as `source_ref`
    /// and `captured_at` unchanged. A system without a rule yields an empty
    /// vector rather than an error.
    pub fn synthesize(
        &self,
        source: &SourceDescriptor,
        captured_at: DateTime<Utc>,
    ) -> Vec<InterpretationRecord> {
        let Some(rule) = self.rules.get(&source.system) else {
            warn!(
                "No synthesis rule for {} (source {}), skipping",
                source.system, source.locator
            );
            return Vec::new();
        };

        let records = rule(source, captured_at);
        debug!(
            "Synthesized {} {} records from {}",
            records.len(),
            source.system,
            source.locator
        );
        records
    }
}
