//! Run summary

use fortune_domain::FortuneSystem;
use std::collections::BTreeMap;

/// A source whose content could not be retrieved
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSource {
    /// Source locator
    pub locator: String,

    /// Fetch error, as displayed
    pub reason: String,
}

/// Counters collected while a run walks the registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Sources in the registry
    pub sources_total: usize,

    /// Sources skipped because their fetch failed
    pub skipped: Vec<SkippedSource>,

    /// Records synthesized per fortune system
    pub records: BTreeMap<FortuneSystem, usize>,
}

impl RunSummary {
    /// Create new empty summary
    pub fn new(sources_total: usize) -> Self {
        Self {
            sources_total,
            ..Self::default()
        }
    }

    /// Record a skipped source
    pub fn record_skip(&mut self, locator: &str, reason: impl ToString) {
        self.skipped.push(SkippedSource {
            locator: locator.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Record records synthesized for one source
    pub fn record_synthesized(&mut self, system: FortuneSystem, count: usize) {
        *self.records.entry(system).or_insert(0) += count;
    }

    /// Sources that were fetched successfully
    pub fn sources_fetched(&self) -> usize {
        self.sources_total.saturating_sub(self.skipped.len())
    }

    /// Records synthesized across all systems
    pub fn total_records(&self) -> usize {
        self.records.values().sum()
    }

    /// Human-readable report, one line per entry
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Collection Summary".to_string(),
            format!(
                "Sources: {} fetched, {} skipped, {} total",
                self.sources_fetched(),
                self.skipped.len(),
                self.sources_total
            ),
        ];

        if !self.records.is_empty() {
            lines.push("Records by system:".to_string());
            for (system, count) in &self.records {
                lines.push(format!("  {}: {}", system, count));
            }
        }
        lines.push(format!("  Total: {}", self.total_records()));

        for skipped in &self.skipped {
            lines.push(format!("Skipped {}: {}", skipped.locator, skipped.reason));
        }

        lines.join("\n")
    }
}
