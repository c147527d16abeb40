//! Collection pipeline
//!
//! Walks the registry in order: fetch, then synthesize. A source whose fetch
//! fails contributes nothing and the run moves on. Every record in a run
//! shares one `captured_at`.

use crate::registry::SourceRegistry;
use crate::summary::RunSummary;
use chrono::{DateTime, Utc};
use fortune_domain::traits::ContentFetcher;
use fortune_domain::InterpretationRecord;
use fortune_synthesizer::Synthesizer;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Records and counters from one pass over the registry
#[derive(Debug, Clone)]
pub struct CollectionRun {
    /// Capture time shared by every record
    pub captured_at: DateTime<Utc>,

    /// Records in registry order, then catalogue order
    pub records: Vec<InterpretationRecord>,

    /// Per-source counters
    pub summary: RunSummary,
}

/// Fetch-and-synthesize driver
#[derive(Debug)]
pub struct Collector<F> {
    fetcher: F,
    synthesizer: Synthesizer,
}

impl<F> Collector<F>
where
    F: ContentFetcher,
    F::Error: Display,
{
    /// Create a collector from a fetcher and a synthesizer
    pub fn new(fetcher: F, synthesizer: Synthesizer) -> Self {
        Self {
            fetcher,
            synthesizer,
        }
    }

    /// The fetcher in use
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Visit every source once
    pub async fn run(&self, registry: &SourceRegistry, captured_at: DateTime<Utc>) -> CollectionRun {
        let mut summary = RunSummary::new(registry.len());
        let mut records = Vec::new();

        for source in registry {
            info!("Fetching {} ({})", source.locator, source.system);

            match self.fetcher.fetch(&source.locator).await {
                Ok(content) => {
                    debug!("Fetched {} bytes from {}", content.len(), source.locator);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", source.locator, e);
                    summary.record_skip(&source.locator, e);
                    continue;
                }
            }

            let batch = self.synthesizer.synthesize(source, captured_at);
            summary.record_synthesized(source.system, batch.len());
            records.extend(batch);
        }

        info!(
            "Collected {} records from {}/{} sources",
            records.len(),
            summary.sources_fetched(),
            summary.sources_total
        );

        CollectionRun {
            captured_at,
            records,
            summary,
        }
    }
}
