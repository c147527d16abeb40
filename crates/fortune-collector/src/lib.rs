//! Fortune Collector
//!
//! One-shot collection run: load the source registry, fetch each source,
//! synthesize interpretation records, and write the batch to the warehouse
//! (or dump it as JSON when no warehouse is reachable).
//!
//! ```text
//! SourceRegistry → Collector (fetch + synthesize) → IngestionSink → warehouse | stdout
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod sink;
pub mod summary;

use chrono::{DateTime, SubsecRound, Utc};
use fortune_fetcher::{HttpFetcher, StubFetcher};
use fortune_synthesizer::Synthesizer;
use std::io::Write;
use tracing::info;

pub use cli::Cli;
pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use pipeline::{CollectionRun, Collector};
pub use registry::{RegistryError, SourceRegistry};
pub use sink::{IngestOutcome, IngestionSink};
pub use summary::RunSummary;

/// Warehouse timestamps keep microseconds; finer digits are rejected
const CAPTURE_PRECISION_DIGITS: u16 = 6;

/// Capture time for a run, truncated to microsecond precision
pub fn capture_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(CAPTURE_PRECISION_DIGITS)
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-source counters
    pub summary: RunSummary,

    /// What happened to the batch
    pub outcome: IngestOutcome,
}

/// Perform one collection run
///
/// Setup problems (unreadable registry, unbuildable HTTP client) are
/// returned before any source is fetched. Fetch and warehouse failures are
/// recovered and show up in the report instead. `captured_at` is truncated
/// to microseconds before any record is built.
pub async fn collect_once<O: Write>(
    config: &CollectorConfig,
    captured_at: DateTime<Utc>,
    output: O,
) -> Result<RunReport> {
    let captured_at = captured_at.trunc_subsecs(CAPTURE_PRECISION_DIGITS);
    let registry = config.load_registry()?;
    info!("Loaded {} sources", registry.len());

    let connection = fortune_warehouse::connect(&config.warehouse);

    let run = if config.uses_http() {
        Collector::new(HttpFetcher::new(config.fetch_timeout)?, Synthesizer::standard())
            .run(&registry, captured_at)
            .await
    } else {
        info!("Using stub content for sources");
        Collector::new(StubFetcher::default(), Synthesizer::standard())
            .run(&registry, captured_at)
            .await
    };

    for line in run.summary.summary().lines() {
        info!("{}", line);
    }

    let mut sink = IngestionSink::new(connection, output).with_preview(config.preview);
    let outcome = sink.ingest(&run.records).await?;
    info!("{}", outcome.describe());

    Ok(RunReport {
        summary: run.summary,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_capture_time_has_microsecond_precision() {
        let captured_at = capture_time();
        assert_eq!(captured_at.nanosecond() % 1_000, 0);
    }
}
