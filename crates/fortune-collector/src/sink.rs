//! Ingestion sink
//!
//! Sends the collected batch to the warehouse when one is connected, and
//! otherwise dumps it as a pretty-printed JSON array to a writer (stdout in
//! the binary). A batch whose insert call fails outright is dumped as well,
//! so a run never drops records it collected.

use crate::error::Result;
use fortune_domain::traits::{InsertReport, Warehouse};
use fortune_domain::InterpretationRecord;
use fortune_warehouse::WarehouseConnection;
use std::fmt::Display;
use std::io::Write;
use tracing::{error, info, warn};

/// What happened to a batch
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Batch sent; per-row results from the warehouse
    Inserted {
        /// Inserted and rejected ids
        report: InsertReport,
    },

    /// The insert call failed and the whole batch was dumped instead
    InsertFailed {
        /// Warehouse error, as displayed
        error: String,
        /// Records written to the fallback output
        dumped: usize,
    },

    /// No warehouse; records written to the fallback output
    Dumped {
        /// Records written (capped by the preview limit)
        count: usize,
        /// Records in the batch
        total: usize,
    },

    /// Nothing to ingest
    Empty,
}

impl IngestOutcome {
    /// One-line description for logs
    pub fn describe(&self) -> String {
        match self {
            IngestOutcome::Inserted { report } => format!(
                "Inserted {} rows, {} rejected",
                report.inserted.len(),
                report.failed.len()
            ),
            IngestOutcome::InsertFailed { error, dumped } => {
                format!("Insert failed ({}); dumped {} records", error, dumped)
            }
            IngestOutcome::Dumped { count, total } if count < total => {
                format!("Dumped {} of {} records (preview)", count, total)
            }
            IngestOutcome::Dumped { count, .. } => format!("Dumped {} records", count),
            IngestOutcome::Empty => "No data collected.".to_string(),
        }
    }
}

/// Batch writer over a warehouse connection and a fallback output
pub struct IngestionSink<W, O> {
    connection: WarehouseConnection<W>,
    output: O,
    preview: Option<usize>,
}

impl<W, O> IngestionSink<W, O>
where
    W: Warehouse,
    W::Error: Display,
    O: Write,
{
    /// Create a sink; `output` receives fallback dumps
    pub fn new(connection: WarehouseConnection<W>, output: O) -> Self {
        Self {
            connection,
            output,
            preview: None,
        }
    }

    /// Cap the number of records dumped in disconnected mode
    pub fn with_preview(mut self, preview: Option<usize>) -> Self {
        self.preview = preview;
        self
    }

    /// Whether a warehouse is connected
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Give back the fallback output
    pub fn into_output(self) -> O {
        self.output
    }

    /// Write one batch
    ///
    /// Warehouse failures are reported in the outcome, not as an error.
    ///
    /// # Errors
    ///
    /// Fails only when the fallback output cannot be written.
    pub async fn ingest(&mut self, records: &[InterpretationRecord]) -> Result<IngestOutcome> {
        if records.is_empty() {
            info!("No data collected.");
            return Ok(IngestOutcome::Empty);
        }

        let warehouse = match &mut self.connection {
            WarehouseConnection::Connected(warehouse) => warehouse,
            WarehouseConnection::Unavailable(reason) => {
                info!("Warehouse unavailable ({}), dumping records to output", reason);
                let count = self.preview.map_or(records.len(), |cap| cap.min(records.len()));
                dump(&mut self.output, &records[..count])?;
                return Ok(IngestOutcome::Dumped {
                    count,
                    total: records.len(),
                });
            }
        };

        let table = warehouse.table_name();
        match warehouse.insert_rows(records).await {
            Ok(report) => {
                for failure in &report.failed {
                    warn!("Row {} rejected by {}: {}", failure.id, table, failure.reason);
                }
                info!(
                    "Inserted {} of {} rows into {}",
                    report.inserted.len(),
                    records.len(),
                    table
                );
                Ok(IngestOutcome::Inserted { report })
            }
            Err(e) => {
                error!("Insert into {} failed: {}", table, e);
                dump(&mut self.output, records)?;
                Ok(IngestOutcome::InsertFailed {
                    error: e.to_string(),
                    dumped: records.len(),
                })
            }
        }
    }
}

fn dump<O: Write>(output: &mut O, records: &[InterpretationRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *output, records)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fortune_domain::traits::RowFailure;
    use fortune_domain::{FortuneSystem, SourceDescriptor};
    use fortune_synthesizer::Synthesizer;

    /// Warehouse double: rejects configured rows, or the whole call
    struct FakeWarehouse {
        reject_call: bool,
        reject_first_row: bool,
        received: usize,
    }

    impl Warehouse for FakeWarehouse {
        type Error = String;

        fn table_name(&self) -> String {
            "fake.table".to_string()
        }

        async fn insert_rows(
            &mut self,
            rows: &[InterpretationRecord],
        ) -> std::result::Result<InsertReport, String> {
            self.received += rows.len();
            if self.reject_call {
                return Err("quota exceeded".to_string());
            }
            let mut report = InsertReport::default();
            for (i, row) in rows.iter().enumerate() {
                if i == 0 && self.reject_first_row {
                    report.failed.push(RowFailure {
                        id: row.id,
                        reason: "invalid".to_string(),
                    });
                } else {
                    report.inserted.push(row.id);
                }
            }
            Ok(report)
        }
    }

    fn fake(reject_call: bool, reject_first_row: bool) -> FakeWarehouse {
        FakeWarehouse {
            reject_call,
            reject_first_row,
            received: 0,
        }
    }

    fn animal_records() -> Vec<InterpretationRecord> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Synthesizer::standard().synthesize(
            &SourceDescriptor::new("https://x/animal", FortuneSystem::Animal),
            at,
        )
    }

    fn unavailable() -> WarehouseConnection<FakeWarehouse> {
        WarehouseConnection::Unavailable("no credentials".to_string())
    }

    #[tokio::test]
    async fn test_dump_is_lossless() {
        let records = animal_records();
        let mut sink = IngestionSink::new(unavailable(), Vec::new());

        let outcome = sink.ingest(&records).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Dumped { count: 4, total: 4 });

        let output = sink.into_output();
        let parsed: Vec<InterpretationRecord> = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed, records);
    }

    #[tokio::test]
    async fn test_dump_respects_preview() {
        let records = animal_records();
        let mut sink = IngestionSink::new(unavailable(), Vec::new()).with_preview(Some(1));

        let outcome = sink.ingest(&records).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Dumped { count: 1, total: 4 });
        assert!(outcome.describe().contains("preview"));

        let parsed: Vec<InterpretationRecord> = serde_json::from_slice(&sink.into_output()).unwrap();
        assert_eq!(parsed, records[..1].to_vec());
    }

    #[tokio::test]
    async fn test_preview_larger_than_batch() {
        let records = animal_records();
        let mut sink = IngestionSink::new(unavailable(), Vec::new()).with_preview(Some(50));
        let outcome = sink.ingest(&records).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Dumped { count: 4, total: 4 });
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let mut sink = IngestionSink::new(unavailable(), Vec::new());
        let outcome = sink.ingest(&[]).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Empty);
        assert!(sink.into_output().is_empty());
    }

    #[tokio::test]
    async fn test_connected_reports_rows() {
        let records = animal_records();
        let mut sink = IngestionSink::new(WarehouseConnection::Connected(fake(false, true)), Vec::new());
        assert!(sink.is_connected());

        let outcome = sink.ingest(&records).await.unwrap();
        match outcome {
            IngestOutcome::Inserted { report } => {
                assert_eq!(report.inserted.len(), 3);
                assert_eq!(report.failed_ids(), vec![records[0].id]);
            }
            other => panic!("Expected Inserted, got {:?}", other),
        }
        assert!(sink.into_output().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_dumps_full_batch() {
        let records = animal_records();
        let mut sink = IngestionSink::new(WarehouseConnection::Connected(fake(true, false)), Vec::new())
            .with_preview(Some(1));

        let outcome = sink.ingest(&records).await.unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::InsertFailed {
                error: "quota exceeded".to_string(),
                dumped: 4
            }
        );

        let parsed: Vec<InterpretationRecord> = serde_json::from_slice(&sink.into_output()).unwrap();
        assert_eq!(parsed.len(), 4);
    }
}
