//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the collection pipeline and
//! infrastructure. Implementations live in other crates.

use crate::{InterpretationRecord, RecordId};
use std::future::Future;

/// Retrieval capability keyed by source locator
///
/// Implemented by the infrastructure layer (fortune-fetcher)
pub trait ContentFetcher {
    /// Error type for fetch operations
    type Error;

    /// Retrieve the raw content behind `locator`
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Batch sink for interpretation records
///
/// Implemented by the infrastructure layer (fortune-warehouse)
pub trait Warehouse {
    /// Error type for whole-batch failures
    type Error;

    /// Fully qualified destination table, for logs
    fn table_name(&self) -> String;

    /// Insert a batch in a single call
    ///
    /// Rows the backend rejects individually are reported in
    /// [`InsertReport::failed`]; `Err` means the call itself failed and no
    /// row can be assumed written.
    fn insert_rows(
        &mut self,
        rows: &[InterpretationRecord],
    ) -> impl Future<Output = Result<InsertReport, Self::Error>> + Send;
}

/// A row the warehouse rejected
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Id of the rejected record
    pub id: RecordId,

    /// Backend-provided reason
    pub reason: String,
}

/// Per-row outcome of a batch insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertReport {
    /// Records written
    pub inserted: Vec<RecordId>,

    /// Records rejected
    pub failed: Vec<RowFailure>,
}

impl InsertReport {
    /// True when every row was written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of the rejected rows
    pub fn failed_ids(&self) -> Vec<RecordId> {
        self.failed.iter().map(|f| f.id).collect()
    }
}
