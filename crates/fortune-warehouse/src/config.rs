//! Warehouse settings

use std::path::PathBuf;
use std::time::Duration;

/// Default project when none is configured
pub const DEFAULT_PROJECT_ID: &str = "fortune-telling-484316";

/// Default dataset when none is configured
pub const DEFAULT_DATASET_ID: &str = "fortune_telling_db";

/// Default table inside the dataset
pub const DEFAULT_TABLE: &str = "interpretations";

/// Default request timeout for warehouse calls (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which backend a run writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// BigQuery streaming inserts
    BigQuery,

    /// Local SQLite file
    Sqlite,

    /// Never connect; always dump
    Disabled,
}

/// Where and how to write a capture batch
#[derive(Debug, Clone)]
pub struct WarehouseSettings {
    /// Selected backend
    pub backend: Backend,

    /// Warehouse project
    pub project_id: String,

    /// Dataset (table namespace) inside the project
    pub dataset_id: String,

    /// Table inside the dataset
    pub table: String,

    /// Bearer token for BigQuery; absent means no credentials
    pub access_token: Option<String>,

    /// Database file for the SQLite backend
    pub sqlite_path: PathBuf,

    /// Timeout for a single warehouse request
    pub timeout: Duration,
}

impl WarehouseSettings {
    /// Fully qualified table id (`project.dataset.table`)
    pub fn qualified_table(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table)
    }

    /// Table name used inside a SQLite file (`dataset__table`)
    pub fn sqlite_table(&self) -> String {
        format!("{}__{}", self.dataset_id, self.table)
    }
}

impl Default for WarehouseSettings {
    fn default() -> Self {
        Self {
            backend: Backend::BigQuery,
            project_id: DEFAULT_PROJECT_ID.to_string(),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            table: DEFAULT_TABLE.to_string(),
            access_token: None,
            sqlite_path: PathBuf::from("fortune.db"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
