//! Fortune Warehouse Layer
//!
//! Implements the `Warehouse` trait for the backends a collection run can
//! write to, and the connection step that decides whether a run writes at
//! all.
//!
//! # Backends
//!
//! - `BigQueryWarehouse`: streaming `insertAll` into `{project}.{dataset}.{table}`
//! - `SqliteWarehouse`: local file, one table per dataset/table pair
//!
//! # Connecting
//!
//! [`connect`] never fails. It returns [`WarehouseConnection::Unavailable`]
//! with a reason when credentials are missing or the backend cannot be
//! opened, and the caller falls back to dumping the batch.
//!
//! ```no_run
//! use fortune_warehouse::{connect, WarehouseConnection, WarehouseSettings};
//!
//! let settings = WarehouseSettings::default();
//! match connect(&settings) {
//!     WarehouseConnection::Connected(warehouse) => { /* insert */ }
//!     WarehouseConnection::Unavailable(reason) => eprintln!("offline: {}", reason),
//! }
//! ```

#![warn(missing_docs)]

pub mod bigquery;
pub mod config;
pub mod sqlite;

use fortune_domain::traits::{InsertReport, Warehouse};
use fortune_domain::InterpretationRecord;
use thiserror::Error;
use tracing::{info, warn};

pub use bigquery::BigQueryWarehouse;
pub use config::{Backend, WarehouseSettings};
pub use sqlite::SqliteWarehouse;

/// Errors that fail a whole warehouse call
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Network or HTTP client failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Backend refused the request
    #[error("Request rejected with HTTP {status}: {message}")]
    Rejected {
        /// Response status code
        status: u16,
        /// Response body or error message
        message: String,
    },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Settings cannot describe a usable table
    #[error("Invalid warehouse settings: {0}")]
    InvalidSettings(String),
}

/// Outcome of trying to reach a warehouse at startup
#[derive(Debug)]
pub enum WarehouseConnection<W> {
    /// A live client
    Connected(W),

    /// No client; the reason is reported to the operator
    Unavailable(String),
}

impl<W> WarehouseConnection<W> {
    /// Whether a live client is available
    pub fn is_connected(&self) -> bool {
        matches!(self, WarehouseConnection::Connected(_))
    }
}

/// Any supported backend behind one type
#[derive(Debug)]
pub enum AnyWarehouse {
    /// BigQuery streaming inserts
    BigQuery(BigQueryWarehouse),

    /// Local SQLite file
    Sqlite(SqliteWarehouse),
}

impl Warehouse for AnyWarehouse {
    type Error = WarehouseError;

    fn table_name(&self) -> String {
        match self {
            AnyWarehouse::BigQuery(w) => w.table_name(),
            AnyWarehouse::Sqlite(w) => w.table_name(),
        }
    }

    async fn insert_rows(
        &mut self,
        rows: &[InterpretationRecord],
    ) -> Result<InsertReport, Self::Error> {
        match self {
            AnyWarehouse::BigQuery(w) => w.insert_rows(rows).await,
            AnyWarehouse::Sqlite(w) => w.insert_rows(rows).await,
        }
    }
}

/// Build the warehouse client described by `settings`
///
/// Construction problems are reported as [`WarehouseConnection::Unavailable`]
/// so the run can continue in fallback mode.
pub fn connect(settings: &WarehouseSettings) -> WarehouseConnection<AnyWarehouse> {
    let connection = match settings.backend {
        Backend::Disabled => {
            WarehouseConnection::Unavailable("warehouse output disabled".to_string())
        }
        Backend::BigQuery => match settings.access_token.as_deref().map(str::trim) {
            None | Some("") => WarehouseConnection::Unavailable(
                "no BigQuery credentials (access token not set)".to_string(),
            ),
            Some(token) => match BigQueryWarehouse::new(settings, token) {
                Ok(warehouse) => WarehouseConnection::Connected(AnyWarehouse::BigQuery(warehouse)),
                Err(e) => WarehouseConnection::Unavailable(format!("BigQuery client: {}", e)),
            },
        },
        Backend::Sqlite => match SqliteWarehouse::open(&settings.sqlite_path, &settings.sqlite_table()) {
            Ok(warehouse) => WarehouseConnection::Connected(AnyWarehouse::Sqlite(warehouse)),
            Err(e) => WarehouseConnection::Unavailable(format!(
                "SQLite warehouse at {}: {}",
                settings.sqlite_path.display(),
                e
            )),
        },
    };

    match &connection {
        WarehouseConnection::Connected(warehouse) => {
            info!("Connected to warehouse table {}", warehouse.table_name())
        }
        WarehouseConnection::Unavailable(reason) => {
            warn!("Warehouse unavailable: {}", reason)
        }
    }

    connection
}
