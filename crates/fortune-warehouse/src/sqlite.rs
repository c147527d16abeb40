//! SQLite warehouse
//!
//! Local stand-in for the analytics warehouse. The table is keyed by record
//! id, so re-running a capture batch reports every row as a duplicate
//! instead of storing it twice.

use crate::WarehouseError;
use chrono::{DateTime, SecondsFormat, Utc};
use fortune_domain::traits::{InsertReport, RowFailure, Warehouse};
use fortune_domain::{FortuneSystem, InterpretationRecord, RecordId, ReliabilityScore};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, warn};

const SELECT_COLUMNS: &str = "id, fortune_system, primary_key, secondary_key, context, \
     content_text, reliability_score, source_ref, captured_at";

/// SQLite-backed implementation of [`Warehouse`]
///
/// SQLite connections are not thread-safe; one run owns one instance.
#[derive(Debug)]
pub struct SqliteWarehouse {
    conn: Connection,
    table: String,
}

impl SqliteWarehouse {
    /// Open (or create) the database at `path` and ensure `table` exists
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fortune_warehouse::SqliteWarehouse;
    ///
    /// let warehouse = SqliteWarehouse::open("fortune.db", "fortune_telling_db__interpretations").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, table: &str) -> Result<Self, WarehouseError> {
        validate_identifier(table)?;
        let conn = Connection::open(path)?;
        let mut warehouse = Self {
            conn,
            table: table.to_string(),
        };
        warehouse.initialize_schema()?;
        Ok(warehouse)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), WarehouseError> {
        let schema = include_str!("schema.sql").replace("{table}", &self.table);
        self.conn.execute_batch(&schema)?;
        Ok(())
    }

    /// Number of stored rows
    pub fn count_rows(&self) -> Result<usize, WarehouseError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Every stored record, ordered by fortune system and primary key
    pub fn load_records(&self) -> Result<Vec<InterpretationRecord>, WarehouseError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY fortune_system, primary_key",
            SELECT_COLUMNS, self.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<InterpretationRecord> {
        let id: String = row.get(0)?;
        let system: String = row.get(1)?;
        let score: f64 = row.get(6)?;
        let captured_at: String = row.get(8)?;

        Ok(InterpretationRecord {
            id: RecordId::from_string(&id).map_err(|e| conversion_error(0, e))?,
            fortune_system: system
                .parse::<FortuneSystem>()
                .map_err(|e| conversion_error(1, e.to_string()))?,
            primary_key: row.get(2)?,
            secondary_key: row.get(3)?,
            context: row.get(4)?,
            content_text: row.get(5)?,
            reliability_score: ReliabilityScore::new(score)
                .map_err(|e| conversion_error(6, e.to_string()))?,
            source_ref: row.get(7)?,
            captured_at: DateTime::parse_from_rfc3339(&captured_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| conversion_error(8, e.to_string()))?,
        })
    }
}

impl Warehouse for SqliteWarehouse {
    type Error = WarehouseError;

    fn table_name(&self) -> String {
        format!("sqlite:{}", self.table)
    }

    async fn insert_rows(
        &mut self,
        rows: &[InterpretationRecord],
    ) -> Result<InsertReport, Self::Error> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            self.table, SELECT_COLUMNS
        );
        let mut report = InsertReport::default();

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in rows {
                let result = stmt.execute(params![
                    record.id.to_string(),
                    record.fortune_system.as_str(),
                    &record.primary_key,
                    &record.secondary_key,
                    &record.context,
                    &record.content_text,
                    record.reliability_score.value(),
                    &record.source_ref,
                    record.captured_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                ]);

                match result {
                    Ok(_) => report.inserted.push(record.id),
                    Err(e) => {
                        warn!("Row {} rejected: {}", record.id, e);
                        report.failed.push(RowFailure {
                            id: record.id,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        tx.commit()?;

        debug!(
            "SQLite insert into {}: {} inserted, {} failed",
            self.table,
            report.inserted.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

/// Table names are interpolated into SQL, so only `[A-Za-z0-9_]` is allowed
fn validate_identifier(name: &str) -> Result<(), WarehouseError> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(WarehouseError::InvalidSettings(format!(
            "'{}' is not a valid table name",
            name
        )))
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(validate_identifier("fortune_telling_db__interpretations").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1table").is_err());
        assert!(validate_identifier("bad-name").is_err());
        assert!(validate_identifier("x; DROP TABLE y").is_err());
    }

    #[test]
    fn test_open_rejects_bad_table_name() {
        let result = SqliteWarehouse::open(":memory:", "fortune-telling");
        assert!(matches!(result, Err(WarehouseError::InvalidSettings(_))));
    }

    #[test]
    fn test_empty_table_after_open() {
        let warehouse = SqliteWarehouse::open(":memory:", "t").unwrap();
        assert_eq!(warehouse.count_rows().unwrap(), 0);
        assert!(warehouse.load_records().unwrap().is_empty());
        assert_eq!(warehouse.table_name(), "sqlite:t");
    }
}
