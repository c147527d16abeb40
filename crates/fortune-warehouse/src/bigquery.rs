//! BigQuery warehouse
//!
//! Writes a batch with a single `tabledata.insertAll` streaming call.
//! Each row carries its record id as `insertId`, so BigQuery's best-effort
//! deduplication drops rows re-sent by a re-run of the same batch.
//! Row-level `insertErrors` are mapped back to record ids; valid rows are
//! still written (`skipInvalidRows`).

use crate::{WarehouseError, WarehouseSettings};
use fortune_domain::traits::{InsertReport, RowFailure, Warehouse};
use fortune_domain::InterpretationRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Public BigQuery REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com";

/// BigQuery streaming-insert client for one table
pub struct BigQueryWarehouse {
    client: reqwest::Client,
    endpoint: String,
    project_id: String,
    dataset_id: String,
    table: String,
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllRequest<'a> {
    kind: &'static str,
    skip_invalid_rows: bool,
    rows: Vec<InsertAllRow<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllRow<'a> {
    insert_id: String,
    json: &'a InterpretationRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<RowErrors>,
}

#[derive(Deserialize)]
struct RowErrors {
    index: usize,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Deserialize)]
struct ErrorProto {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

impl BigQueryWarehouse {
    /// Create a client for the table described by `settings`
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: &WarehouseSettings, access_token: &str) -> Result<Self, WarehouseError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| WarehouseError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: settings.project_id.clone(),
            dataset_id: settings.dataset_id.clone(),
            table: settings.table.clone(),
            access_token: access_token.to_string(),
        })
    }

    /// Point the client at another endpoint (emulators, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn insert_all_url(&self) -> String {
        format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.endpoint, self.project_id, self.dataset_id, self.table
        )
    }

    fn build_report(
        rows: &[InterpretationRecord],
        response: InsertAllResponse,
    ) -> InsertReport {
        let mut failures: HashMap<usize, String> = HashMap::new();
        for row_errors in response.insert_errors {
            if row_errors.index >= rows.len() {
                warn!("insertAll reported error for unknown row index {}", row_errors.index);
                continue;
            }
            let reason = row_errors
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.reason, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            failures.insert(row_errors.index, reason);
        }

        let mut report = InsertReport::default();
        for (index, record) in rows.iter().enumerate() {
            match failures.remove(&index) {
                Some(reason) => report.failed.push(RowFailure {
                    id: record.id,
                    reason,
                }),
                None => report.inserted.push(record.id),
            }
        }
        report
    }
}

impl fmt::Debug for BigQueryWarehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigQueryWarehouse")
            .field("endpoint", &self.endpoint)
            .field("table", &self.table_name())
            .finish_non_exhaustive()
    }
}

impl Warehouse for BigQueryWarehouse {
    type Error = WarehouseError;

    fn table_name(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table)
    }

    async fn insert_rows(
        &mut self,
        rows: &[InterpretationRecord],
    ) -> Result<InsertReport, Self::Error> {
        if rows.is_empty() {
            return Ok(InsertReport::default());
        }

        let request = InsertAllRequest {
            kind: "bigquery#tableDataInsertAllRequest",
            skip_invalid_rows: true,
            rows: rows
                .iter()
                .map(|record| InsertAllRow {
                    insert_id: record.id.to_string(),
                    json: record,
                })
                .collect(),
        };

        debug!("insertAll {} rows into {}", rows.len(), self.table_name());

        let response = self
            .client
            .post(self.insert_all_url())
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| WarehouseError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WarehouseError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: InsertAllResponse = response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(Self::build_report(rows, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_all_url() {
        let warehouse = BigQueryWarehouse::new(&WarehouseSettings::default(), "token")
            .unwrap()
            .with_endpoint("http://localhost:9050/");
        assert_eq!(
            warehouse.insert_all_url(),
            "http://localhost:9050/bigquery/v2/projects/fortune-telling-484316/datasets/fortune_telling_db/tables/interpretations/insertAll"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let warehouse = BigQueryWarehouse::new(&WarehouseSettings::default(), "secret-token").unwrap();
        let rendered = format!("{:?}", warehouse);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("fortune_telling_db"));
    }

    #[test]
    fn test_parse_response_without_errors() {
        let parsed: InsertAllResponse =
            serde_json::from_str(r#"{"kind": "bigquery#tableDataInsertAllResponse"}"#).unwrap();
        assert!(parsed.insert_errors.is_empty());
    }
}
