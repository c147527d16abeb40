//! Integration tests for fortune-warehouse
//!
//! SQLite tests run against temporary files; BigQuery tests run against a
//! local mock of the insertAll endpoint.

use chrono::{DateTime, TimeZone, Utc};
use fortune_domain::traits::Warehouse;
use fortune_domain::{FortuneSystem, InterpretationRecord, ReliabilityScore};
use fortune_warehouse::{BigQueryWarehouse, SqliteWarehouse, WarehouseError, WarehouseSettings};
use mockito::Matcher;
use serde_json::json;

fn captured_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn record(primary_key: &str, secondary_key: Option<&str>) -> InterpretationRecord {
    InterpretationRecord::new(
        FortuneSystem::Animal,
        primary_key.to_string(),
        secondary_key.map(str::to_string),
        "General".to_string(),
        format!("{} people are known for...", primary_key),
        ReliabilityScore::new(0.9).unwrap(),
        "https://example.com/animal".to_string(),
        captured_at(),
    )
}

fn batch() -> Vec<InterpretationRecord> {
    vec![
        record("Animal_Cheetah", Some("Gold")),
        record("Animal_Wolf", Some("Gold")),
        record("Animal_Monkey", None),
    ]
}

#[tokio::test]
async fn test_sqlite_insert_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fortune.db");
    let mut warehouse = SqliteWarehouse::open(&path, "fortune_telling_db__interpretations").unwrap();

    let rows = batch();
    let report = warehouse.insert_rows(&rows).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.inserted.len(), 3);
    assert_eq!(warehouse.count_rows().unwrap(), 3);

    let mut stored = warehouse.load_records().unwrap();
    let mut expected = rows.clone();
    stored.sort_by(|a, b| a.primary_key.cmp(&b.primary_key));
    expected.sort_by(|a, b| a.primary_key.cmp(&b.primary_key));
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_sqlite_rerun_reports_duplicates_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fortune.db");

    let rows = batch();
    {
        let mut first = SqliteWarehouse::open(&path, "interpretations").unwrap();
        first.insert_rows(&rows).await.unwrap();
    }

    // Reopen the same file, as a second run would
    let mut second = SqliteWarehouse::open(&path, "interpretations").unwrap();
    let report = second.insert_rows(&rows).await.unwrap();

    assert!(report.inserted.is_empty());
    let expected_ids: Vec<_> = rows.iter().map(|r| r.id).collect();
    assert_eq!(report.failed_ids(), expected_ids);
    assert_eq!(second.count_rows().unwrap(), 3);
}

#[tokio::test]
async fn test_sqlite_partial_failure_keeps_valid_rows() {
    let mut warehouse = SqliteWarehouse::open(":memory:", "interpretations").unwrap();

    let existing = record("Animal_Pegasus", Some("Gold"));
    warehouse.insert_rows(std::slice::from_ref(&existing)).await.unwrap();

    let mut rows = batch();
    rows.insert(1, existing.clone());
    let report = warehouse.insert_rows(&rows).await.unwrap();

    assert_eq!(report.inserted.len(), 3);
    assert_eq!(report.failed_ids(), vec![existing.id]);
    assert_eq!(warehouse.count_rows().unwrap(), 4);
}

#[tokio::test]
async fn test_bigquery_maps_insert_errors_to_ids() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            "/bigquery/v2/projects/fortune-telling-484316/datasets/fortune_telling_db/tables/interpretations/insertAll",
        )
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "kind": "bigquery#tableDataInsertAllRequest",
            "skipInvalidRows": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "kind": "bigquery#tableDataInsertAllResponse",
                "insertErrors": [
                    {"index": 1, "errors": [{"reason": "invalid", "message": "no such field"}]}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut warehouse = BigQueryWarehouse::new(&WarehouseSettings::default(), "test-token")
        .unwrap()
        .with_endpoint(server.url());

    let rows = batch();
    let report = warehouse.insert_rows(&rows).await.unwrap();

    mock.assert_async().await;
    assert_eq!(report.inserted, vec![rows[0].id, rows[2].id]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, rows[1].id);
    assert!(report.failed[0].reason.contains("no such field"));
}

#[tokio::test]
async fn test_bigquery_sends_record_ids_as_insert_ids() {
    let rows = batch();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(format!(r#""insertId":"{}""#, rows[0].id)),
            Matcher::Regex(format!(r#""insertId":"{}""#, rows[1].id)),
            Matcher::Regex(format!(r#""insertId":"{}""#, rows[2].id)),
            Matcher::Regex(r#""captured_at":"2024-01-01T00:00:00Z""#.to_string()),
            Matcher::Regex(r#""secondary_key":null"#.to_string()),
        ]))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let mut warehouse = BigQueryWarehouse::new(&WarehouseSettings::default(), "t")
        .unwrap()
        .with_endpoint(server.url());
    let report = warehouse.insert_rows(&rows).await.unwrap();

    mock.assert_async().await;
    assert!(report.is_complete());
    assert_eq!(report.inserted.len(), 3);
}

#[tokio::test]
async fn test_bigquery_rejected_request_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Any)
        .with_status(403)
        .with_body("Access Denied")
        .create_async()
        .await;

    let mut warehouse = BigQueryWarehouse::new(&WarehouseSettings::default(), "expired")
        .unwrap()
        .with_endpoint(server.url());

    let result = warehouse.insert_rows(&batch()).await;
    match result {
        Err(WarehouseError::Rejected { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "Access Denied");
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bigquery_empty_batch_makes_no_request() {
    let mut warehouse = BigQueryWarehouse::new(&WarehouseSettings::default(), "t")
        .unwrap()
        .with_endpoint("http://127.0.0.1:1");

    let report = warehouse.insert_rows(&[]).await.unwrap();
    assert!(report.inserted.is_empty());
    assert!(report.failed.is_empty());
}
