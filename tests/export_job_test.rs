//! Integration tests for single-table export jobs
//!
//! These tests verify that:
//! - Output files are named and formatted from the output configuration
//! - Row counts come from the stream, header excluded
//! - Re-running a job is deterministic
//! - Failures are recorded on the result, never raised

mod common;

use common::{test_config, FakePool, FakeTable};
use quarry::config::QuoteStyle;
use quarry::core::export::TableExportJob;
use quarry::domain::{CellValue, JobErrorKind, JobStatus, TableName};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn customers() -> FakeTable {
    FakeTable::new(
        &["id", "name", "note"],
        vec![
            vec![CellValue::Int(1), CellValue::from("Ada"), CellValue::Null],
            vec![
                CellValue::Int(2),
                CellValue::from("Grace"),
                CellValue::from("said \"hi\""),
            ],
        ],
    )
}

fn job_for(config: quarry::config::QuarryConfig, pool: &FakePool) -> TableExportJob {
    let (_tx, rx) = watch::channel(false);
    TableExportJob::new(Arc::new(config), pool.clone().into_dyn(), rx)
}

fn table(name: &str) -> TableName {
    TableName::new(name).unwrap()
}

#[tokio::test]
async fn test_export_with_header() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(2).table("customers", customers()).build();
    let job = job_for(test_config(dir.path()), &pool);

    let result = job.run(&table("customers")).await;

    assert_eq!(result.status, JobStatus::Succeeded);
    assert_eq!(result.row_count, 2);
    assert!(result.error_detail.is_none());
    assert_eq!(result.output_path, dir.path().join("customers_Export.csv"));

    let contents = std::fs::read_to_string(&result.output_path).unwrap();
    assert_eq!(
        contents,
        "id,name,note\n1,Ada,\n2,Grace,\"said \"\"hi\"\"\"\n"
    );
}

#[tokio::test]
async fn test_export_without_header() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.output.include_header = false;
    config.output.delimiter = "|".to_string();

    let pool = FakePool::new(2).table("customers", customers()).build();
    let job = job_for(config, &pool);

    let result = job.run(&table("customers")).await;

    assert_eq!(result.row_count, 2);
    let contents = std::fs::read_to_string(&result.output_path).unwrap();
    assert!(!contents.contains("id|name"));
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.starts_with("1|Ada|\n"));
}

#[tokio::test]
async fn test_empty_table_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1)
        .table("empty", FakeTable::new(&["a", "b"], Vec::new()))
        .build();
    let job = job_for(test_config(dir.path()), &pool);

    let result = job.run(&table("empty")).await;

    assert_eq!(result.status, JobStatus::Succeeded);
    assert_eq!(result.row_count, 0);
    assert_eq!(std::fs::read_to_string(&result.output_path).unwrap(), "a,b\n");
}

#[tokio::test]
async fn test_output_file_naming() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir.path().join("nested").join("out"));
    config.output.prefix = "daily_".to_string();
    config.output.suffix = "_v2".to_string();
    config.output.extension = "txt".to_string();

    let pool = FakePool::new(1).table("orders", FakeTable::numbered(3)).build();
    let job = job_for(config, &pool);

    let result = job.run(&table("orders")).await;

    let expected = dir.path().join("nested").join("out").join("daily_orders_v2.txt");
    assert_eq!(result.output_path, expected);
    assert!(expected.is_file());
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1).table("orders", FakeTable::numbered(250)).build();
    let job = job_for(test_config(dir.path()), &pool);

    let first = job.run(&table("orders")).await;
    let first_bytes = std::fs::read(&first.output_path).unwrap();
    let second = job.run(&table("orders")).await;
    let second_bytes = std::fs::read(&second.output_path).unwrap();

    assert_eq!(first.row_count, 250);
    assert_eq!(first.row_count, second.row_count);
    assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn test_quotes_round_trip_through_csv_reader() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1)
        .table(
            "notes",
            FakeTable::new(&["body"], vec![vec![CellValue::from("a\"b")]]),
        )
        .build();
    let job = job_for(test_config(dir.path()), &pool);

    let result = job.run(&table("notes")).await;
    let contents = std::fs::read_to_string(&result.output_path).unwrap();
    assert!(contents.contains("a\"\"b"));

    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[0], "a\"b");
}

#[tokio::test]
async fn test_escape_only_never_wraps() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.output.include_header = false;
    config.output.quote_style = QuoteStyle::EscapeOnly;

    let pool = FakePool::new(1)
        .table(
            "notes",
            FakeTable::new(&["body"], vec![vec![CellValue::from("a\"b")]]),
        )
        .build();
    let job = job_for(config, &pool);

    let result = job.run(&table("notes")).await;
    assert_eq!(
        std::fs::read_to_string(&result.output_path).unwrap(),
        "a\"\"b\n"
    );
}

#[tokio::test]
async fn test_missing_table_fails_without_file() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1).build();
    let job = job_for(test_config(dir.path()), &pool);

    let result = job.run(&table("missing")).await;

    assert_eq!(result.status, JobStatus::Failed);
    assert_eq!(result.error_kind, Some(JobErrorKind::QueryExecution));
    assert!(result
        .error_detail
        .as_deref()
        .unwrap()
        .contains("does not exist"));
    assert!(!result.output_path.exists());
    assert_eq!(pool.active(), 0);
}

#[tokio::test]
async fn test_stream_error_removes_partial_file() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1)
        .table("orders", FakeTable::numbered(10).failing_at(4))
        .build();
    let job = job_for(test_config(dir.path()), &pool);

    let result = job.run(&table("orders")).await;

    assert_eq!(result.status, JobStatus::Failed);
    assert_eq!(result.error_kind, Some(JobErrorKind::QueryExecution));
    assert_eq!(result.row_count, 4);
    assert!(!result.output_path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_export_leaves_no_staging_file() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1)
        .table("orders", FakeTable::numbered(6))
        .fail_first_stream("orders")
        .build();
    let job = job_for(test_config(dir.path()), &pool);

    let failed = job.run(&table("orders")).await;
    assert_eq!(failed.status, JobStatus::Failed);
    assert!(!failed.output_path.exists());

    let retried = job.run(&table("orders")).await;
    assert_eq!(retried.status, JobStatus::Succeeded);
    let written = std::fs::read(&retried.output_path).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    assert!(written.ends_with(b"5,row-5\n"));
}

#[tokio::test]
async fn test_unwritable_location_is_output_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let pool = FakePool::new(1).table("orders", FakeTable::numbered(1)).build();
    let job = job_for(test_config(&blocker), &pool);

    let result = job.run(&table("orders")).await;

    assert_eq!(result.status, JobStatus::Failed);
    assert_eq!(result.error_kind, Some(JobErrorKind::OutputWrite));
}

#[tokio::test]
async fn test_identifier_validation_rejects_before_connecting() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.input.validate_identifiers = true;

    let pool = FakePool::new(1).table("orders", FakeTable::numbered(1)).build();
    let job = job_for(config, &pool);

    let rejected = job.run(&table("orders; DROP TABLE orders")).await;
    assert_eq!(rejected.status, JobStatus::Failed);
    assert_eq!(rejected.error_kind, Some(JobErrorKind::QueryExecution));
    assert_eq!(pool.acquired(), 0);

    let accepted = job.run(&table("orders")).await;
    assert_eq!(accepted.status, JobStatus::Succeeded);
    assert_eq!(pool.acquired(), 1);
}

#[tokio::test]
async fn test_result_timing() {
    let dir = TempDir::new().unwrap();
    let pool = FakePool::new(1).table("orders", FakeTable::numbered(5)).build();
    let job = job_for(test_config(dir.path()), &pool);

    let result = job.run(&table("orders")).await;

    assert!(result.finished_at >= result.started_at);
    assert_eq!(result.duration_millis(), result.duration.as_millis());
}
