//! Logging and observability
//!
//! Structured `tracing` events, a console layer, and optional rolling JSON
//! files. Per-table completion lines are emitted under [`SUMMARY_TARGET`]
//! so they can be routed or filtered apart from routine output, e.g.
//! `RUST_LOG=quarry=warn,quarry::summary=info`.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Target carried by job and batch summary lines
pub const SUMMARY_TARGET: &str = "quarry::summary";

/// Log the start of one table export
///
/// # Example
///
/// ```no_run
/// use quarry::log_job_start;
///
/// log_job_start!("customers", "/data/out/customers_Export.csv");
/// ```
#[macro_export]
macro_rules! log_job_start {
    ($table:expr, $output_path:expr) => {
        tracing::info!(
            table = %$table,
            output = %$output_path,
            "Starting table export"
        );
    };
}

/// Log the finish line of one table export at the summary target
///
/// Takes an [`ExportResult`](crate::domain::ExportResult).
///
/// # Example
///
/// ```no_run
/// use quarry::domain::{ExportJob, TableName};
/// use quarry::log_job_summary;
///
/// let mut job = ExportJob::new(TableName::new("orders").unwrap(), "/tmp/orders.csv");
/// job.mark_started();
/// let result = job.succeed();
/// log_job_summary!(&result);
/// ```
#[macro_export]
macro_rules! log_job_summary {
    ($result:expr) => {{
        let result = $result;
        tracing::info!(
            target: $crate::logging::SUMMARY_TARGET,
            table = %result.table_name,
            status = ?result.status,
            started_at = %result.started_at.to_rfc3339(),
            finished_at = %result.finished_at.to_rfc3339(),
            elapsed_secs = result.duration.as_secs_f64(),
            rows = result.row_count,
            "Table export finished"
        );
    }};
}
