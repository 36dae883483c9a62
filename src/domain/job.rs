//! Export job lifecycle
//!
//! An [`ExportJob`] tracks one table's export while a worker owns it. Finishing
//! the job consumes it and yields an immutable [`ExportResult`].

use crate::domain::errors::{JobErrorKind, QuarryError};
use crate::domain::ids::TableName;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet picked up by a worker
    #[default]
    Pending,
    /// A worker is exporting the table
    Running,
    /// Every row was written
    Succeeded,
    /// The export stopped on an error
    Failed,
    /// The export stopped on the shutdown signal
    Cancelled,
}

impl JobStatus {
    /// Whether the status is final
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// A table export in progress
///
/// # Examples
///
/// ```
/// use quarry::domain::job::{ExportJob, JobStatus};
/// use quarry::domain::ids::TableName;
///
/// let mut job = ExportJob::new(TableName::new("orders").unwrap(), "data/orders.txt");
/// assert_eq!(job.status(), JobStatus::Pending);
///
/// job.mark_started();
/// job.record_rows(3);
/// let result = job.succeed();
///
/// assert_eq!(result.status, JobStatus::Succeeded);
/// assert_eq!(result.row_count, 3);
/// ```
#[derive(Debug)]
pub struct ExportJob {
    table_name: TableName,
    output_path: PathBuf,
    started_at: Option<DateTime<Utc>>,
    clock: Option<Instant>,
    row_count: u64,
    status: JobStatus,
}

impl ExportJob {
    /// Create a pending job
    pub fn new(table_name: TableName, output_path: impl Into<PathBuf>) -> Self {
        Self {
            table_name,
            output_path: output_path.into(),
            started_at: None,
            clock: None,
            row_count: 0,
            status: JobStatus::Pending,
        }
    }

    /// Table being exported
    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    /// Destination file
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Current status
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Rows written so far
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Start time, once running
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Transition Pending -> Running and start the clock
    pub fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
        self.clock = Some(Instant::now());
        self.status = JobStatus::Running;
    }

    /// Add to the in-stream row counter
    pub fn record_rows(&mut self, rows: u64) {
        self.row_count += rows;
    }

    /// Finish as Succeeded
    pub fn succeed(self) -> ExportResult {
        self.finish(JobStatus::Succeeded, None)
    }

    /// Finish as Failed, or Cancelled when the error is a cancellation
    pub fn fail(self, error: &QuarryError) -> ExportResult {
        let status = match error {
            QuarryError::Cancelled(_) => JobStatus::Cancelled,
            _ => JobStatus::Failed,
        };
        self.finish(status, Some((error.kind(), error.to_string())))
    }

    fn finish(self, status: JobStatus, error: Option<(JobErrorKind, String)>) -> ExportResult {
        let finished_at = Utc::now();
        let duration = self.clock.map(|c| c.elapsed()).unwrap_or_default();
        let (error_kind, error_detail) = match error {
            Some((kind, detail)) => (Some(kind), Some(detail)),
            None => (None, None),
        };

        ExportResult {
            table_name: self.table_name,
            output_path: self.output_path,
            started_at: self.started_at.unwrap_or(finished_at),
            finished_at,
            row_count: self.row_count,
            duration,
            status,
            error_kind,
            error_detail,
        }
    }
}

/// Immutable outcome of one table export
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Exported table
    pub table_name: TableName,
    /// File the rows were written to
    pub output_path: PathBuf,
    /// When the job started running (finish time if it never ran)
    pub started_at: DateTime<Utc>,
    /// When the job reached its terminal status
    pub finished_at: DateTime<Utc>,
    /// Data rows written, header excluded
    pub row_count: u64,
    /// Wall-clock time spent running
    pub duration: Duration,
    /// Terminal status
    pub status: JobStatus,
    /// Failure classification
    pub error_kind: Option<JobErrorKind>,
    /// Failure message
    pub error_detail: Option<String>,
}

impl ExportResult {
    /// Elapsed time in milliseconds
    pub fn duration_millis(&self) -> u128 {
        self.duration.as_millis()
    }

    /// Whether the job succeeded
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}
