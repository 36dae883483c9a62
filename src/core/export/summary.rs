//! Export summary and reporting
//!
//! This module aggregates the per-table results of one invocation.

use crate::domain::{ExportResult, JobStatus};
use crate::logging::SUMMARY_TARGET;
use std::time::Duration;

/// Process exit status when the run was interrupted by a signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// Summary of an export invocation
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Number of table exports that ran
    pub total_jobs: usize,

    /// Number of successful table exports
    pub succeeded: usize,

    /// Number of failed table exports
    pub failed: usize,

    /// Number of table exports stopped by the shutdown signal
    pub cancelled: usize,

    /// Data rows written across all tables
    pub total_rows: u64,

    /// Duration of the invocation
    pub duration: Duration,

    /// Container or folder paths that could not be used
    pub input_errors: Vec<String>,

    /// Every job result, in completion order
    pub results: Vec<ExportResult>,

    /// The shutdown signal fired during the run
    pub interrupted: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add one job result
    pub fn record(&mut self, result: ExportResult) {
        self.total_jobs += 1;
        match result.status {
            JobStatus::Succeeded => self.succeeded += 1,
            JobStatus::Cancelled => self.cancelled += 1,
            _ => self.failed += 1,
        }
        self.total_rows += result.row_count;
        self.results.push(result);
    }

    /// Add many job results
    pub fn record_all(&mut self, results: impl IntoIterator<Item = ExportResult>) {
        for result in results {
            self.record(result);
        }
    }

    /// Add an invalid-input error
    pub fn add_input_error(&mut self, message: impl Into<String>) {
        self.input_errors.push(message.into());
    }

    /// Results that did not succeed
    pub fn failures(&self) -> impl Iterator<Item = &ExportResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Check if every job succeeded and every input was valid
    pub fn is_successful(&self) -> bool {
        self.failed == 0 && self.cancelled == 0 && self.input_errors.is_empty() && !self.interrupted
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_jobs == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.total_jobs as f64) * 100.0
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.is_successful() {
            0
        } else {
            1
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            target: SUMMARY_TARGET,
            total_jobs = self.total_jobs,
            succeeded = self.succeeded,
            failed = self.failed,
            cancelled = self.cancelled,
            total_rows = self.total_rows,
            duration_secs = self.duration.as_secs_f64(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        for error in &self.input_errors {
            tracing::warn!(target: SUMMARY_TARGET, error = %error, "Input error");
        }

        for failure in self.failures() {
            tracing::warn!(
                target: SUMMARY_TARGET,
                table = %failure.table_name,
                status = ?failure.status,
                kind = ?failure.error_kind,
                error = failure.error_detail.as_deref().unwrap_or(""),
                "Table not exported"
            );
        }
    }
}
