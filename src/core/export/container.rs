//! Container resolution
//!
//! Reads a container file and dispatches one table export per entry to the
//! shared scheduler.

use super::job::TableExportJob;
use super::scheduler::JobScheduler;
use crate::domain::{ContainerSpec, ExportResult, JobStatus};
use crate::logging::SUMMARY_TARGET;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// What happened to one container
#[derive(Debug)]
pub enum ContainerOutcome {
    /// The container was read and its entries were exported
    Dispatched(Vec<ExportResult>),
    /// The container path was missing, not a file, or unreadable
    InputNotFound(String),
}

impl ContainerOutcome {
    /// Results of the dispatched jobs (empty for invalid input)
    pub fn results(&self) -> &[ExportResult] {
        match self {
            ContainerOutcome::Dispatched(results) => results,
            ContainerOutcome::InputNotFound(_) => &[],
        }
    }

    /// Consume the outcome, keeping the results
    pub fn into_results(self) -> Vec<ExportResult> {
        match self {
            ContainerOutcome::Dispatched(results) => results,
            ContainerOutcome::InputNotFound(_) => Vec::new(),
        }
    }

    /// Whether the container itself could not be used
    pub fn is_input_error(&self) -> bool {
        matches!(self, ContainerOutcome::InputNotFound(_))
    }
}

/// Turns container files into table export jobs
pub struct ContainerResolver {
    scheduler: JobScheduler,
    job: Arc<TableExportJob>,
}

impl ContainerResolver {
    /// Create a resolver submitting to `scheduler`
    pub fn new(scheduler: JobScheduler, job: Arc<TableExportJob>) -> Self {
        Self { scheduler, job }
    }

    /// Export every table listed in a container
    ///
    /// An invalid container is logged and yields no results.
    pub async fn resolve(&self, path: &Path) -> Vec<ExportResult> {
        self.resolve_outcome(path).await.into_results()
    }

    /// Export every table listed in a container, reporting invalid input
    pub async fn resolve_outcome(&self, path: &Path) -> ContainerOutcome {
        let spec = match ContainerSpec::from_file(path).await {
            Ok(spec) => spec,
            Err(e) => {
                tracing::error!(container = %path.display(), error = %e, "Container skipped");
                return ContainerOutcome::InputNotFound(e.to_string());
            }
        };

        tracing::info!(
            container = %path.display(),
            entries = spec.len(),
            "Resolving container"
        );

        let start = Instant::now();
        let results = self
            .scheduler
            .run_all(spec.entries, Arc::clone(&self.job))
            .await;

        let failed = results
            .iter()
            .filter(|r| r.status == JobStatus::Failed)
            .count();
        let cancelled = results
            .iter()
            .filter(|r| r.status == JobStatus::Cancelled)
            .count();

        tracing::info!(
            target: SUMMARY_TARGET,
            container = %path.display(),
            processed = results.len(),
            failed,
            cancelled,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Container finished"
        );

        ContainerOutcome::Dispatched(results)
    }
}
