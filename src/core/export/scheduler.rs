//! Shared job scheduler
//!
//! Every table export of an invocation goes through one [`JobScheduler`].
//! Its semaphore has as many permits as the connection pool has
//! connections, so a job only reaches the pool once a connection is free
//! for it and queued jobs wait here instead of in the pool's checkout queue.

use super::job::TableExportJob;
use crate::domain::{ExportJob, ExportResult, QuarryError, TableName};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Bounded worker pool for table exports
#[derive(Clone)]
pub struct JobScheduler {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl JobScheduler {
    /// Create a scheduler running at most `capacity` jobs at once
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Maximum number of concurrently running jobs
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Submit one job per table and wait for all of them
    ///
    /// Results come back in completion order. A job whose task panics is
    /// reported as failed rather than dropped.
    pub async fn run_all(
        &self,
        tables: Vec<TableName>,
        job: Arc<TableExportJob>,
    ) -> Vec<ExportResult> {
        let mut set = JoinSet::new();
        let mut pending = HashMap::with_capacity(tables.len());

        for table in tables {
            let permits = Arc::clone(&self.permits);
            let job_runner = Arc::clone(&job);
            let task_table = table.clone();

            let handle = set.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return not_run(
                        &job_runner,
                        task_table,
                        &QuarryError::Cancelled("job scheduler closed".to_string()),
                    );
                };
                job_runner.run(&task_table).await
            });
            pending.insert(handle.id(), table);
        }

        let mut results = Vec::with_capacity(pending.len());
        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((id, result)) => {
                    pending.remove(&id);
                    results.push(result);
                }
                Err(e) => {
                    let Some(table) = pending.remove(&e.id()) else {
                        tracing::error!(error = %e, "Unknown export task failed");
                        continue;
                    };
                    tracing::error!(table = %table, error = %e, "Export task panicked");
                    results.push(not_run(
                        &job,
                        table,
                        &QuarryError::Other(format!("export task aborted: {e}")),
                    ));
                }
            }
        }

        results
    }

    /// Refuse further jobs
    ///
    /// Jobs still waiting for a slot, and any submitted later, finish as
    /// cancelled without touching the connection pool.
    pub fn close(&self) {
        self.permits.close();
    }
}

/// Result for a job that never produced its own
fn not_run(job: &TableExportJob, table: TableName, error: &QuarryError) -> ExportResult {
    let output_path = job.output_path(&table);
    let mut record = ExportJob::new(table, output_path);
    record.mark_started();
    record.fail(error)
}

impl std::fmt::Debug for JobScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobScheduler")
            .field("capacity", &self.capacity)
            .field("available", &self.permits.available_permits())
            .finish()
    }
}
