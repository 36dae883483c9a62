//! Single-table export
//!
//! A [`TableExportJob`] streams one table into one delimited file. Every
//! failure is caught here and turned into a failed [`ExportResult`]; nothing
//! propagates to sibling jobs or to the caller.
//!
//! The output file appears only when the export completed: rows are
//! streamed into a staging file in the same directory and renamed into
//! place at the end.

use crate::adapters::database::{ConnectionPool, TableStream};
use crate::config::QuarryConfig;
use crate::core::serialize::{RowSerializer, LINE_TERMINATOR};
use crate::domain::{ExportJob, ExportResult, QuarryError, Result, TableName};
use crate::{log_job_start, log_job_summary};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::watch;
use uuid::Uuid;

/// Rows written between two checks of the shutdown signal
pub const CANCEL_CHECK_INTERVAL: u64 = 1_000;

/// Exports one table per call to [`run`](Self::run)
///
/// Holds only shared, read-only state, so one instance serves every job of
/// an invocation.
pub struct TableExportJob {
    config: Arc<QuarryConfig>,
    pool: Arc<dyn ConnectionPool>,
    serializer: RowSerializer,
    shutdown: watch::Receiver<bool>,
}

impl TableExportJob {
    /// Create the job runner
    pub fn new(
        config: Arc<QuarryConfig>,
        pool: Arc<dyn ConnectionPool>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let serializer = RowSerializer::from_config(&config.output);
        Self {
            config,
            pool,
            serializer,
            shutdown,
        }
    }

    /// Destination file for a table
    pub fn output_path(&self, table: &TableName) -> PathBuf {
        self.config.output.file_path(table.as_str())
    }

    /// Export one table
    ///
    /// Never fails: errors are logged with the table name and recorded on
    /// the returned result.
    pub async fn run(&self, table: &TableName) -> ExportResult {
        let mut job = ExportJob::new(table.clone(), self.output_path(table));
        job.mark_started();
        log_job_start!(table, job.output_path().display());

        let result = match self.export(&mut job).await {
            Ok(()) => job.succeed(),
            Err(QuarryError::Cancelled(reason)) => {
                tracing::warn!(table = %table, reason = %reason, "Table export cancelled");
                job.fail(&QuarryError::Cancelled(reason))
            }
            Err(e) => {
                tracing::error!(
                    table = %table,
                    kind = ?e.kind(),
                    error = %e,
                    "Table export failed"
                );
                job.fail(&e)
            }
        };

        log_job_summary!(&result);
        result
    }

    async fn export(&self, job: &mut ExportJob) -> Result<()> {
        self.check_cancelled()?;

        let table = job.table_name().clone();
        if self.config.input.validate_identifiers && !table.is_plain_identifier() {
            return Err(QuarryError::QueryExecution(format!(
                "Table name '{table}' is not a valid identifier"
            )));
        }

        let mut connection = self.pool.acquire().await?;
        let stream = connection.query_table(table.as_str()).await?;

        // Only a complete staging file is renamed over the output
        let path = job.output_path().to_path_buf();
        let staging = staging_path(&path);
        let outcome = match self.write_file(&staging, stream, job).await {
            Ok(()) => tokio::fs::rename(&staging, &path)
                .await
                .map_err(|e| output_error(&path, e)),
            Err(e) => Err(e),
        };
        if outcome.is_err() {
            if let Err(e) = tokio::fs::remove_file(&staging).await {
                tracing::debug!(path = %staging.display(), error = %e, "Partial output not removed");
            }
        }
        outcome
    }

    async fn write_file(
        &self,
        path: &Path,
        stream: TableStream<'_>,
        job: &mut ExportJob,
    ) -> Result<()> {
        let TableStream { columns, mut rows } = stream;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| output_error(parent, e))?;
        }
        let file = tokio::fs::File::create(path)
            .await
            .map_err(|e| output_error(path, e))?;
        let mut writer = BufWriter::new(file);

        if let Some(header) = self.serializer.header(&columns)? {
            write_line(&mut writer, &header, path).await?;
        }

        let mut since_check = 0;
        while let Some(row) = rows.next().await {
            let line = self.serializer.serialize(&row?)?;
            write_line(&mut writer, &line, path).await?;
            job.record_rows(1);

            since_check += 1;
            if since_check == CANCEL_CHECK_INTERVAL {
                since_check = 0;
                self.check_cancelled()?;
            }
        }

        writer.flush().await.map_err(|e| output_error(path, e))?;
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        if *self.shutdown.borrow() {
            return Err(QuarryError::Cancelled(
                "shutdown signal received".to_string(),
            ));
        }
        Ok(())
    }
}

async fn write_line(writer: &mut BufWriter<tokio::fs::File>, line: &str, path: &Path) -> Result<()> {
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| output_error(path, e))?;
    writer
        .write_all(LINE_TERMINATOR.as_bytes())
        .await
        .map_err(|e| output_error(path, e))
}

/// Hidden sibling of `path`, unique per job
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.partial", Uuid::new_v4().simple()))
}

fn output_error(path: &Path, err: std::io::Error) -> QuarryError {
    QuarryError::OutputWrite(format!("{}: {}", path.display(), err))
}
