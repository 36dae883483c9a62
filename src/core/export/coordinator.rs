//! Export coordinator
//!
//! This module provides the top-level entry points of the export engine:
//! one table, one container, or a folder of containers.

use super::container::{ContainerOutcome, ContainerResolver};
use super::job::TableExportJob;
use super::scheduler::JobScheduler;
use super::summary::ExportSummary;
use crate::adapters::database::ConnectionPool;
use crate::config::QuarryConfig;
use crate::domain::{ContainerSpec, ExportTarget, QuarryError, Result, TableName};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Drives the export of an [`ExportTarget`]
///
/// Every job goes through one [`JobScheduler`] sized to the connection pool.
pub struct ExportCoordinator {
    config: Arc<QuarryConfig>,
    scheduler: JobScheduler,
    job: Arc<TableExportJob>,
    resolver: ContainerResolver,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        config: Arc<QuarryConfig>,
        pool: Arc<dyn ConnectionPool>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let scheduler = JobScheduler::new(pool.max_size());
        let job = Arc::new(TableExportJob::new(
            Arc::clone(&config),
            pool,
            shutdown.clone(),
        ));
        let resolver = ContainerResolver::new(scheduler.clone(), Arc::clone(&job));

        Self {
            config,
            scheduler,
            job,
            resolver,
            shutdown,
        }
    }

    /// Export whatever the target names
    pub async fn execute(&self, target: &ExportTarget) -> ExportSummary {
        tracing::info!(
            export_target = %target,
            parallelism = self.scheduler.capacity(),
            "Starting export"
        );

        match target {
            ExportTarget::Table(name) => self.run_table(name).await,
            ExportTarget::Container(path) => self.run_single_container(path).await,
            ExportTarget::ContainerFolder(Some(path)) => self.run_folder(path).await,
            ExportTarget::ContainerFolder(None) => match self.default_folder() {
                Ok(path) => self.run_folder(&path).await,
                Err(e) => {
                    tracing::error!(error = %e, "No container folder to export");
                    let mut summary = ExportSummary::new();
                    summary.add_input_error(e.to_string());
                    self.finish(summary, Instant::now())
                }
            },
        }
    }

    /// Export a single table
    pub async fn run_table(&self, table: &TableName) -> ExportSummary {
        let start = Instant::now();
        let mut summary = ExportSummary::new();
        summary.record_all(
            self.scheduler
                .run_all(vec![table.clone()], Arc::clone(&self.job))
                .await,
        );
        self.finish(summary, start)
    }

    /// Export every table of one container
    pub async fn run_single_container(&self, path: &Path) -> ExportSummary {
        let start = Instant::now();
        let mut summary = ExportSummary::new();
        absorb(&mut summary, self.resolver.resolve_outcome(path).await);
        self.finish(summary, start)
    }

    /// Export every container directly inside a folder
    ///
    /// Containers are resolved concurrently; the scheduler alone bounds how
    /// many tables export at once.
    pub async fn run_folder(&self, path: &Path) -> ExportSummary {
        let start = Instant::now();
        let mut summary = ExportSummary::new();

        let containers = match list_containers(path).await {
            Ok(containers) => containers,
            Err(e) => {
                tracing::error!(folder = %path.display(), error = %e, "Container folder skipped");
                summary.add_input_error(e.to_string());
                return self.finish(summary, start);
            }
        };

        tracing::info!(
            folder = %path.display(),
            containers = containers.len(),
            "Resolving container folder"
        );

        let outcomes = futures::future::join_all(
            containers
                .iter()
                .map(|container| self.resolver.resolve_outcome(container)),
        )
        .await;

        for outcome in outcomes {
            absorb(&mut summary, outcome);
        }

        self.finish(summary, start)
    }

    fn default_folder(&self) -> Result<PathBuf> {
        default_folder(&self.config)
    }

    fn finish(&self, summary: ExportSummary, start: Instant) -> ExportSummary {
        let mut summary = summary.with_duration(start.elapsed());
        summary.interrupted = *self.shutdown.borrow() || summary.cancelled > 0;
        summary.log_summary();
        summary
    }
}

fn absorb(summary: &mut ExportSummary, outcome: ContainerOutcome) {
    match outcome {
        ContainerOutcome::Dispatched(results) => summary.record_all(results),
        ContainerOutcome::InputNotFound(reason) => summary.add_input_error(reason),
    }
}

fn default_folder(config: &QuarryConfig) -> Result<PathBuf> {
    config
        .input
        .container_location
        .as_deref()
        .map(PathBuf::from)
        .ok_or_else(|| {
            QuarryError::Configuration(
                "input.container_location is not configured and no folder was given".to_string(),
            )
        })
}

/// Regular files directly inside `folder`, sorted by path
///
/// # Errors
///
/// Returns [`QuarryError::InputNotFound`] if the folder is missing or not a
/// directory.
pub async fn list_containers(folder: &Path) -> Result<Vec<PathBuf>> {
    let metadata = tokio::fs::metadata(folder).await.map_err(|e| {
        QuarryError::InputNotFound(format!("container folder {}: {}", folder.display(), e))
    })?;
    if !metadata.is_dir() {
        return Err(QuarryError::InputNotFound(format!(
            "container folder {} is not a directory",
            folder.display()
        )));
    }

    let mut containers = Vec::new();
    let mut entries = tokio::fs::read_dir(folder).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => containers.push(path),
            Ok(_) => tracing::debug!(path = %path.display(), "Skipping non-file entry"),
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }

    containers.sort();
    Ok(containers)
}

/// One table export a run would perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedExport {
    /// Container the table was listed in, if any
    pub container: Option<PathBuf>,
    /// Table to export
    pub table: TableName,
    /// File it would be written to
    pub output_path: PathBuf,
}

/// Everything a run would do, computed without touching the database
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    /// Planned table exports in dispatch order
    pub exports: Vec<PlannedExport>,
    /// Inputs that could not be used
    pub input_errors: Vec<String>,
}

impl ExportPlan {
    fn add_container(&mut self, config: &QuarryConfig, spec: ContainerSpec) {
        let container = spec.source_path;
        self.exports
            .extend(spec.entries.into_iter().map(|table| PlannedExport {
                container: Some(container.clone()),
                output_path: config.output.file_path(table.as_str()),
                table,
            }));
    }
}

/// Resolve a target into the list of table exports it would run
///
/// Used for dry runs: containers are read, nothing is queried or written.
pub async fn plan_exports(config: &QuarryConfig, target: &ExportTarget) -> ExportPlan {
    let mut plan = ExportPlan::default();

    let containers = match target {
        ExportTarget::Table(table) => {
            plan.exports.push(PlannedExport {
                container: None,
                table: table.clone(),
                output_path: config.output.file_path(table.as_str()),
            });
            return plan;
        }
        ExportTarget::Container(path) => vec![path.clone()],
        ExportTarget::ContainerFolder(folder) => {
            let folder = match folder {
                Some(folder) => Ok(folder.clone()),
                None => default_folder(config),
            };
            match folder {
                Ok(folder) => match list_containers(&folder).await {
                    Ok(containers) => containers,
                    Err(e) => {
                        plan.input_errors.push(e.to_string());
                        return plan;
                    }
                },
                Err(e) => {
                    plan.input_errors.push(e.to_string());
                    return plan;
                }
            }
        }
    };

    for container in containers {
        match ContainerSpec::from_file(&container).await {
            Ok(spec) => plan.add_container(config, spec),
            Err(e) => plan.input_errors.push(e.to_string()),
        }
    }

    plan
}
