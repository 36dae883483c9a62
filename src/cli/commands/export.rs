//! Export command implementation
//!
//! This module implements the `export` command: one table, one container,
//! or a folder of containers.

use super::{EXIT_CONFIG, EXIT_CONNECTION};
use crate::adapters::database::create_connection_pool;
use crate::config::{load_config, QuarryConfig};
use crate::core::export::{plan_exports, ExportCoordinator, ExportSummary};
use crate::domain::{ExportTarget, QuarryError, TableName};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// What to export
    #[command(subcommand)]
    pub target: TargetCommand,

    /// Resolve inputs and list the planned files without querying
    #[arg(long, global = true)]
    pub dry_run: bool,
}

/// Export target selection
#[derive(Subcommand, Debug)]
pub enum TargetCommand {
    /// Export a single table
    Table {
        /// Table name, used verbatim in the query
        name: String,
    },

    /// Export every table listed in a container file
    Container {
        /// Container file path
        path: PathBuf,
    },

    /// Export every container file in a folder
    Folder {
        /// Folder path (defaults to input.container_location)
        path: Option<PathBuf>,
    },
}

impl TargetCommand {
    /// Convert into the engine's target
    pub fn to_export_target(&self) -> crate::domain::Result<ExportTarget> {
        Ok(match self {
            TargetCommand::Table { name } => {
                ExportTarget::Table(TableName::new(name.as_str()).map_err(QuarryError::Other)?)
            }
            TargetCommand::Container { path } => ExportTarget::Container(path.clone()),
            TargetCommand::Folder { path } => ExportTarget::ContainerFolder(path.clone()),
        })
    }
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration validation failed: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let target = match self.target.to_export_target() {
            Ok(target) => target,
            Err(e) => {
                eprintln!("Invalid export target: {e}");
                return Ok(1);
            }
        };

        if self.dry_run {
            return Ok(dry_run(&config, &target).await);
        }

        let pool = match create_connection_pool(&config.database) {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create connection pool");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_CONNECTION);
            }
        };

        if let Err(e) = pool.test_connection().await {
            tracing::error!(error = %e, "Database is not reachable");
            eprintln!("Failed to connect to the database: {e}");
            return Ok(EXIT_CONNECTION);
        }

        println!("Exporting {target}");
        println!();

        let coordinator = ExportCoordinator::new(Arc::new(config), pool, shutdown_signal);
        let summary = coordinator.execute(&target).await;

        print_summary(&summary);
        Ok(summary.exit_code())
    }
}

async fn dry_run(config: &QuarryConfig, target: &ExportTarget) -> i32 {
    tracing::info!("Dry run mode enabled - no queries will run");
    println!("DRY RUN - no queries will run and no files will be written");
    println!();

    let plan = plan_exports(config, target).await;
    for export in &plan.exports {
        match &export.container {
            Some(container) => println!(
                "  {} -> {}  ({})",
                export.table,
                export.output_path.display(),
                container.display()
            ),
            None => println!("  {} -> {}", export.table, export.output_path.display()),
        }
    }
    println!();
    println!("{} table(s) would be exported", plan.exports.len());

    if plan.input_errors.is_empty() {
        0
    } else {
        for error in &plan.input_errors {
            println!("  - {error}");
        }
        1
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary:");
    println!("  Tables: {}", summary.total_jobs);
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Failed: {}", summary.failed);
    println!("  Cancelled: {}", summary.cancelled);
    println!("  Rows written: {}", summary.total_rows);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if !summary.input_errors.is_empty() {
        println!("Invalid input:");
        for error in &summary.input_errors {
            println!("  - {error}");
        }
        println!();
    }

    let mut failures = summary.failures().peekable();
    if failures.peek().is_some() {
        println!("Tables not exported:");
        for failure in failures {
            println!(
                "  - {} [{:?}]: {}",
                failure.table_name,
                failure.status,
                failure.error_detail.as_deref().unwrap_or("")
            );
        }
        println!();
    }

    if summary.interrupted {
        println!("Export interrupted; rerun the same command to export the remaining tables.");
        tracing::info!("Export interrupted by user signal");
    } else if summary.is_successful() {
        println!("Export completed successfully!");
    } else {
        println!("Export completed with failures");
    }
}
