//! Core business logic for Quarry.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration: jobs, containers, scheduling, summary
//! - [`serialize`] - Row to delimited line conversion
//!
//! # Export Workflow
//!
//! 1. **Resolve**: turn the target into table names (one table, one
//!    container, or every container in a folder)
//! 2. **Schedule**: submit one job per table to the shared scheduler,
//!    bounded by the connection pool size
//! 3. **Stream**: each job runs `SELECT * FROM <table>` and writes its rows
//!    through the [`serialize::RowSerializer`] to its own file
//! 4. **Report**: collect per-table results into an
//!    [`export::ExportSummary`]
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry::adapters::database::create_connection_pool;
//! use quarry::config::load_config;
//! use quarry::core::export::ExportCoordinator;
//! use quarry::domain::{ExportTarget, TableName};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(load_config("quarry.toml")?);
//! let pool = create_connection_pool(&config.database)?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ExportCoordinator::new(config, pool, shutdown_rx);
//! let summary = coordinator
//!     .execute(&ExportTarget::Table(TableName::new("customers")?))
//!     .await;
//!
//! println!("Succeeded: {}", summary.succeeded);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod serialize;
