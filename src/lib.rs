// Quarry - Concurrent Bulk Table Exporter
// Copyright (c) 2025 Quarry Contributors
// Licensed under the MIT License

//! # Quarry - bulk export of database tables to delimited files
//!
//! Quarry streams whole tables out of PostgreSQL into one delimited text
//! file per table, running many tables at once over a bounded connection
//! pool.
//!
//! ## Overview
//!
//! An export is driven by exactly one of:
//! - a single **table** name,
//! - a **container** file listing table names (one per line, blank lines and
//!   `#` comments ignored),
//! - a **folder** of container files.
//!
//! Each table becomes one job: check out a connection, run
//! `SELECT * FROM <table>`, stream rows through the row serializer into
//! `<location>/<prefix><table><suffix>.<extension>`. A failing table is
//! recorded and logged; it never stops its siblings.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export engine (jobs, containers, scheduling, serialization)
//! - [`adapters`] - Database abstraction and the PostgreSQL implementation
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quarry::adapters::database::create_connection_pool;
//! use quarry::config::load_config;
//! use quarry::core::export::ExportCoordinator;
//! use quarry::domain::ExportTarget;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(load_config("quarry.toml")?);
//!     let pool = create_connection_pool(&config.database)?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let coordinator = ExportCoordinator::new(config, pool, shutdown_rx);
//!     let summary = coordinator
//!         .execute(&ExportTarget::ContainerFolder(None))
//!         .await;
//!
//!     println!("Exported {} rows from {} tables", summary.total_rows, summary.succeeded);
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`] with [`domain::QuarryError`].
//! Per-table failures are not errors at the API level: they come back as
//! failed [`domain::ExportResult`]s inside the
//! [`core::export::ExportSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
