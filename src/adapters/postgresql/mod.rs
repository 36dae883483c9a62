//! PostgreSQL database integration
//!
//! Pooled connections via deadpool-postgres, full-table streaming via
//! `query_raw`, and per-type decoding of result columns.

pub mod client;
mod decode;

pub use client::{PostgresConnection, PostgresPool};
