//! Database abstraction traits
//!
//! This module defines the traits a database backend implements so the
//! export engine can stream tables without knowing the driver. Tests drive
//! the engine through an in-memory implementation of the same traits.

use crate::domain::{CellValue, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Streamed result of a full-table query
pub struct TableStream<'a> {
    /// Column names in result order
    pub columns: Vec<String>,

    /// Rows, one at a time; each row has one value per column
    pub rows: BoxStream<'a, Result<Vec<CellValue>>>,
}

impl std::fmt::Debug for TableStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableStream")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// A connection checked out of a [`ConnectionPool`]
///
/// Dropping the value returns the connection to its pool.
#[async_trait]
pub trait TableConnection: Send {
    /// Run `SELECT * FROM <table>` and stream the rows
    ///
    /// The table name is interpolated verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`QueryExecution`](crate::domain::QuarryError::QueryExecution)
    /// if the statement cannot be prepared or executed.
    async fn query_table(&mut self, table: &str) -> Result<TableStream<'_>>;
}

/// Bounded pool of database connections shared by all export jobs
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    /// Check out one connection, waiting while the pool is exhausted
    ///
    /// # Errors
    ///
    /// Returns [`Connection`](crate::domain::QuarryError::Connection) if no
    /// connection can be obtained within the pool's timeouts.
    async fn acquire(&self) -> Result<Box<dyn TableConnection>>;

    /// Maximum number of connections the pool hands out at once
    fn max_size(&self) -> usize;

    /// Verify connectivity with a trivial round trip
    async fn test_connection(&self) -> Result<()>;
}
