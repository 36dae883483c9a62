//! Connection pool factory
//!
//! This module builds the connection pool described by the configuration.

use crate::adapters::database::traits::ConnectionPool;
use crate::adapters::postgresql::PostgresPool;
use crate::config::schema::DatabaseConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the connection pool for the configured database
///
/// Building the pool does not open connections; the first checkout does.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed or the pool
/// cannot be built.
pub fn create_connection_pool(config: &DatabaseConfig) -> Result<Arc<dyn ConnectionPool>> {
    tracing::info!(
        max_pool_size = config.max_pool_size,
        "Creating PostgreSQL connection pool"
    );
    let pool = PostgresPool::new(config)?;

    Ok(Arc::new(pool) as Arc<dyn ConnectionPool>)
}
