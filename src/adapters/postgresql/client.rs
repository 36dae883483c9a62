//! PostgreSQL connection pool
//!
//! Wraps a deadpool-postgres pool behind the [`ConnectionPool`] trait.

use super::decode::{decode_row, ensure_supported};
use crate::adapters::database::{ConnectionPool, TableConnection, TableStream};
use crate::config::schema::DatabaseConfig;
use crate::domain::{QuarryError, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use futures::StreamExt;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::NoTls;

/// Bounded PostgreSQL pool shared by all export jobs
pub struct PostgresPool {
    pool: Pool,
    max_size: usize,
    statement_timeout_ms: u64,
    cache_statements: bool,
}

impl PostgresPool {
    /// Build the pool from configuration
    ///
    /// No connection is opened here; the first checkout connects.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection string does not parse,
    /// or a connection error if the pool cannot be built.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config =
            config.connection_string.expose_secret().parse().map_err(|e| {
                QuarryError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_pool_size)
            .runtime(Runtime::Tokio1)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .build()
            .map_err(|e| QuarryError::Connection(format!("Failed to create connection pool: {e}")))?;

        Ok(Self {
            pool,
            max_size: config.max_pool_size,
            statement_timeout_ms: config.statement_timeout_seconds * 1000,
            cache_statements: config.cache_statements,
        })
    }
}

#[async_trait]
impl ConnectionPool for PostgresPool {
    async fn acquire(&self) -> Result<Box<dyn TableConnection>> {
        let client = self.pool.get().await.map_err(|e| {
            QuarryError::Connection(format!("Failed to get connection from pool: {e}"))
        })?;

        if self.statement_timeout_ms > 0 {
            client
                .batch_execute(&format!(
                    "SET statement_timeout = {}",
                    self.statement_timeout_ms
                ))
                .await
                .map_err(|e| {
                    QuarryError::Connection(format!("Failed to set statement timeout: {e}"))
                })?;
        }

        Ok(Box::new(PostgresConnection {
            client,
            cache_statements: self.cache_statements,
        }))
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    async fn test_connection(&self) -> Result<()> {
        let client = self.pool.get().await.map_err(|e| {
            QuarryError::Connection(format!("Failed to get connection from pool: {e}"))
        })?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| QuarryError::Connection(format!("Connection test failed: {e}")))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }
}

/// One pooled connection; returned to the pool on drop
pub struct PostgresConnection {
    client: Object,
    cache_statements: bool,
}

#[async_trait]
impl TableConnection for PostgresConnection {
    async fn query_table(&mut self, table: &str) -> Result<TableStream<'_>> {
        let sql = format!("SELECT * FROM {table}");

        let statement = if self.cache_statements {
            self.client.prepare_cached(&sql).await?
        } else {
            self.client.prepare(&sql).await?
        };

        ensure_supported(statement.columns())?;

        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let no_params: [&(dyn ToSql + Sync); 0] = [];
        let rows = self
            .client
            .query_raw(&statement, no_params)
            .await?
            .map(|row| row.map_err(QuarryError::from).and_then(|row| decode_row(&row)))
            .boxed();

        Ok(TableStream { columns, rows })
    }
}
