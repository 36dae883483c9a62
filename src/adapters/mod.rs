//! External system integrations for Quarry.
//!
//! - [`database`] - Database abstraction layer (trait-based)
//! - [`postgresql`] - PostgreSQL implementation
//!
//! # Design Pattern
//!
//! The export engine only sees the [`database::ConnectionPool`] and
//! [`database::TableConnection`] traits. Production wires in
//! [`postgresql::PostgresPool`]; tests substitute in-memory pools.
//!
//! ```rust,no_run
//! use quarry::adapters::database::create_connection_pool;
//! use quarry::config::{secret_string, DatabaseConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig {
//!     connection_string: secret_string("postgresql://app:pw@localhost:5432/sales".to_string()),
//!     max_pool_size: 4,
//!     connection_timeout_seconds: 30,
//!     statement_timeout_seconds: 0,
//!     cache_statements: true,
//! };
//!
//! let pool = create_connection_pool(&config)?;
//! pool.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
