//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over pooled database
//! connections, so the export engine can be driven by PostgreSQL in
//! production and by in-memory pools in tests.

pub mod factory;
pub mod traits;

pub use factory::create_connection_pool;
pub use traits::{ConnectionPool, TableConnection, TableStream};
