//! Configuration management for Quarry.
//!
//! # Overview
//!
//! Quarry uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `QUARRY_<SECTION>_<KEY>` environment overrides
//! - Fail-closed validation of the output and database sections
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quarry::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quarry.toml")?;
//!
//! println!("Output directory: {}", config.output.location);
//! println!("Pool size: {}", config.database.max_pool_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [output]
//! include_header = "YES"
//! delimiter = ","
//! prefix = ""
//! suffix = "_Export"
//! location = "data"
//! extension = "txt"
//!
//! [input]
//! container_location = "container"
//!
//! [database]
//! connection_string = "${QUARRY_DATABASE_URL}"
//! max_pool_size = 10
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DatabaseConfig, InputConfig, LoggingConfig, OutputConfig, QuarryConfig,
    QuoteStyle,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
