//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Quarry configuration file.

use super::{EXIT_CONFIG, EXIT_CONNECTION};
use crate::adapters::database::create_connection_pool;
use crate::config::{load_config, redact_connection_string};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also open one database connection
    #[arg(long)]
    pub test_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration is valid");
                c
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let output = &config.output;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Location: {}", output.location);
        println!(
            "  File Pattern: {}",
            output.file_path("<table>").display()
        );
        println!("  Delimiter: {:?}", output.delimiter);
        println!("  Header: {}", output.include_header);
        println!("  Quote Style: {:?}", output.quote_style);
        println!(
            "  Container Location: {}",
            config.input.container_location.as_deref().unwrap_or("(not set)")
        );
        println!(
            "  Database: {}",
            redact_connection_string(&config.database.connection_string)
        );
        println!("  Max Pool Size: {}", config.database.max_pool_size);
        println!();

        if self.test_connection {
            let tested = match create_connection_pool(&config.database) {
                Ok(pool) => pool.test_connection().await,
                Err(e) => Err(e),
            };
            match tested {
                Ok(()) => println!("Database connection OK"),
                Err(e) => {
                    println!("Database connection failed");
                    println!("   Error: {e}");
                    return Ok(EXIT_CONNECTION);
                }
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let args = ValidateArgs {
            test_connection: false,
        };
        let code = args.execute("/does/not/exist/quarry.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_invalid_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quarry.toml");
        std::fs::write(
            &path,
            r#"
[output]
include_header = true
delimiter = ",,"
prefix = ""
suffix = ""
location = "out"
extension = "csv"

[database]
connection_string = "postgresql://u:p@localhost/db"
max_pool_size = 2
"#,
        )
        .unwrap();

        let args = ValidateArgs {
            test_connection: false,
        };
        let code = args.execute(path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
