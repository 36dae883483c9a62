//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Quarry using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Quarry - concurrent bulk table exporter
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
#[command(author = "Quarry Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "quarry.toml", env = "QUARRY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QUARRY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export tables to delimited files
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::export::TargetCommand;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_export_table() {
        let cli = Cli::parse_from(["quarry", "export", "table", "customers"]);
        assert_eq!(cli.config, "quarry.toml");
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert!(!args.dry_run);
        assert!(matches!(args.target, TargetCommand::Table { ref name } if name == "customers"));
    }

    #[test]
    fn test_cli_parse_export_folder_default() {
        let cli = Cli::parse_from(["quarry", "export", "folder"]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert!(matches!(args.target, TargetCommand::Folder { path: None }));
    }

    #[test]
    fn test_cli_parse_dry_run_after_target() {
        let cli = Cli::parse_from(["quarry", "export", "container", "sales.txt", "--dry-run"]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert!(args.dry_run);
        assert!(
            matches!(args.target, TargetCommand::Container { ref path } if *path == PathBuf::from("sales.txt"))
        );
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["quarry", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["quarry", "--log-level", "debug", "export", "folder"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["quarry", "init", "--force"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected init command");
        };
        assert!(args.force);
        assert_eq!(args.output, "quarry.toml");
    }

    #[test]
    fn test_cli_requires_export_target() {
        assert!(Cli::try_parse_from(["quarry", "export"]).is_err());
    }
}
