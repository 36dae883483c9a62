//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::QuarryConfig;
use crate::config::secret_string;
use crate::domain::errors::QuarryError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`QuarryConfig`]
/// 4. Applies environment variable overrides (`QUARRY_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Every failure is a [`QuarryError::Configuration`]: the file is missing or
/// unreadable, a referenced environment variable is unset, a required key is
/// missing or malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use quarry::config::loader::load_config;
///
/// let config = load_config("quarry.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<QuarryConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(QuarryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        QuarryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text; the part of [`load_config`] after reading the file
pub fn parse_config(contents: &str) -> Result<QuarryConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: QuarryConfig = toml::from_str(&contents)
        .map_err(|e| QuarryError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        QuarryError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| QuarryError::Other(format!("invalid placeholder pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(QuarryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the `QUARRY_*` prefix
///
/// Environment variables follow the pattern `QUARRY_<SECTION>_<KEY>`, for
/// example `QUARRY_OUTPUT_LOCATION` or `QUARRY_DATABASE_MAX_POOL_SIZE`.
///
/// # Errors
///
/// Returns [`QuarryError::Configuration`] naming the variable when a set
/// override does not parse; the file value is never silently kept.
fn apply_env_overrides(config: &mut QuarryConfig) -> Result<()> {
    if let Ok(val) = std::env::var("QUARRY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Output overrides
    if let Some(flag) = flag_override("QUARRY_OUTPUT_INCLUDE_HEADER")? {
        config.output.include_header = flag;
    }
    if let Ok(val) = std::env::var("QUARRY_OUTPUT_DELIMITER") {
        config.output.delimiter = val;
    }
    if let Ok(val) = std::env::var("QUARRY_OUTPUT_PREFIX") {
        config.output.prefix = val;
    }
    if let Ok(val) = std::env::var("QUARRY_OUTPUT_SUFFIX") {
        config.output.suffix = val;
    }
    if let Ok(val) = std::env::var("QUARRY_OUTPUT_LOCATION") {
        config.output.location = val;
    }
    if let Ok(val) = std::env::var("QUARRY_OUTPUT_EXTENSION") {
        config.output.extension = val;
    }

    // Input overrides
    if let Ok(val) = std::env::var("QUARRY_INPUT_CONTAINER_LOCATION") {
        config.input.container_location = Some(val);
    }
    if let Some(flag) = flag_override("QUARRY_INPUT_VALIDATE_IDENTIFIERS")? {
        config.input.validate_identifiers = flag;
    }

    // Database overrides
    if let Ok(val) = std::env::var("QUARRY_DATABASE_CONNECTION_STRING") {
        config.database.connection_string = secret_string(val);
    }
    if let Some(size) = parsed_override("QUARRY_DATABASE_MAX_POOL_SIZE")? {
        config.database.max_pool_size = size;
    }
    if let Some(secs) = parsed_override("QUARRY_DATABASE_CONNECTION_TIMEOUT_SECONDS")? {
        config.database.connection_timeout_seconds = secs;
    }
    if let Some(secs) = parsed_override("QUARRY_DATABASE_STATEMENT_TIMEOUT_SECONDS")? {
        config.database.statement_timeout_seconds = secs;
    }
    if let Some(flag) = flag_override("QUARRY_DATABASE_CACHE_STATEMENTS")? {
        config.database.cache_statements = flag;
    }

    // Logging overrides
    if let Some(flag) = flag_override("QUARRY_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = flag;
    }
    if let Ok(val) = std::env::var("QUARRY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Reads a numeric override; `None` when the variable is unset
fn parsed_override<T>(var: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(val) = std::env::var(var) else {
        return Ok(None);
    };
    val.trim().parse().map(Some).map_err(|e| {
        QuarryError::Configuration(format!("Invalid value '{val}' for {var}: {e}"))
    })
}

/// Reads a boolean override, accepting the same spellings as `include_header`
fn flag_override(var: &str) -> Result<Option<bool>> {
    let Ok(val) = std::env::var(var) else {
        return Ok(None);
    };
    match val.trim().to_ascii_uppercase().as_str() {
        "YES" | "TRUE" => Ok(Some(true)),
        "NO" | "FALSE" => Ok(Some(false)),
        _ => Err(QuarryError::Configuration(format!(
            "Invalid value '{val}' for {var}: expected YES, NO, true or false"
        ))),
    }
}
