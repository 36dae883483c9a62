//! CLI command implementations
//!
//! Each command returns the process exit code:
//! 0 success, 1 failed tables or invalid input, 2 configuration error,
//! 4 database unreachable, 5 fatal error, 130 interrupted.

pub mod export;
pub mod init;
pub mod validate;

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;

/// Exit code when the connection pool cannot be built or reached
pub const EXIT_CONNECTION: i32 = 4;

/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;
