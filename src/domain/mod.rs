//! Domain models and types for Quarry.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`TableName`])
//! - **Inputs** ([`ContainerSpec`], [`ExportTarget`])
//! - **Job lifecycle** ([`ExportJob`], [`ExportResult`], [`JobStatus`])
//! - **Row values** ([`CellValue`])
//! - **Error types** ([`QuarryError`], [`JobErrorKind`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, QuarryError>`]:
//!
//! ```rust
//! use quarry::domain::{QuarryError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = quarry::config::load_config("quarry.toml")?;
//!     Ok(())
//! }
//! ```

pub mod container;
pub mod errors;
pub mod ids;
pub mod job;
pub mod result;
pub mod target;
pub mod value;

// Re-export commonly used types for convenience
pub use container::ContainerSpec;
pub use errors::{JobErrorKind, QuarryError};
pub use ids::TableName;
pub use job::{ExportJob, ExportResult, JobStatus};
pub use result::Result;
pub use target::ExportTarget;
pub use value::CellValue;
