//! What a single invocation exports

use crate::domain::ids::TableName;
use std::fmt;
use std::path::PathBuf;

/// Export target selected once at invocation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// One table
    Table(TableName),
    /// Every table listed in one container file
    Container(PathBuf),
    /// Every container file directly inside a folder.
    /// `None` uses `input.container_location` from configuration.
    ContainerFolder(Option<PathBuf>),
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::Table(name) => write!(f, "table {name}"),
            ExportTarget::Container(path) => write!(f, "container {}", path.display()),
            ExportTarget::ContainerFolder(Some(path)) => {
                write!(f, "container folder {}", path.display())
            }
            ExportTarget::ContainerFolder(None) => write!(f, "configured container folder"),
        }
    }
}
