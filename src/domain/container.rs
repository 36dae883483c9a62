//! Container files
//!
//! A container is a UTF-8 text file listing one table name per line. Blank
//! lines and lines whose first non-whitespace character is `#` are ignored.

use crate::domain::errors::QuarryError;
use crate::domain::ids::TableName;
use crate::domain::Result;
use std::path::{Path, PathBuf};

/// Parsed container file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// File the entries were read from
    pub source_path: PathBuf,
    /// Table names in file order
    pub entries: Vec<TableName>,
}

impl ContainerSpec {
    /// Parse container text
    ///
    /// # Examples
    ///
    /// ```
    /// use quarry::domain::container::ContainerSpec;
    ///
    /// let spec = ContainerSpec::parse("tables.txt", "# comment\ncustomers\n\n  orders  \n");
    /// let names: Vec<&str> = spec.entries.iter().map(|t| t.as_str()).collect();
    /// assert_eq!(names, ["customers", "orders"]);
    /// ```
    pub fn parse(source_path: impl Into<PathBuf>, contents: &str) -> Self {
        let entries = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| TableName::new(line).ok())
            .collect();

        Self {
            source_path: source_path.into(),
            entries,
        }
    }

    /// Read and parse a container file
    ///
    /// # Errors
    ///
    /// `InputNotFound` if the path does not exist or is not a regular file,
    /// `Io` if it cannot be read as UTF-8 text.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            QuarryError::InputNotFound(format!("container {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(QuarryError::InputNotFound(format!(
                "container {} is not a regular file",
                path.display()
            )));
        }

        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            QuarryError::Io(format!("failed to read container {}: {}", path.display(), e))
        })?;

        Ok(Self::parse(path, &contents))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container lists no tables
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn names(spec: &ContainerSpec) -> Vec<&str> {
        spec.entries.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let spec = ContainerSpec::parse("c.txt", "# comment\ncustomers\n\norders\n");
        assert_eq!(names(&spec), ["customers", "orders"]);
        assert_eq!(spec.source_path, PathBuf::from("c.txt"));
    }

    #[test]
    fn test_parse_trims_before_comment_check() {
        let spec = ContainerSpec::parse("c.txt", "   # indented comment\n\t  \n  products \r\n");
        assert_eq!(names(&spec), ["products"]);
    }

    #[test]
    fn test_parse_keeps_hash_inside_name() {
        let spec = ContainerSpec::parse("c.txt", "weird#name\n#skipped\n");
        assert_eq!(names(&spec), ["weird#name"]);
    }

    #[test]
    fn test_parse_preserves_duplicates_and_order() {
        let spec = ContainerSpec::parse("c.txt", "b\na\nb\n");
        assert_eq!(names(&spec), ["b", "a", "b"]);
    }

    #[test]
    fn test_parse_empty() {
        let spec = ContainerSpec::parse("c.txt", "\n# only comments\n\n");
        assert!(spec.is_empty());
        assert_eq!(spec.len(), 0);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "customers\n# x\norders").unwrap();
        file.flush().unwrap();

        let spec = ContainerSpec::from_file(file.path()).await.unwrap();
        assert_eq!(names(&spec), ["customers", "orders"]);
    }

    #[tokio::test]
    async fn test_from_file_missing() {
        let result = ContainerSpec::from_file(Path::new("/does/not/exist.txt")).await;
        assert!(matches!(result, Err(QuarryError::InputNotFound(_))));
    }

    #[tokio::test]
    async fn test_from_file_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ContainerSpec::from_file(dir.path()).await;
        assert!(matches!(result, Err(QuarryError::InputNotFound(_))));
    }
}
