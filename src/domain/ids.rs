//! Domain identifier types
//!
//! Newtype wrappers that keep table names from being mixed up with other
//! strings (paths, SQL text) as they move through the export pipeline.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Name of a table to export, as written in a container or on the CLI
///
/// The name is kept verbatim (after trimming) and interpolated into
/// `SELECT * FROM <name>`. Use [`TableName::is_plain_identifier`] when the
/// source of names is not trusted.
///
/// # Examples
///
/// ```
/// use quarry::domain::ids::TableName;
/// use std::str::FromStr;
///
/// let table = TableName::from_str("  sales.orders ").unwrap();
/// assert_eq!(table.as_str(), "sales.orders");
/// assert!(table.is_plain_identifier());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    /// Creates a new TableName, trimming surrounding whitespace
    ///
    /// Returns `Err` if the trimmed name is empty
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("Table name cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the table name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the name is a dotted sequence of unquoted SQL identifiers
    pub fn is_plain_identifier(&self) -> bool {
        static IDENT: OnceLock<Regex> = OnceLock::new();
        IDENT
            .get_or_init(|| {
                Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)*$")
                    .expect("identifier pattern is valid")
            })
            .is_match(&self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_table_name_trims() {
        let name = TableName::new("\tcustomers  ").unwrap();
        assert_eq!(name.as_str(), "customers");
        assert_eq!(name.to_string(), "customers");
    }

    #[test]
    fn test_table_name_empty() {
        assert!(TableName::new("").is_err());
        assert!(TableName::new("   ").is_err());
    }

    #[test_case("customers", true; "simple")]
    #[test_case("sales.orders", true; "schema qualified")]
    #[test_case("_audit$log", true; "underscore and dollar")]
    #[test_case("orders; DROP TABLE users", false; "statement injection")]
    #[test_case("1table", false; "leading digit")]
    #[test_case("sales..orders", false; "empty segment")]
    #[test_case("\"Quoted\"", false; "quoted identifier")]
    fn test_plain_identifier(raw: &str, expected: bool) {
        let name = TableName::new(raw).unwrap();
        assert_eq!(name.is_plain_identifier(), expected);
    }

    #[test]
    fn test_table_name_serde() {
        let name = TableName::new("orders").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"orders\"");
        let back: TableName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
