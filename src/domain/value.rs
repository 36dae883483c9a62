//! Column values read from a result row

use std::borrow::Cow;

/// One column value, decoded from the database into a small closed set
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer column
    Int(i64),
    /// Any floating point column
    Float(f64),
    /// Text and everything rendered as text (numeric, dates, json, uuid)
    Text(String),
}

impl CellValue {
    /// Textual representation; NULL becomes the empty string
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Whether the value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}
