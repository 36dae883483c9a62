//! Row serialization
//!
//! Turns a result row into one delimited text line. The quoting itself is
//! delegated to the `csv` writer so embedded quotes are doubled the standard
//! way and the output reads back with any RFC 4180 parser.

use crate::config::schema::{OutputConfig, QuoteStyle};
use crate::domain::{CellValue, Result};

/// Terminator appended after every line written to an output file
pub const LINE_TERMINATOR: &str = "\n";

/// Pure row-to-line converter built from the output configuration
///
/// # Examples
///
/// ```
/// use quarry::config::QuoteStyle;
/// use quarry::core::serialize::RowSerializer;
/// use quarry::domain::CellValue;
///
/// let serializer = RowSerializer::new(b',', QuoteStyle::Minimal, true);
/// let line = serializer
///     .serialize(&[CellValue::Int(1), CellValue::from("a\"b"), CellValue::Null])
///     .unwrap();
/// assert_eq!(line, "1,\"a\"\"b\",");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RowSerializer {
    delimiter: u8,
    quote_style: QuoteStyle,
    include_header: bool,
}

impl RowSerializer {
    /// Create a serializer
    pub fn new(delimiter: u8, quote_style: QuoteStyle, include_header: bool) -> Self {
        Self {
            delimiter,
            quote_style,
            include_header,
        }
    }

    /// Create a serializer from validated output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(
            config.delimiter_byte(),
            config.quote_style,
            config.include_header,
        )
    }

    /// Header line of column names, or `None` when headers are disabled
    pub fn header(&self, columns: &[String]) -> Result<Option<String>> {
        if !self.include_header {
            return Ok(None);
        }
        self.write_line(columns.iter().map(String::as_str)).map(Some)
    }

    /// Serialize one row; NULL becomes an empty field
    pub fn serialize(&self, values: &[CellValue]) -> Result<String> {
        let texts: Vec<_> = values.iter().map(CellValue::as_text).collect();
        self.write_line(texts.iter().map(|t| t.as_ref()))
    }

    fn write_line<'a>(&self, fields: impl Iterator<Item = &'a str>) -> Result<String> {
        let style = match self.quote_style {
            QuoteStyle::Minimal => csv::QuoteStyle::Necessary,
            QuoteStyle::Always => csv::QuoteStyle::Always,
            QuoteStyle::EscapeOnly => csv::QuoteStyle::Never,
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(style)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if self.quote_style == QuoteStyle::EscapeOnly {
            // Never-quote mode writes fields verbatim, so double quotes up front
            let escaped: Vec<String> = fields.map(|f| f.replace('"', "\"\"")).collect();
            writer.write_record(&escaped)?;
        } else {
            writer.write_record(fields)?;
        }

        let mut bytes = writer
            .into_inner()
            .map_err(|e| crate::domain::QuarryError::Serialization(e.to_string()))?;
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }

        String::from_utf8(bytes)
            .map_err(|e| crate::domain::QuarryError::Serialization(e.to_string()))
    }
}
