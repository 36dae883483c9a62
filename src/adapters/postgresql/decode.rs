//! Decoding PostgreSQL rows into [`CellValue`]s
//!
//! Rows arrive in the binary protocol format, so every value is decoded by
//! its column type and rendered the way PostgreSQL prints it. Columns of a
//! type without a decoder are rejected up front by [`ensure_supported`]
//! instead of being written as raw bytes.

use crate::domain::{CellValue, QuarryError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::error::Error;
use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio_postgres::types::{FromSql, Kind, Type};
use tokio_postgres::{Column, Row};

type DecodeError = Box<dyn Error + Sync + Send>;
type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Decode every column of a row
pub fn decode_row(row: &Row) -> Result<Vec<CellValue>> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| match row.try_get::<_, Option<RawValue<'_>>>(idx)? {
            None => Ok(CellValue::Null),
            Some(RawValue(raw)) => {
                decode_value(column.type_(), raw).map_err(|e| column_error(column, e))
            }
        })
        .collect()
}

/// Fail when a result column has a type this module cannot render
pub fn ensure_supported(columns: &[Column]) -> Result<()> {
    match columns.iter().find(|c| !is_supported(c.type_())) {
        Some(column) => Err(column_error(column, "unsupported column type".into())),
        None => Ok(()),
    }
}

fn column_error(column: &Column, err: DecodeError) -> QuarryError {
    QuarryError::QueryExecution(format!(
        "column \"{}\" of type {}: {}",
        column.name(),
        column.type_(),
        err
    ))
}

fn is_supported(ty: &Type) -> bool {
    match ty.kind() {
        Kind::Array(element) => is_supported(element),
        Kind::Domain(base) => is_supported(base),
        Kind::Enum(_) => true,
        _ => is_text_like(ty) || is_scalar(ty),
    }
}

/// Built-in types with a dedicated decoder
fn is_scalar(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::BOOL
            | Type::CHAR
            | Type::INT2
            | Type::INT4
            | Type::INT8
            | Type::OID
            | Type::FLOAT4
            | Type::FLOAT8
            | Type::NUMERIC
            | Type::TIMESTAMP
            | Type::TIMESTAMPTZ
            | Type::DATE
            | Type::TIME
            | Type::TIMETZ
            | Type::INTERVAL
            | Type::JSON
            | Type::JSONB
            | Type::UUID
            | Type::BYTEA
            | Type::INET
            | Type::CIDR
            | Type::BIT
            | Type::VARBIT
            | Type::POINT
    )
}

/// Types whose binary form is their UTF-8 text
fn is_text_like(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN | Type::XML
    ) || ty.name() == "citext"
}

fn decode_value(ty: &Type, raw: &[u8]) -> DecodeResult<CellValue> {
    let value = match *ty {
        Type::BOOL => bool::from_sql(ty, raw)?.into(),
        Type::CHAR => CellValue::Text(char::from(i8::from_sql(ty, raw)? as u8).to_string()),
        Type::INT2 => i64::from(i16::from_sql(ty, raw)?).into(),
        Type::INT4 => i64::from(i32::from_sql(ty, raw)?).into(),
        Type::INT8 => i64::from_sql(ty, raw)?.into(),
        Type::OID => i64::from(u32::from_sql(ty, raw)?).into(),
        Type::FLOAT4 => CellValue::Float(f64::from(f32::from_sql(ty, raw)?)),
        Type::FLOAT8 => CellValue::Float(f64::from_sql(ty, raw)?),
        Type::NUMERIC => CellValue::Text(PgNumeric::from_sql(ty, raw)?.0),
        Type::TIMESTAMP => CellValue::Text(
            NaiveDateTime::from_sql(ty, raw)?
                .format("%Y-%m-%d %H:%M:%S%.f")
                .to_string(),
        ),
        Type::TIMESTAMPTZ => CellValue::Text(
            DateTime::<Utc>::from_sql(ty, raw)?
                .format("%Y-%m-%d %H:%M:%S%.f%:z")
                .to_string(),
        ),
        Type::DATE => CellValue::Text(NaiveDate::from_sql(ty, raw)?.to_string()),
        Type::TIME => CellValue::Text(NaiveTime::from_sql(ty, raw)?.to_string()),
        Type::TIMETZ => CellValue::Text(timetz(raw)?),
        Type::INTERVAL => CellValue::Text(interval(raw)?),
        Type::JSON | Type::JSONB => {
            CellValue::Text(serde_json::Value::from_sql(ty, raw)?.to_string())
        }
        Type::UUID => CellValue::Text(uuid::Uuid::from_sql(ty, raw)?.to_string()),
        Type::BYTEA => CellValue::Text(hex_bytea(raw)),
        Type::INET | Type::CIDR => CellValue::Text(inet(raw)?),
        Type::BIT | Type::VARBIT => CellValue::Text(bits(raw)?),
        Type::POINT => {
            let mut reader = Reader::new(raw);
            let (x, y) = (reader.f64()?, reader.f64()?);
            CellValue::Text(format!("({x},{y})"))
        }
        _ => match ty.kind() {
            Kind::Array(element) => CellValue::Text(array(element, raw)?),
            Kind::Domain(base) => decode_value(base, raw)?,
            Kind::Enum(_) => CellValue::Text(std::str::from_utf8(raw)?.to_string()),
            _ if is_text_like(ty) => CellValue::Text(std::str::from_utf8(raw)?.to_string()),
            _ => return Err("unsupported column type".into()),
        },
    };

    Ok(value)
}

/// Raw column bytes, decoded by [`decode_value`]
struct RawValue<'a>(&'a [u8]);

impl<'a> FromSql<'a> for RawValue<'a> {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> DecodeResult<Self> {
        Ok(RawValue(raw))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Big-endian cursor over a binary value
struct Reader<'a> {
    raw: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if self.raw.len() < n {
            return Err("truncated binary value".into());
        }
        let (head, rest) = self.raw.split_at(n);
        self.raw = rest;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn i32(&mut self) -> DecodeResult<i32> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    fn i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_be_bytes(self.array()?))
    }

    fn f64(&mut self) -> DecodeResult<f64> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    fn rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.raw)
    }
}

/// Array in PostgreSQL's text form, e.g. `{1,2}` or `{{a,b},{NULL,"c d"}}`
fn array(element: &Type, raw: &[u8]) -> DecodeResult<String> {
    let mut reader = Reader::new(raw);
    let ndim = reader.i32()?;
    let _has_nulls = reader.i32()?;
    let _element_oid = reader.i32()?;

    if ndim <= 0 {
        return Ok("{}".to_string());
    }

    let mut dims = Vec::with_capacity(ndim as usize);
    for _ in 0..ndim {
        let len = reader.i32()?;
        let lower = reader.i32()?;
        if len < 0 {
            return Err("negative array dimension".into());
        }
        dims.push((len as usize, lower));
    }

    let mut out = String::new();
    if dims.iter().any(|&(_, lower)| lower != 1) {
        for &(len, lower) in &dims {
            let upper = i64::from(lower) + len as i64 - 1;
            let _ = write!(out, "[{lower}:{upper}]");
        }
        out.push('=');
    }
    write_array_level(element, &dims, &mut reader, &mut out)?;
    Ok(out)
}

fn write_array_level(
    element: &Type,
    dims: &[(usize, i32)],
    reader: &mut Reader<'_>,
    out: &mut String,
) -> DecodeResult<()> {
    let Some((&(len, _), inner)) = dims.split_first() else {
        return Ok(());
    };

    out.push('{');
    for i in 0..len {
        if i > 0 {
            out.push(',');
        }
        if inner.is_empty() {
            let size = reader.i32()?;
            if size < 0 {
                out.push_str("NULL");
            } else {
                let value = decode_value(element, reader.take(size as usize)?)?;
                push_array_element(&value.as_text(), out);
            }
        } else {
            write_array_level(element, inner, reader, out)?;
        }
    }
    out.push('}');
    Ok(())
}

fn push_array_element(text: &str, out: &mut String) {
    let needs_quotes = text.is_empty()
        || text.eq_ignore_ascii_case("NULL")
        || text
            .chars()
            .any(|c| matches!(c, '{' | '}' | ',' | '"' | '\\') || c.is_whitespace());

    if !needs_quotes {
        out.push_str(text);
        return;
    }

    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// Interval in PostgreSQL's default output style, e.g. `1 year 2 mons 3 days 04:05:06`
fn interval(raw: &[u8]) -> DecodeResult<String> {
    let mut reader = Reader::new(raw);
    let micros = reader.i64()?;
    let days = reader.i32()?;
    let months = reader.i32()?;

    let mut parts = Vec::new();
    // A positive field after a negative one is printed with an explicit '+'
    let mut after_negative = false;
    for (value, unit) in [(months / 12, "year"), (months % 12, "mon"), (days, "day")] {
        if value == 0 {
            continue;
        }
        let sign = if after_negative && value > 0 { "+" } else { "" };
        let plural = if value == 1 { "" } else { "s" };
        parts.push(format!("{sign}{value} {unit}{plural}"));
        after_negative = value < 0;
    }

    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 {
            "-"
        } else if after_negative {
            "+"
        } else {
            ""
        };
        parts.push(format!("{sign}{}", clock(micros.unsigned_abs())));
    }

    Ok(parts.join(" "))
}

/// `HH:MM:SS` with a trimmed fractional part
fn clock(micros: u64) -> String {
    let secs = micros / 1_000_000;
    let frac = micros % 1_000_000;
    let mut out = format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
    if frac != 0 {
        let digits = format!("{frac:06}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

fn timetz(raw: &[u8]) -> DecodeResult<String> {
    let mut reader = Reader::new(raw);
    let micros = reader.i64()?;
    // Stored as seconds west of UTC
    let east = -reader.i32()?;

    let abs = east.unsigned_abs();
    let mut out = clock(micros.unsigned_abs());
    let _ = write!(out, "{}{:02}", if east < 0 { '-' } else { '+' }, abs / 3600);
    if abs % 3600 != 0 {
        let _ = write!(out, ":{:02}", abs / 60 % 60);
        if abs % 60 != 0 {
            let _ = write!(out, ":{:02}", abs % 60);
        }
    }
    Ok(out)
}

const PGSQL_AF_INET: u8 = 2;
const PGSQL_AF_INET6: u8 = 3;

fn inet(raw: &[u8]) -> DecodeResult<String> {
    let mut reader = Reader::new(raw);
    let family = reader.u8()?;
    let bits = reader.u8()?;
    let is_cidr = reader.u8()? != 0;
    let _len = reader.u8()?;

    let (addr, max_bits) = match family {
        PGSQL_AF_INET => (Ipv4Addr::from(reader.array::<4>()?).to_string(), 32),
        PGSQL_AF_INET6 => (Ipv6Addr::from(reader.array::<16>()?).to_string(), 128),
        other => return Err(format!("unknown inet address family {other}").into()),
    };

    if is_cidr || bits != max_bits {
        Ok(format!("{addr}/{bits}"))
    } else {
        Ok(addr)
    }
}

fn bits(raw: &[u8]) -> DecodeResult<String> {
    let mut reader = Reader::new(raw);
    let len = reader.i32()?;
    if len < 0 {
        return Err("negative bit string length".into());
    }
    let bytes = reader.rest();
    let len = len as usize;
    if bytes.len() * 8 < len {
        return Err("truncated bit string".into());
    }
    Ok((0..len)
        .map(|i| if bytes[i / 8] & (0x80 >> (i % 8)) != 0 { '1' } else { '0' })
        .collect())
}

/// `bytea` in PostgreSQL's hex output format
fn hex_bytea(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// NUMERIC decoded to its exact decimal text
struct PgNumeric(String);

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

impl<'a> FromSql<'a> for PgNumeric {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> DecodeResult<Self> {
        let word = |pos: usize| -> DecodeResult<[u8; 2]> {
            raw.get(pos..pos + 2)
                .and_then(|s| s.try_into().ok())
                .ok_or_else(|| "truncated numeric value".into())
        };

        let ndigits = i16::from_be_bytes(word(0)?);
        let weight = i16::from_be_bytes(word(2)?) as i32;
        let sign = u16::from_be_bytes(word(4)?);
        let dscale = u16::from_be_bytes(word(6)?) as usize;

        match sign {
            NUMERIC_NAN => return Ok(PgNumeric("NaN".to_string())),
            NUMERIC_PINF => return Ok(PgNumeric("Infinity".to_string())),
            NUMERIC_NINF => return Ok(PgNumeric("-Infinity".to_string())),
            _ => {}
        }

        let digits = (0..ndigits.max(0) as usize)
            .map(|i| word(8 + i * 2).map(i16::from_be_bytes))
            .collect::<DecodeResult<Vec<i16>>>()?;
        let digit = |i: i32| -> i16 {
            if i < 0 {
                0
            } else {
                digits.get(i as usize).copied().unwrap_or(0)
            }
        };

        let mut out = String::new();
        if sign == NUMERIC_NEG {
            out.push('-');
        }

        if weight < 0 {
            out.push('0');
        } else {
            for i in 0..=weight {
                if i == 0 {
                    let _ = write!(out, "{}", digit(i));
                } else {
                    let _ = write!(out, "{:04}", digit(i));
                }
            }
        }

        if dscale > 0 {
            let groups = dscale.div_ceil(4) as i32;
            let mut frac = String::with_capacity(groups as usize * 4);
            for i in (weight + 1)..(weight + 1 + groups) {
                let _ = write!(frac, "{:04}", digit(i));
            }
            frac.truncate(dscale);
            out.push('.');
            out.push_str(&frac);
        }

        Ok(PgNumeric(out))
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}
