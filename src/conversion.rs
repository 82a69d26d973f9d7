//! Scalar decoding.
//!
//! [`FromScalar`] is an explicit table from the kind of value the engine returned
//! to the Rust type the caller asked for. Unsupported pairs fail with
//! `SqlSessionError::ConversionError`; a NULL (or a command that produced no row)
//! decodes to the type's zero value instead of failing.
//!
//! | source \ target | i64/i32 | f64 | bool | String | NaiveDateTime | Vec<u8> | Json |
//! |-----------------|---------|-----|------|--------|---------------|---------|------|
//! | Int             | yes¹    | yes | 0/1  | yes    | -             | -       | yes  |
//! | Float           | whole¹  | yes | -    | yes    | -             | -       | yes  |
//! | Text            | parse   | parse | parse | yes | parse         | bytes   | parse|
//! | Bool            | 0/1     | -   | yes  | yes    | -             | -       | yes  |
//! | Timestamp       | -       | -   | -    | yes    | yes           | -       | -    |
//! | Blob            | -       | -   | -    | UTF-8  | -             | yes     | -    |
//! | Json            | -       | -   | -    | yes    | -             | -       | yes  |
//!
//! ¹ range-checked for `i32`.

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlSessionError;
use crate::types::{SqlValue, parse_timestamp};

/// Decode a single returned value into `Self`.
pub trait FromScalar: Sized {
    /// The value produced for NULL / "no value".
    fn zero() -> Self;

    /// Decode a non-NULL value.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConversionError` for unsupported source kinds or
    /// values out of range / unparsable.
    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError>;

    /// Decode an optional value, mapping NULL and absence to [`zero`](FromScalar::zero).
    ///
    /// # Errors
    /// See [`from_value`](FromScalar::from_value).
    fn from_scalar(value: Option<&SqlValue>) -> Result<Self, SqlSessionError> {
        match value {
            None | Some(SqlValue::Null) => Ok(Self::zero()),
            Some(v) => Self::from_value(v),
        }
    }
}

fn unsupported<T>(value: &SqlValue, target: &str) -> Result<T, SqlSessionError> {
    Err(SqlSessionError::conversion(format!(
        "cannot convert {} value to {target}",
        value.kind_name()
    )))
}

fn unparsable<T>(text: &str, target: &str) -> Result<T, SqlSessionError> {
    Err(SqlSessionError::conversion(format!(
        "cannot parse '{text}' as {target}"
    )))
}

impl FromScalar for i64 {
    fn zero() -> Self {
        0
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Int(i) => Ok(*i),
            SqlValue::Bool(b) => Ok(i64::from(*b)),
            #[allow(clippy::cast_possible_truncation)]
            SqlValue::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Ok(*f as i64)
            }
            SqlValue::Float(f) => unparsable(&f.to_string(), "i64"),
            SqlValue::Text(s) => s.trim().parse().or_else(|_| unparsable(s, "i64")),
            other => unsupported(other, "i64"),
        }
    }
}

impl FromScalar for i32 {
    fn zero() -> Self {
        0
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide)
            .map_err(|_| SqlSessionError::conversion(format!("{wide} is out of range for i32")))
    }
}

impl FromScalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Float(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(i) => Ok(*i as f64),
            SqlValue::Text(s) => s.trim().parse().or_else(|_| unparsable(s, "f64")),
            other => unsupported(other, "f64"),
        }
    }
}

impl FromScalar for bool {
    fn zero() -> Self {
        false
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Bool(b) => Ok(*b),
            SqlValue::Int(0) => Ok(false),
            SqlValue::Int(1) => Ok(true),
            SqlValue::Int(i) => unparsable(&i.to_string(), "bool"),
            SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => unparsable(s, "bool"),
            },
            other => unsupported(other, "bool"),
        }
    }
}

impl FromScalar for String {
    fn zero() -> Self {
        String::new()
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Blob(bytes) => String::from_utf8(bytes.clone())
                .map_err(|e| SqlSessionError::conversion(format!("blob is not UTF-8: {e}"))),
            other => Ok(other.to_string()),
        }
    }
}

impl FromScalar for NaiveDateTime {
    fn zero() -> Self {
        NaiveDateTime::default()
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Timestamp(dt) => Ok(*dt),
            SqlValue::Text(s) => parse_timestamp(s).map_or_else(|| unparsable(s, "timestamp"), Ok),
            other => unsupported(other, "timestamp"),
        }
    }
}

impl FromScalar for Vec<u8> {
    fn zero() -> Self {
        Vec::new()
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Blob(bytes) => Ok(bytes.clone()),
            SqlValue::Text(s) => Ok(s.as_bytes().to_vec()),
            other => unsupported(other, "bytes"),
        }
    }
}

impl FromScalar for JsonValue {
    fn zero() -> Self {
        JsonValue::Null
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Json(v) => Ok(v.clone()),
            SqlValue::Text(s) => serde_json::from_str(s)
                .map_err(|e| SqlSessionError::conversion(format!("invalid JSON text: {e}"))),
            SqlValue::Int(i) => Ok(JsonValue::from(*i)),
            SqlValue::Float(f) => Ok(JsonValue::from(*f)),
            SqlValue::Bool(b) => Ok(JsonValue::from(*b)),
            other => unsupported(other, "json"),
        }
    }
}

/// `None` for NULL / no row, otherwise the decoded inner value.
impl<T: FromScalar> FromScalar for Option<T> {
    fn zero() -> Self {
        None
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        T::from_value(value).map(Some)
    }
}

/// Pass the raw value through unchanged.
impl FromScalar for SqlValue {
    fn zero() -> Self {
        SqlValue::Null
    }

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        Ok(value.clone())
    }
}
