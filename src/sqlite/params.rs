use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
#[must_use]
pub fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(v) => Value::Text(v.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind each parameter to the `@name` placeholder of the same name.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` if a parameter has no matching
/// placeholder, `SqlSessionError::CommandError` if binding fails.
pub fn bind_named(stmt: &mut Statement<'_>, params: &[Parameter]) -> Result<(), SqlSessionError> {
    for param in params {
        let placeholder = param.placeholder();
        let idx = stmt
            .parameter_index(&placeholder)
            .map_err(|e| SqlSessionError::CommandError(format!("SQLite bind error: {e}")))?
            .ok_or_else(|| {
                SqlSessionError::ArgumentError(format!(
                    "parameter {placeholder} does not appear in the statement"
                ))
            })?;
        stmt.raw_bind_parameter(idx, to_sqlite_value(param.value()))
            .map_err(|e| {
                SqlSessionError::CommandError(format!("SQLite bind error for {placeholder}: {e}"))
            })?;
    }
    Ok(())
}
