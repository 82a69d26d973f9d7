use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlSessionError;
use crate::results::ResultSet;
use crate::types::SqlValue;

fn command_error(e: &rusqlite::Error) -> SqlSessionError {
    SqlSessionError::CommandError(format!("SQLite query error: {e}"))
}

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
/// Returns `SqlSessionError::CommandError` if the column cannot be read.
pub fn extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<SqlValue, SqlSessionError> {
    let value: Value = row.get(idx).map_err(|e| command_error(&e))?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Step a bound statement to completion, buffering every row.
///
/// # Errors
/// Returns `SqlSessionError::CommandError` if stepping or reading fails.
pub fn build_result_set(stmt: &mut Statement<'_>) -> Result<ResultSet, SqlSessionError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_columns(column_names, 16);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next().map_err(|e| command_error(&e))? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(extract_value(row, i)?);
        }
        result_set.push_row(values)?;
    }

    Ok(result_set)
}
