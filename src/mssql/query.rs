use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::numeric::Numeric;
use tiberius::{Query, Row};

use super::client::MssqlClient;
use crate::error::SqlSessionError;
use crate::results::ResultSet;
use crate::types::SqlValue;

fn command_error(what: &str, e: &tiberius::error::Error) -> SqlSessionError {
    SqlSessionError::CommandError(format!("SQL Server {what} error: {e}"))
}

/// Run a bound query and buffer its rows.
///
/// A batch that produces no result set (e.g. a procedure without a SELECT)
/// yields an empty `ResultSet`.
///
/// # Errors
/// Returns `SqlSessionError::CommandError` if execution or row fetching fails.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: Query<'_>,
) -> Result<ResultSet, SqlSessionError> {
    let mut stream = query
        .query(client)
        .await
        .map_err(|e| command_error("query", &e))?;

    let column_names: Vec<String> = match stream
        .columns()
        .await
        .map_err(|e| command_error("column fetch", &e))?
    {
        Some(columns) => columns.iter().map(|col| col.name().to_string()).collect(),
        None => Vec::new(),
    };
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_columns(column_names, 10);

    let mut rows = stream.into_row_stream();
    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| command_error("row fetch", &e))?
    {
        // Later result sets in the same batch may be wider; keep the first shape.
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(extract_value(&row, i));
        }
        result_set.push_row(values)?;
    }

    Ok(result_set)
}

/// Run a bound statement and total the affected row counts.
///
/// # Errors
/// Returns `SqlSessionError::CommandError` if execution fails.
pub async fn execute(client: &mut MssqlClient, query: Query<'_>) -> Result<usize, SqlSessionError> {
    let result = query
        .execute(client)
        .await
        .map_err(|e| command_error("execute", &e))?;
    let rows_affected: u64 = result.rows_affected().iter().sum();
    usize::try_from(rows_affected).map_err(|e| {
        SqlSessionError::CommandError(format!("Invalid rows affected count: {e}"))
    })
}

/// Read one cell by probing the driver types from narrowest to widest.
fn extract_value(row: &Row, idx: usize) -> SqlValue {
    if let Ok(Some(val)) = row.try_get::<u8, _>(idx) {
        return SqlValue::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return SqlValue::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return SqlValue::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return SqlValue::Int(val);
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return SqlValue::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return SqlValue::Float(val);
    }
    if let Ok(Some(val)) = row.try_get::<Numeric, _>(idx) {
        return SqlValue::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return SqlValue::Bool(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return SqlValue::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return SqlValue::Text(val.to_string());
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return SqlValue::Blob(val.to_vec());
    }
    SqlValue::Null
}
