use crate::binder::NameRegistry;
use crate::error::SqlSessionError;
use crate::identifier::quote_name;
use crate::param::Parameter;
use crate::types::SqlValue;

/// Quote each column, claim its parameter name and pair it with its value.
fn column_params(
    columns: &[&str],
    values: &[SqlValue],
    names: &mut NameRegistry,
) -> Result<Vec<(String, Parameter)>, SqlSessionError> {
    if columns.is_empty() {
        return Err(SqlSessionError::argument("column list must not be empty"));
    }
    if columns.len() != values.len() {
        return Err(SqlSessionError::argument(format!(
            "{} columns but {} values",
            columns.len(),
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(columns.len());
    for (column, value) in columns.iter().zip(values) {
        let quoted = quote_name(column, "column name")?;
        if !names.claim(column) {
            return Err(SqlSessionError::argument(format!(
                "duplicate column '{column}'"
            )));
        }
        out.push((quoted, Parameter::new(*column, value.clone())?));
    }
    Ok(out)
}

pub(super) fn insert(
    table: &str,
    columns: &[&str],
    values: &[SqlValue],
    names: &mut NameRegistry,
) -> Result<(String, Vec<Parameter>), SqlSessionError> {
    let pairs = column_params(columns, values, names)?;

    let column_list: Vec<&str> = pairs.iter().map(|(quoted, _)| quoted.as_str()).collect();
    let placeholders: Vec<String> = pairs.iter().map(|(_, p)| p.placeholder()).collect();
    let sql = format!(
        "INSERT INTO {table}({}) VALUES ({})",
        column_list.join(","),
        placeholders.join(",")
    );
    Ok((sql, pairs.into_iter().map(|(_, p)| p).collect()))
}

pub(super) fn update(
    table: &str,
    columns: &[&str],
    values: &[SqlValue],
    names: &mut NameRegistry,
) -> Result<(String, Vec<Parameter>), SqlSessionError> {
    let pairs = column_params(columns, values, names)?;

    let assignments: Vec<String> = pairs
        .iter()
        .map(|(quoted, p)| format!("{quoted}={}", p.placeholder()))
        .collect();
    let sql = format!("UPDATE {table} SET {}", assignments.join(","));
    Ok((sql, pairs.into_iter().map(|(_, p)| p).collect()))
}

pub(super) fn delete(table: &str) -> String {
    format!("DELETE FROM {table}")
}
