use crate::binder::{NameRegistry, ensure_unique};
use crate::error::SqlSessionError;
use crate::identifier::{quote_name, quote_qualified};
use crate::param::Parameter;
use crate::types::SqlValue;

use super::Statement;

pub(super) fn select(table: &str, columns: &[&str]) -> Result<String, SqlSessionError> {
    match columns {
        [] => Err(SqlSessionError::argument("column list must not be empty")),
        ["*"] => Ok(format!("SELECT * FROM {table}")),
        _ => {
            let projection = columns
                .iter()
                .map(|c| quote_name(c, "column name"))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("SELECT {} FROM {table}", projection.join(", ")))
        }
    }
}

pub(super) fn append_where<F: AsRef<str>>(
    sql: &mut String,
    params: &mut Vec<Parameter>,
    filters: &[(F, SqlValue)],
    names: &mut NameRegistry,
) -> Result<(), SqlSessionError> {
    if filters.is_empty() {
        return Ok(());
    }

    let mut terms = Vec::with_capacity(filters.len());
    for (column, value) in filters {
        let column = column.as_ref();
        let quoted = quote_name(column, "where column")?;
        let param = Parameter::new(names.where_name(column), value.clone())?;
        terms.push(format!("{quoted}={}", param.placeholder()));
        params.push(param);
    }

    sql.push_str(" WHERE ");
    sql.push_str(&terms.join(" AND "));
    Ok(())
}

/// `SELECT * FROM [fn](@a, @b)` for a table-valued function.
///
/// Arguments are passed in the order given, each under its own parameter name.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` for an invalid function name or
/// duplicate parameter names.
pub fn function_statement(
    function: &str,
    params: &[Parameter],
) -> Result<Statement, SqlSessionError> {
    let quoted = quote_qualified(function, "function name")?;
    ensure_unique(params)?;
    let args: Vec<String> = params.iter().map(Parameter::placeholder).collect();
    Ok(Statement::new(
        format!("SELECT * FROM {quoted}({})", args.join(", ")),
        params.to_vec(),
    ))
}
