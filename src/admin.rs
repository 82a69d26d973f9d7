//! Database maintenance templates.
//!
//! These are T-SQL statements. Names are validated and inlined in brackets;
//! only the backup file path travels as a parameter. Run against `SQLite`,
//! the engine rejects them with a `CommandError`.

use crate::error::SqlSessionError;
use crate::identifier::{quote_name, quote_qualified};
use crate::param::Parameter;
use crate::session::CommandExecutor;
use crate::statement::Statement;

fn require(value: &str, what: &str) -> Result<(), SqlSessionError> {
    if value.trim().is_empty() {
        Err(SqlSessionError::argument(format!("{what} must not be blank")))
    } else {
        Ok(())
    }
}

/// # Errors
/// Returns `SqlSessionError::ArgumentError` for a blank or invalid name or path.
pub fn backup_statement(database: &str, file_path: &str) -> Result<Statement, SqlSessionError> {
    require(database, "database name")?;
    require(file_path, "backup file path")?;
    let db = quote_name(database, "database name")?;
    Ok(Statement::new(
        format!("BACKUP DATABASE {db} TO DISK = @file_path"),
        vec![Parameter::new("file_path", file_path)?],
    ))
}

/// # Errors
/// Returns `SqlSessionError::ArgumentError` for a blank or invalid name or path.
pub fn restore_statement(database: &str, file_path: &str) -> Result<Statement, SqlSessionError> {
    require(database, "database name")?;
    require(file_path, "backup file path")?;
    let db = quote_name(database, "database name")?;
    Ok(Statement::new(
        format!("RESTORE DATABASE {db} FROM DISK = @file_path WITH REPLACE"),
        vec![Parameter::new("file_path", file_path)?],
    ))
}

/// `SELECT * INTO [new] FROM [source]`, with `WHERE 1=0` when only the
/// structure is wanted.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` for a blank or invalid table name.
pub fn clone_table_statement(
    source: &str,
    new_table: &str,
    with_data: bool,
) -> Result<Statement, SqlSessionError> {
    require(source, "source table name")?;
    require(new_table, "new table name")?;
    let source = quote_qualified(source, "source table name")?;
    let new_table = quote_qualified(new_table, "new table name")?;
    let mut sql = format!("SELECT * INTO {new_table} FROM {source}");
    if !with_data {
        sql.push_str(" WHERE 1=0");
    }
    Ok(Statement::without_params(sql))
}

/// Back up `database` to a file on the server.
///
/// # Errors
/// Argument errors from [`backup_statement`], or the executor's errors.
pub async fn backup_database<E: CommandExecutor>(
    executor: &mut E,
    database: &str,
    file_path: &str,
) -> Result<(), SqlSessionError> {
    let stmt = backup_statement(database, file_path)?;
    tracing::debug!(database, file_path, "backing up database");
    executor.execute_non_query(&stmt.sql, &stmt.params).await?;
    Ok(())
}

/// Restore `database` from a backup file, replacing the existing database.
///
/// # Errors
/// Argument errors from [`restore_statement`], or the executor's errors.
pub async fn restore_database<E: CommandExecutor>(
    executor: &mut E,
    database: &str,
    file_path: &str,
) -> Result<(), SqlSessionError> {
    let stmt = restore_statement(database, file_path)?;
    tracing::debug!(database, file_path, "restoring database");
    executor.execute_non_query(&stmt.sql, &stmt.params).await?;
    Ok(())
}

/// Create `new_table` with the columns of `source` and no rows.
///
/// # Errors
/// Argument errors from [`clone_table_statement`], or the executor's errors.
pub async fn clone_table_structure<E: CommandExecutor>(
    executor: &mut E,
    source: &str,
    new_table: &str,
) -> Result<(), SqlSessionError> {
    let stmt = clone_table_statement(source, new_table, false)?;
    executor.execute_non_query(&stmt.sql, &stmt.params).await?;
    Ok(())
}

/// Create `new_table` as a copy of `source`, rows included.
///
/// # Errors
/// Argument errors from [`clone_table_statement`], or the executor's errors.
pub async fn clone_table_with_data<E: CommandExecutor>(
    executor: &mut E,
    source: &str,
    new_table: &str,
) -> Result<usize, SqlSessionError> {
    let stmt = clone_table_statement(source, new_table, true)?;
    executor.execute_non_query(&stmt.sql, &stmt.params).await
}
