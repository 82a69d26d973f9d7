//! Identifier validation and quoting.
//!
//! Table, column, function, procedure and database names cannot be bound as
//! parameters, so they are spliced into SQL text. Every identifier goes through
//! an allow-list here and comes out bracket-quoted (`[dbo].[Users]`), a form both
//! SQL Server and `SQLite` accept.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SqlSessionError;

/// SQL Server's `sysname` limit.
pub(crate) const MAX_PART_LEN: usize = 128;
/// `database.schema.object`
const MAX_PARTS: usize = 3;

lazy_static! {
    static ref IDENT_PART: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Check a single unqualified name (no dots) such as a column or parameter name.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` naming `what` and the rejected input.
pub fn validate_name(name: &str, what: &str) -> Result<(), SqlSessionError> {
    if name.trim().is_empty() {
        return Err(SqlSessionError::argument(format!("{what} must not be blank")));
    }
    if name.len() > MAX_PART_LEN || !IDENT_PART.is_match(name) {
        return Err(SqlSessionError::argument(format!(
            "invalid {what} '{name}': expected letters, digits or '_' and not starting with a digit"
        )));
    }
    Ok(())
}

/// Validate an optionally schema-qualified name and return it bracket-quoted.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` if the name is blank, has too many
/// parts, or any part fails the allow-list.
pub fn quote_qualified(name: &str, what: &str) -> Result<String, SqlSessionError> {
    if name.trim().is_empty() {
        return Err(SqlSessionError::argument(format!("{what} must not be blank")));
    }
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > MAX_PARTS {
        return Err(SqlSessionError::argument(format!(
            "invalid {what} '{name}': at most {MAX_PARTS} dot-separated parts are allowed"
        )));
    }
    let mut quoted = String::with_capacity(name.len() + parts.len() * 2);
    for (i, part) in parts.iter().enumerate() {
        validate_name(part, what).map_err(|_| {
            SqlSessionError::argument(format!("invalid {what} '{name}'"))
        })?;
        if i > 0 {
            quoted.push('.');
        }
        quoted.push('[');
        quoted.push_str(part);
        quoted.push(']');
    }
    Ok(quoted)
}

/// Validate a single-part name and return it bracket-quoted.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` if the name fails the allow-list.
pub fn quote_name(name: &str, what: &str) -> Result<String, SqlSessionError> {
    validate_name(name, what)?;
    Ok(format!("[{name}]"))
}
