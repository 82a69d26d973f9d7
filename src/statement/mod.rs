//! Dynamic INSERT/UPDATE/DELETE/SELECT construction from table and column metadata.
//!
//! The builder emits one dialect: bracket-quoted identifiers and `@name`
//! placeholders. Value parameters are named after their column; WHERE parameters
//! get the `p_` prefix (and a numeric suffix if that is taken) so a column can
//! appear in both the SET list and the predicate:
//! ```rust
//! use sql_session::prelude::*;
//!
//! let stmt = StatementBuilder::update("T")
//!     .columns(["id"])
//!     .values([7])
//!     .filter("id", 5)
//!     .build()?;
//! assert_eq!(stmt.sql, "UPDATE [T] SET [id]=@id WHERE [id]=@p_id");
//! assert_eq!(stmt.params.len(), 2);
//! # Ok::<(), SqlSessionError>(())
//! ```
//! Predicates are ANDed in input order; there is no OR and no nesting.

mod dml;
mod select;

use std::fmt;

use crate::binder::NameRegistry;
use crate::error::SqlSessionError;
use crate::identifier::quote_qualified;
use crate::param::Parameter;
use crate::types::SqlValue;

pub use select::function_statement;

/// Shape of the generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Insert,
    Update,
    Delete,
    Select,
}

impl QueryKind {
    /// Whether executing this kind yields rows rather than an affected-row count.
    #[must_use]
    pub fn returns_rows(self) -> bool {
        matches!(self, QueryKind::Select)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryKind::Insert => "INSERT",
            QueryKind::Update => "UPDATE",
            QueryKind::Delete => "DELETE",
            QueryKind::Select => "SELECT",
        };
        f.write_str(s)
    }
}

/// SQL text and its bound parameters, kept together so they cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The SQL text
    pub sql: String,
    /// Parameters referenced by `sql`, in the order they appear
    pub params: Vec<Parameter>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn without_params(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Build a statement from positional metadata.
///
/// `values` pairs with `columns` for Insert/Update and is ignored for
/// Delete/Select; `filters` become the WHERE clause.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` for a blank or invalid table name,
/// an empty column list (Insert/Update/Select), mismatched column/value counts,
/// invalid or duplicate column names.
pub fn build<C, F>(
    kind: QueryKind,
    table: &str,
    columns: &[C],
    values: &[SqlValue],
    filters: &[(F, SqlValue)],
) -> Result<Statement, SqlSessionError>
where
    C: AsRef<str>,
    F: AsRef<str>,
{
    let table = quote_qualified(table, "table name")?;
    let columns: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    let mut names = NameRegistry::new();

    let (mut sql, mut params) = match kind {
        QueryKind::Insert => dml::insert(&table, &columns, values, &mut names)?,
        QueryKind::Update => dml::update(&table, &columns, values, &mut names)?,
        QueryKind::Delete => (dml::delete(&table), Vec::new()),
        QueryKind::Select => (select::select(&table, &columns)?, Vec::new()),
    };

    select::append_where(&mut sql, &mut params, filters, &mut names)?;
    Ok(Statement { sql, params })
}

/// Fluent front end for [`build`].
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    kind: QueryKind,
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    filters: Vec<(String, SqlValue)>,
}

impl StatementBuilder {
    pub fn new(kind: QueryKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn insert(table: impl Into<String>) -> Self {
        Self::new(QueryKind::Insert, table)
    }

    pub fn update(table: impl Into<String>) -> Self {
        Self::new(QueryKind::Update, table)
    }

    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(QueryKind::Delete, table)
    }

    pub fn select(table: impl Into<String>) -> Self {
        Self::new(QueryKind::Select, table)
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Add one `column = value` predicate (ANDed with the others).
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    #[must_use]
    pub fn filters<I, S, V>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<SqlValue>,
    {
        self.filters
            .extend(filters.into_iter().map(|(c, v)| (c.into(), v.into())));
        self
    }

    #[must_use]
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// # Errors
    /// See [`build`].
    pub fn build(&self) -> Result<Statement, SqlSessionError> {
        build(
            self.kind,
            &self.table,
            &self.columns,
            &self.values,
            &self.filters,
        )
    }
}
