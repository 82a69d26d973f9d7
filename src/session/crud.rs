use super::Session;
use crate::error::SqlSessionError;
use crate::results::ResultSet;
use crate::statement::{QueryKind, Statement, build};
use crate::types::SqlValue;

/// What a built statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// INSERT, UPDATE or DELETE.
    RowsAffected(usize),
    /// SELECT.
    Rows(ResultSet),
}

impl QueryOutcome {
    #[must_use]
    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            QueryOutcome::RowsAffected(n) => Some(*n),
            QueryOutcome::Rows(_) => None,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            QueryOutcome::Rows(rs) => Some(rs),
            QueryOutcome::RowsAffected(_) => None,
        }
    }
}

impl Session {
    /// Build a statement from table metadata and run it.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ArgumentError` for invalid metadata, or the
    /// executor's connection/command errors.
    pub async fn create_and_run<C, F>(
        &mut self,
        kind: QueryKind,
        table: &str,
        columns: &[C],
        values: &[SqlValue],
        filters: &[(F, SqlValue)],
    ) -> Result<QueryOutcome, SqlSessionError>
    where
        C: AsRef<str>,
        F: AsRef<str>,
    {
        let statement = build(kind, table, columns, values, filters)?;
        self.run_statement(kind, &statement).await
    }

    /// Run a statement produced by [`StatementBuilder`](crate::StatementBuilder).
    ///
    /// # Errors
    /// See [`create_and_run`](Self::create_and_run).
    pub async fn run_statement(
        &mut self,
        kind: QueryKind,
        statement: &Statement,
    ) -> Result<QueryOutcome, SqlSessionError> {
        if kind.returns_rows() {
            self.run_tabular(&statement.sql, &statement.params)
                .await
                .map(QueryOutcome::Rows)
        } else {
            self.run_non_query(&statement.sql, &statement.params)
                .await
                .map(QueryOutcome::RowsAffected)
        }
    }

    /// # Errors
    /// See [`create_and_run`](Self::create_and_run).
    pub async fn insert<C: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
        values: &[SqlValue],
    ) -> Result<usize, SqlSessionError> {
        let statement = build::<C, &str>(QueryKind::Insert, table, columns, values, &[])?;
        self.run_non_query(&statement.sql, &statement.params).await
    }

    /// # Errors
    /// See [`create_and_run`](Self::create_and_run).
    pub async fn update<C: AsRef<str>, F: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
        values: &[SqlValue],
        filters: &[(F, SqlValue)],
    ) -> Result<usize, SqlSessionError> {
        let statement = build(QueryKind::Update, table, columns, values, filters)?;
        self.run_non_query(&statement.sql, &statement.params).await
    }

    /// # Errors
    /// See [`create_and_run`](Self::create_and_run).
    pub async fn delete<F: AsRef<str>>(
        &mut self,
        table: &str,
        filters: &[(F, SqlValue)],
    ) -> Result<usize, SqlSessionError> {
        let statement = build::<&str, F>(QueryKind::Delete, table, &[], &[], filters)?;
        self.run_non_query(&statement.sql, &statement.params).await
    }

    /// # Errors
    /// See [`create_and_run`](Self::create_and_run).
    pub async fn select<C: AsRef<str>, F: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
        filters: &[(F, SqlValue)],
    ) -> Result<ResultSet, SqlSessionError> {
        let statement = build(QueryKind::Select, table, columns, &[], filters)?;
        self.run_tabular(&statement.sql, &statement.params).await
    }
}
