use async_trait::async_trait;

use super::Session;
use crate::conversion::FromScalar;
use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::results::ResultSet;
use crate::statement::function_statement;

/// Running commands against a connection.
///
/// [`Session`] is the implementation; helpers such as [`crate::admin`] are
/// generic over this trait.
///
/// Every parameter must appear in the SQL text as `@name`. A parameter with no
/// placeholder is an `ArgumentError` on both backends.
#[async_trait]
pub trait CommandExecutor: Send {
    /// Run a statement that returns no rows; returns the rows affected.
    async fn execute_non_query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError>;

    /// Run a statement and buffer every row it returns.
    async fn execute_tabular(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError>;

    /// Run a stored procedure, passing `params` as named arguments.
    async fn execute_proc(
        &mut self,
        procedure: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError>;

    /// First column of the first row, decoded as `T`.
    ///
    /// No row, or a NULL value, yields `T::zero()`.
    async fn execute_scalar<T>(&mut self, sql: &str, params: &[Parameter]) -> Result<T, SqlSessionError>
    where
        T: FromScalar + Send,
    {
        let rs = self.execute_tabular(sql, params).await?;
        T::from_scalar(rs.first_value())
    }

    /// `SELECT * FROM [function](@a, @b, ...)` for a table-valued function.
    async fn execute_function(
        &mut self,
        function: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        let statement = function_statement(function, params)?;
        self.execute_tabular(&statement.sql, &statement.params).await
    }
}

#[async_trait]
impl CommandExecutor for Session {
    async fn execute_non_query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError> {
        self.run_non_query(sql, params).await
    }

    async fn execute_tabular(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        self.run_tabular(sql, params).await
    }

    async fn execute_proc(
        &mut self,
        procedure: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        self.run_procedure(procedure, params).await
    }
}
