//! Blocking front end.
//!
//! [`BlockingSession`] drives the async [`Session`] on its own current-thread
//! runtime, so both modes share one implementation. Do not call it from inside
//! an async context; use [`Session`] there.

use tokio::runtime::{Builder, Runtime};

use crate::admin;
use crate::config::ConnectionDescriptor;
use crate::conversion::FromScalar;
use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::results::ResultSet;
use crate::session::{Command, CommandExecutor, QueryOutcome, Session, TransactionState};
use crate::statement::{QueryKind, Statement};
use crate::types::SqlValue;

pub struct BlockingSession {
    // Declared before the runtime so it drops first.
    session: Session,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingSession")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl BlockingSession {
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` if the runtime cannot be built.
    pub fn new(descriptor: ConnectionDescriptor) -> Result<Self, SqlSessionError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SqlSessionError::ConfigError(format!("failed to build runtime: {e}")))?;
        Ok(Self {
            session: Session::new(descriptor),
            runtime,
        })
    }

    /// # Errors
    /// See [`Session::from_connection_string`].
    pub fn from_connection_string(connection_string: &str) -> Result<Self, SqlSessionError> {
        Self::new(ConnectionDescriptor::from_connection_string(connection_string)?)
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    #[must_use]
    pub fn transaction_state(&self) -> TransactionState {
        self.session.transaction_state()
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        self.session.command()
    }

    /// # Errors
    /// See [`CommandExecutor::execute_non_query`].
    pub fn execute_non_query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError> {
        self.runtime
            .block_on(self.session.execute_non_query(sql, params))
    }

    /// # Errors
    /// See [`CommandExecutor::execute_tabular`].
    pub fn execute_tabular(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        self.runtime.block_on(self.session.execute_tabular(sql, params))
    }

    /// # Errors
    /// See [`CommandExecutor::execute_scalar`].
    pub fn execute_scalar<T: FromScalar + Send>(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<T, SqlSessionError> {
        self.runtime
            .block_on(self.session.execute_scalar::<T>(sql, params))
    }

    /// # Errors
    /// See [`CommandExecutor::execute_proc`].
    pub fn execute_proc(
        &mut self,
        procedure: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        self.runtime
            .block_on(self.session.execute_proc(procedure, params))
    }

    /// # Errors
    /// See [`CommandExecutor::execute_function`].
    pub fn execute_function(
        &mut self,
        function: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        self.runtime
            .block_on(self.session.execute_function(function, params))
    }

    /// # Errors
    /// See [`Session::create_and_run`].
    pub fn create_and_run<C: AsRef<str>, F: AsRef<str>>(
        &mut self,
        kind: QueryKind,
        table: &str,
        columns: &[C],
        values: &[SqlValue],
        filters: &[(F, SqlValue)],
    ) -> Result<QueryOutcome, SqlSessionError> {
        self.runtime.block_on(
            self.session
                .create_and_run(kind, table, columns, values, filters),
        )
    }

    /// # Errors
    /// See [`Session::run_statement`].
    pub fn run_statement(
        &mut self,
        kind: QueryKind,
        statement: &Statement,
    ) -> Result<QueryOutcome, SqlSessionError> {
        self.runtime
            .block_on(self.session.run_statement(kind, statement))
    }

    /// # Errors
    /// See [`Session::insert`].
    pub fn insert<C: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
        values: &[SqlValue],
    ) -> Result<usize, SqlSessionError> {
        self.runtime
            .block_on(self.session.insert(table, columns, values))
    }

    /// # Errors
    /// See [`Session::update`].
    pub fn update<C: AsRef<str>, F: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
        values: &[SqlValue],
        filters: &[(F, SqlValue)],
    ) -> Result<usize, SqlSessionError> {
        self.runtime
            .block_on(self.session.update(table, columns, values, filters))
    }

    /// # Errors
    /// See [`Session::delete`].
    pub fn delete<F: AsRef<str>>(
        &mut self,
        table: &str,
        filters: &[(F, SqlValue)],
    ) -> Result<usize, SqlSessionError> {
        self.runtime.block_on(self.session.delete(table, filters))
    }

    /// # Errors
    /// See [`Session::select`].
    pub fn select<C: AsRef<str>, F: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
        filters: &[(F, SqlValue)],
    ) -> Result<ResultSet, SqlSessionError> {
        self.runtime
            .block_on(self.session.select(table, columns, filters))
    }

    /// # Errors
    /// See [`Session::begin_transaction`].
    pub fn begin_transaction(&mut self) -> Result<(), SqlSessionError> {
        self.runtime.block_on(self.session.begin_transaction())
    }

    /// # Errors
    /// See [`Session::commit`].
    pub fn commit(&mut self) -> Result<(), SqlSessionError> {
        self.runtime.block_on(self.session.commit())
    }

    /// # Errors
    /// See [`Session::rollback`].
    pub fn rollback(&mut self) -> Result<(), SqlSessionError> {
        self.runtime.block_on(self.session.rollback())
    }

    /// # Errors
    /// See [`admin::backup_database`].
    pub fn backup_database(&mut self, database: &str, file_path: &str) -> Result<(), SqlSessionError> {
        self.runtime
            .block_on(admin::backup_database(&mut self.session, database, file_path))
    }

    /// # Errors
    /// See [`admin::restore_database`].
    pub fn restore_database(&mut self, database: &str, file_path: &str) -> Result<(), SqlSessionError> {
        self.runtime
            .block_on(admin::restore_database(&mut self.session, database, file_path))
    }

    /// # Errors
    /// See [`admin::clone_table_structure`].
    pub fn clone_table_structure(&mut self, source: &str, new_table: &str) -> Result<(), SqlSessionError> {
        self.runtime
            .block_on(admin::clone_table_structure(&mut self.session, source, new_table))
    }

    /// # Errors
    /// See [`admin::clone_table_with_data`].
    pub fn clone_table_with_data(
        &mut self,
        source: &str,
        new_table: &str,
    ) -> Result<usize, SqlSessionError> {
        self.runtime
            .block_on(admin::clone_table_with_data(&mut self.session, source, new_table))
    }

    /// # Errors
    /// See [`Session::close`].
    pub fn close(&mut self) -> Result<(), SqlSessionError> {
        self.runtime.block_on(self.session.close())
    }
}

impl Drop for BlockingSession {
    fn drop(&mut self) {
        if self.session.is_open()
            && let Err(e) = self.runtime.block_on(self.session.close())
        {
            tracing::warn!(error = %e, "failed to close blocking session");
        }
    }
}
