//! The connection/command wrapper.
//!
//! A [`Session`] owns one connection slot and one [`Command`]. Outside a
//! transaction the connection is opened right before a command runs and closed
//! right after, whether the command succeeded or not. While a transaction is
//! active the connection stays open and every command runs inside it.

mod checkout;
mod command;
mod connection;
mod crud;
mod executor;
mod transaction;

pub use command::{Command, CommandKind};
pub use crud::QueryOutcome;
pub use executor::CommandExecutor;
pub use transaction::TransactionState;

use crate::config::ConnectionDescriptor;
use crate::error::SqlSessionError;
use crate::identifier::quote_qualified;
use crate::param::Parameter;
use crate::results::ResultSet;
use checkout::{Checkout, close_in_background};
use connection::BackendConnection;

/// One connection slot plus the command that runs on it.
///
/// Methods take `&mut self`, so a session serves one caller at a time; give
/// concurrent units of work their own session.
#[derive(Debug)]
pub struct Session {
    descriptor: ConnectionDescriptor,
    connection: Option<BackendConnection>,
    command: Command,
    transaction: TransactionState,
}

impl Session {
    #[must_use]
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self {
            descriptor,
            connection: None,
            command: Command::default(),
            transaction: TransactionState::New,
        }
    }

    /// Session for a SQL Server ADO.NET connection string.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` for a blank string or a build
    /// without the `mssql` feature.
    pub fn from_connection_string(connection_string: &str) -> Result<Self, SqlSessionError> {
        ConnectionDescriptor::from_connection_string(connection_string).map(Self::new)
    }

    #[must_use]
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Whether a connection is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    #[must_use]
    pub fn transaction_state(&self) -> TransactionState {
        self.transaction
    }

    /// The most recently assigned command.
    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Release the connection now, rolling back an active transaction first.
    ///
    /// # Errors
    /// Returns the rollback or close error; the connection is gone either way.
    pub async fn close(&mut self) -> Result<(), SqlSessionError> {
        let Some(mut conn) = self.connection.take() else {
            return Ok(());
        };
        let rolled_back = if self.transaction.is_active() {
            self.transaction = TransactionState::RolledBack;
            tracing::debug!("rolling back active transaction on close");
            conn.rollback().await
        } else {
            Ok(())
        };
        let closed = conn.close().await;
        tracing::debug!("connection closed");
        rolled_back.and(closed)
    }

    fn assign(
        &mut self,
        text: &str,
        kind: CommandKind,
        params: &[Parameter],
    ) -> Result<(), SqlSessionError> {
        self.command.reset(text, kind, params)?;
        tracing::debug!(
            kind = %kind,
            sql = %self.command.text(),
            params = params.len(),
            in_transaction = self.transaction.is_active(),
            "executing command"
        );
        Ok(())
    }

    pub(crate) async fn run_non_query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError> {
        self.assign(sql, CommandKind::Text, params)?;
        let mut checkout = Checkout::open(
            &mut self.connection,
            &self.descriptor,
            self.transaction.is_active(),
        )
        .await?;
        let result = checkout
            .connection()?
            .execute(self.command.text(), self.command.parameters())
            .await;
        checkout.release().await;
        result
    }

    pub(crate) async fn run_tabular(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        self.assign(sql, CommandKind::Text, params)?;
        let mut checkout = Checkout::open(
            &mut self.connection,
            &self.descriptor,
            self.transaction.is_active(),
        )
        .await?;
        let result = checkout
            .connection()?
            .query(self.command.text(), self.command.parameters())
            .await;
        checkout.release().await;
        result
    }

    pub(crate) async fn run_procedure(
        &mut self,
        procedure: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        let quoted = quote_qualified(procedure, "procedure name")?;
        self.assign(&quoted, CommandKind::StoredProcedure, params)?;
        let mut checkout = Checkout::open(
            &mut self.connection,
            &self.descriptor,
            self.transaction.is_active(),
        )
        .await?;
        let result = checkout
            .connection()?
            .call_procedure(self.command.text(), self.command.parameters())
            .await;
        checkout.release().await;
        result
    }

    /// Close the connection unless a transaction still needs it.
    async fn release(&mut self) {
        if self.transaction.is_active() {
            return;
        }
        if let Some(conn) = self.connection.take() {
            match conn.close().await {
                Ok(()) => tracing::debug!("connection closed"),
                Err(e) => tracing::warn!(error = %e, "failed to close connection"),
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.take() {
            close_in_background(conn, self.transaction.is_active());
        }
    }
}
