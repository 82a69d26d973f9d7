use std::fmt;

use super::Session;
use super::checkout::Checkout;
use crate::error::SqlSessionError;

/// Lifecycle of the session's transaction scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionState {
    /// No transaction has been started on this session.
    #[default]
    New,
    Active,
    Committed,
    RolledBack,
}

impl TransactionState {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == TransactionState::Active
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionState::New => "new",
            TransactionState::Active => "active",
            TransactionState::Committed => "committed",
            TransactionState::RolledBack => "rolled back",
        };
        f.write_str(s)
    }
}

impl Session {
    /// Open the connection (if needed) and start a transaction on it.
    ///
    /// A session that already committed or rolled back may begin again.
    ///
    /// # Errors
    /// Returns `SqlSessionError::StateError` if a transaction is already active,
    /// `SqlSessionError::ConnectionError`/`CommandError` if opening or BEGIN fails.
    pub async fn begin_transaction(&mut self) -> Result<(), SqlSessionError> {
        if self.transaction.is_active() {
            return Err(SqlSessionError::state("transaction already active"));
        }
        let mut checkout = Checkout::open(&mut self.connection, &self.descriptor, false).await?;
        let begun = checkout.connection()?.begin().await;
        match begun {
            Ok(()) => {
                checkout.keep();
                self.transaction = TransactionState::Active;
                tracing::debug!("transaction started");
                Ok(())
            }
            Err(e) => {
                checkout.release().await;
                Err(e)
            }
        }
    }

    /// Commit the active transaction and close the connection.
    ///
    /// If the commit fails a rollback is attempted, the state becomes
    /// `RolledBack` and the commit error is returned.
    ///
    /// # Errors
    /// Returns `SqlSessionError::StateError` when no transaction is active, or
    /// the driver's commit error.
    pub async fn commit(&mut self) -> Result<(), SqlSessionError> {
        self.require_active()?;
        let result = match self.connection.as_mut() {
            Some(conn) => match conn.commit().await {
                Ok(()) => {
                    self.transaction = TransactionState::Committed;
                    tracing::debug!("transaction committed");
                    Ok(())
                }
                Err(e) => {
                    if let Err(rollback_err) = conn.rollback().await {
                        tracing::warn!(error = %rollback_err, "rollback after failed commit failed");
                    }
                    self.transaction = TransactionState::RolledBack;
                    Err(e)
                }
            },
            None => {
                self.transaction = TransactionState::RolledBack;
                Err(SqlSessionError::state("transaction connection is closed"))
            }
        };
        self.release().await;
        result
    }

    /// Roll back the active transaction and close the connection.
    ///
    /// # Errors
    /// Returns `SqlSessionError::StateError` when no transaction is active, or
    /// the driver's rollback error.
    pub async fn rollback(&mut self) -> Result<(), SqlSessionError> {
        self.require_active()?;
        let result = match self.connection.as_mut() {
            Some(conn) => conn.rollback().await,
            None => Err(SqlSessionError::state("transaction connection is closed")),
        };
        self.transaction = TransactionState::RolledBack;
        tracing::debug!("transaction rolled back");
        self.release().await;
        result
    }

    fn require_active(&self) -> Result<(), SqlSessionError> {
        if self.transaction.is_active() {
            Ok(())
        } else {
            Err(SqlSessionError::state("transaction not started"))
        }
    }
}
