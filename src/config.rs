//! Connection descriptors.
//!
//! A [`ConnectionDescriptor`] says which backend to open and how. It round-trips
//! through serde, tagged by `backend`:
//!
//! ```json
//! { "backend": "sqlite", "db_path": "app.db", "busy_timeout_ms": 5000 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SqlSessionError;
use crate::types::BackendKind;

#[cfg(feature = "mssql")]
use crate::mssql::MssqlOptions;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteOptions;

/// Everything needed to open a connection for one unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ConnectionDescriptor {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
    #[cfg(feature = "mssql")]
    Mssql(MssqlOptions),
    /// SQL Server ADO.NET connection string, handed to the driver as-is.
    #[cfg(feature = "mssql")]
    MssqlConnectionString { connection_string: String },
}

impl ConnectionDescriptor {
    /// `SQLite` database file with default options.
    #[cfg(feature = "sqlite")]
    #[must_use]
    pub fn sqlite(db_path: impl Into<String>) -> Self {
        ConnectionDescriptor::Sqlite(SqliteOptions::new(db_path))
    }

    /// SQL Server ADO.NET connection string.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` for a blank string, or when the
    /// crate was built without SQL Server support.
    pub fn from_connection_string(connection_string: &str) -> Result<Self, SqlSessionError> {
        if connection_string.trim().is_empty() {
            return Err(SqlSessionError::ConfigError(
                "connection string must not be blank".to_string(),
            ));
        }
        #[cfg(feature = "mssql")]
        {
            Ok(ConnectionDescriptor::MssqlConnectionString {
                connection_string: connection_string.to_string(),
            })
        }
        #[cfg(not(feature = "mssql"))]
        {
            Err(SqlSessionError::ConfigError(
                "connection strings require the `mssql` feature".to_string(),
            ))
        }
    }

    /// Parse a descriptor from its JSON form.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` if the JSON does not describe a
    /// backend this build supports.
    pub fn from_json(json: &str) -> Result<Self, SqlSessionError> {
        serde_json::from_str(json)
            .map_err(|e| SqlSessionError::ConfigError(format!("invalid connection descriptor: {e}")))
    }

    /// # Errors
    /// Returns `SqlSessionError::ConfigError` if serialization fails.
    pub fn to_json(&self) -> Result<String, SqlSessionError> {
        serde_json::to_string(self)
            .map_err(|e| SqlSessionError::ConfigError(format!("cannot serialize descriptor: {e}")))
    }

    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            #[cfg(feature = "sqlite")]
            ConnectionDescriptor::Sqlite(_) => BackendKind::Sqlite,
            #[cfg(feature = "mssql")]
            ConnectionDescriptor::Mssql(_) | ConnectionDescriptor::MssqlConnectionString { .. } => {
                BackendKind::Mssql
            }
        }
    }
}
