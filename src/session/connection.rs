use crate::config::ConnectionDescriptor;
use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::results::ResultSet;

#[cfg(feature = "mssql")]
use crate::mssql::{MssqlConnection, config_from_connection_string};
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConnection;

/// An open connection to whichever backend the descriptor names.
#[derive(Debug)]
pub(crate) enum BackendConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
    #[cfg(feature = "mssql")]
    Mssql(MssqlConnection),
}

impl BackendConnection {
    pub(crate) async fn open(descriptor: &ConnectionDescriptor) -> Result<Self, SqlSessionError> {
        match descriptor {
            #[cfg(feature = "sqlite")]
            ConnectionDescriptor::Sqlite(opts) => {
                Ok(BackendConnection::Sqlite(SqliteConnection::open(opts).await?))
            }
            #[cfg(feature = "mssql")]
            ConnectionDescriptor::Mssql(opts) => Ok(BackendConnection::Mssql(
                MssqlConnection::connect(opts.tiberius_config()).await?,
            )),
            #[cfg(feature = "mssql")]
            ConnectionDescriptor::MssqlConnectionString { connection_string } => {
                let config = config_from_connection_string(connection_string)?;
                Ok(BackendConnection::Mssql(MssqlConnection::connect(config).await?))
            }
        }
    }

    pub(crate) async fn execute(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.execute(sql, params).await,
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.execute(sql, params).await,
        }
    }

    pub(crate) async fn query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.query(sql, params).await,
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.query(sql, params).await,
        }
    }

    pub(crate) async fn call_procedure(
        &mut self,
        quoted_procedure: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.call_procedure(quoted_procedure, params),
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.call_procedure(quoted_procedure, params).await,
        }
    }

    pub(crate) async fn begin(&mut self) -> Result<(), SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.begin().await,
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.begin().await,
        }
    }

    pub(crate) async fn commit(&mut self) -> Result<(), SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.commit().await,
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.commit().await,
        }
    }

    pub(crate) async fn rollback(&mut self) -> Result<(), SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.rollback().await,
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.rollback().await,
        }
    }

    pub(crate) async fn close(self) -> Result<(), SqlSessionError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => conn.close().await,
            #[cfg(feature = "mssql")]
            BackendConnection::Mssql(conn) => conn.close().await,
        }
    }
}
