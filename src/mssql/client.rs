use tiberius::{Client, Config, Query, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::params::{bind_positional, bind_query_params, procedure_text};
use super::query::{build_result_set, execute};
use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::results::ResultSet;

/// Type alias for the SQL Server client.
pub type MssqlClient = Client<Compat<TcpStream>>;

/// One open SQL Server connection.
pub struct MssqlConnection {
    client: MssqlClient,
}

impl std::fmt::Debug for MssqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlConnection").finish_non_exhaustive()
    }
}

impl MssqlConnection {
    /// Connect using a prepared driver configuration.
    ///
    /// Named instances are resolved through the SQL Browser service.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConnectionError` if the TCP or TDS handshake fails.
    pub async fn connect(config: Config) -> Result<Self, SqlSessionError> {
        let addr = config.get_addr().to_string();
        let tcp = TcpStream::connect_named(&config).await.map_err(|e| {
            SqlSessionError::ConnectionError(format!("TCP connection error for {addr}: {e}"))
        })?;
        tcp.set_nodelay(true).map_err(|e| {
            SqlSessionError::ConnectionError(format!("TCP configuration error: {e}"))
        })?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| {
                SqlSessionError::ConnectionError(format!("SQL Server connection error: {e}"))
            })?;
        tracing::debug!(addr = %addr, "opened SQL Server connection");
        Ok(Self { client })
    }

    /// # Errors
    /// Returns `SqlSessionError::ArgumentError` for parameters with no matching
    /// placeholder and `SqlSessionError::CommandError` if execution fails.
    pub async fn execute(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError> {
        execute(&mut self.client, bind_query_params(sql, params)?).await
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if execution fails.
    pub async fn query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        build_result_set(&mut self.client, bind_query_params(sql, params)?).await
    }

    /// Run a stored procedure given its already-quoted name.
    ///
    /// # Errors
    /// Returns `SqlSessionError::CommandError` if execution fails.
    pub async fn call_procedure(
        &mut self,
        quoted_procedure: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        let sql = procedure_text(quoted_procedure, params);
        build_result_set(&mut self.client, bind_positional(sql, params)).await
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if the server refuses.
    pub async fn begin(&mut self) -> Result<(), SqlSessionError> {
        self.batch("BEGIN TRANSACTION").await
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if the commit fails.
    pub async fn commit(&mut self) -> Result<(), SqlSessionError> {
        self.batch("COMMIT TRANSACTION").await
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if the rollback fails.
    pub async fn rollback(&mut self) -> Result<(), SqlSessionError> {
        self.batch("ROLLBACK TRANSACTION").await
    }

    async fn batch(&mut self, sql: &'static str) -> Result<(), SqlSessionError> {
        execute(&mut self.client, Query::new(sql)).await.map(drop)
    }

    /// # Errors
    /// Returns `SqlSessionError::ConnectionError` if the server does not close cleanly.
    pub async fn close(self) -> Result<(), SqlSessionError> {
        self.client.close().await.map_err(|e| {
            SqlSessionError::ConnectionError(format!("SQL Server close error: {e}"))
        })
    }
}
