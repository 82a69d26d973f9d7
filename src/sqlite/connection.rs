use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::spawn_blocking;

use super::config::SqliteOptions;
use super::params::bind_named;
use super::query::build_result_set;
use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::results::ResultSet;

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

fn command_error(e: &rusqlite::Error) -> SqlSessionError {
    SqlSessionError::CommandError(format!("SQLite command failed: {e}"))
}

/// One open `SQLite` connection.
///
/// rusqlite is synchronous, so every operation hops onto the blocking pool
/// while holding the connection lock.
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    path: String,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteConnection {
    /// Open the database file described by `options`.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConnectionError` if the file cannot be opened or
    /// the connection pragmas fail.
    pub async fn open(options: &SqliteOptions) -> Result<Self, SqlSessionError> {
        let opts = options.clone();
        let path = opts.db_path.clone();
        let conn = spawn_blocking(move || -> Result<rusqlite::Connection, SqlSessionError> {
            let open_error = |e: rusqlite::Error| {
                SqlSessionError::ConnectionError(format!(
                    "failed to open SQLite database '{}': {e}",
                    opts.db_path
                ))
            };
            let conn = rusqlite::Connection::open(&opts.db_path).map_err(open_error)?;
            if let Some(timeout) = opts.busy_timeout() {
                conn.busy_timeout(timeout).map_err(open_error)?;
            }
            if opts.foreign_keys {
                conn.execute_batch("PRAGMA foreign_keys = ON;")
                    .map_err(open_error)?;
            }
            Ok(conn)
        })
        .await
        .map_err(|e| {
            SqlSessionError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
        })??;

        tracing::debug!(path = %path, "opened SQLite connection");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Run a statement that returns no rows and report the affected row count.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ArgumentError` for parameters with no matching
    /// placeholder and `SqlSessionError::CommandError` if the engine rejects the
    /// statement.
    pub async fn execute(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlSessionError> {
        let sql = sql.to_owned();
        let params = params.to_vec();
        run_blocking(Arc::clone(&self.conn), move |conn| {
            let mut stmt = conn.prepare(&sql).map_err(|e| command_error(&e))?;
            bind_named(&mut stmt, &params)?;
            stmt.raw_execute().map_err(|e| command_error(&e))
        })
        .await
    }

    /// Run a statement and buffer every row it produces.
    ///
    /// # Errors
    /// Same as [`execute`](Self::execute).
    pub async fn query(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        let sql = sql.to_owned();
        let params = params.to_vec();
        run_blocking(Arc::clone(&self.conn), move |conn| {
            let mut stmt = conn.prepare(&sql).map_err(|e| command_error(&e))?;
            bind_named(&mut stmt, &params)?;
            build_result_set(&mut stmt)
        })
        .await
    }

    /// `SQLite` has no stored procedures, so this always fails.
    ///
    /// # Errors
    /// Always returns `SqlSessionError::CommandError`.
    pub fn call_procedure(
        &self,
        quoted_procedure: &str,
        _params: &[Parameter],
    ) -> Result<ResultSet, SqlSessionError> {
        Err(SqlSessionError::CommandError(format!(
            "SQLite has no stored procedures; cannot execute {quoted_procedure}"
        )))
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if the engine refuses to begin.
    pub async fn begin(&self) -> Result<(), SqlSessionError> {
        self.batch("BEGIN").await
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if the commit fails.
    pub async fn commit(&self) -> Result<(), SqlSessionError> {
        self.batch("COMMIT").await
    }

    /// # Errors
    /// Returns `SqlSessionError::CommandError` if the rollback fails.
    pub async fn rollback(&self) -> Result<(), SqlSessionError> {
        self.batch("ROLLBACK").await
    }

    async fn batch(&self, sql: &'static str) -> Result<(), SqlSessionError> {
        run_blocking(Arc::clone(&self.conn), move |conn| {
            conn.execute_batch(sql).map_err(|e| command_error(&e))
        })
        .await
    }

    /// Close the connection, surfacing any error `SQLite` reports on close.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConnectionError` if the close fails.
    pub async fn close(self) -> Result<(), SqlSessionError> {
        let Self { conn, path } = self;
        spawn_blocking(move || match Arc::try_unwrap(conn) {
            Ok(mutex) => mutex.into_inner().close().map_err(|(_, e)| {
                SqlSessionError::ConnectionError(format!(
                    "failed to close SQLite database '{path}': {e}"
                ))
            }),
            // A blocking task still holds a clone; the handle closes when it drops.
            Err(_) => Ok(()),
        })
        .await
        .map_err(|e| {
            SqlSessionError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
        })?
    }
}

async fn run_blocking<F, R>(conn: SharedSqliteConnection, func: F) -> Result<R, SqlSessionError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlSessionError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlSessionError::CommandError(format!("sqlite spawn_blocking join error: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SqlValue;

    #[tokio::test]
    async fn executes_and_queries_with_named_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conn.db");
        let conn = SqliteConnection::open(&SqliteOptions::new(path.to_string_lossy()))
            .await
            .unwrap();

        conn.execute("CREATE TABLE t (id INTEGER, name TEXT)", &[])
            .await
            .unwrap();
        let params = Parameter::list([("id", SqlValue::Int(1)), ("name", SqlValue::from("a"))])
            .unwrap();
        let affected = conn
            .execute("INSERT INTO [t]([id],[name]) VALUES (@id,@name)", &params)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let filter = Parameter::list([("p_id", SqlValue::Int(1))]).unwrap();
        let rs = conn
            .query("SELECT [name] FROM [t] WHERE [id]=@p_id", &filter)
            .await
            .unwrap();
        assert_eq!(rs.first_value(), Some(&SqlValue::from("a")));
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_parameter_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conn.db");
        let conn = SqliteConnection::open(&SqliteOptions::new(path.to_string_lossy()))
            .await
            .unwrap();
        let params = Parameter::list([("nope", SqlValue::Int(1))]).unwrap();
        let err = conn.query("SELECT 1", &params).await.unwrap_err();
        assert!(matches!(err, SqlSessionError::ArgumentError(_)));
    }
}
