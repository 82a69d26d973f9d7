//! `sql-session`: one connection, one command, optional transaction.
//!
//! A [`Session`] builds INSERT/UPDATE/DELETE/SELECT statements from table and
//! column metadata, or runs caller-supplied SQL, stored procedures and
//! table-valued functions. Identifiers are allow-listed and bracket-quoted;
//! values always travel as `@name` parameters.
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn demo() -> Result<(), sql_session::SqlSessionError> {
//! use sql_session::prelude::*;
//!
//! let mut session = Session::new(ConnectionDescriptor::sqlite("app.db"));
//! session.insert("Users", &["id", "name"], &[SqlValue::Int(1), "a".into()]).await?;
//! let rows = session.select("Users", &["*"], &[("id", SqlValue::Int(1))]).await?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(feature = "sqlite", feature = "mssql")))]
compile_error!("enable at least one backend feature: `sqlite` or `mssql`");

pub mod admin;
pub mod binder;
pub mod blocking;
pub mod config;
pub mod conversion;
pub mod error;
pub mod export;
pub mod identifier;
pub mod param;
pub mod prelude;
pub mod results;
pub mod session;
pub mod statement;
pub mod translation;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use blocking::BlockingSession;
pub use config::ConnectionDescriptor;
pub use conversion::FromScalar;
pub use error::SqlSessionError;
pub use param::Parameter;
pub use results::{DataRow, ResultSet};
pub use session::{
    Command, CommandExecutor, CommandKind, QueryOutcome, Session, TransactionState,
};
pub use statement::{QueryKind, Statement, StatementBuilder};
pub use types::{BackendKind, SqlValue};
