//! Convenient imports for common functionality.

pub use crate::admin::{
    backup_database, clone_table_structure, clone_table_with_data, restore_database,
};
pub use crate::blocking::BlockingSession;
pub use crate::config::ConnectionDescriptor;
pub use crate::conversion::FromScalar;
pub use crate::error::SqlSessionError;
pub use crate::export::{ExportFormat, to_csv, to_html};
pub use crate::param::Parameter;
pub use crate::results::{DataRow, ResultSet};
pub use crate::session::{
    Command, CommandExecutor, CommandKind, QueryOutcome, Session, TransactionState,
};
pub use crate::statement::{QueryKind, Statement, StatementBuilder};
pub use crate::types::{BackendKind, SqlValue};

#[cfg(feature = "mssql")]
pub use crate::mssql::{MssqlOptions, MssqlOptionsBuilder};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
