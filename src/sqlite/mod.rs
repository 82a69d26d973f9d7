// SQLite backend
//
// - config: file path and connection pragmas
// - params: SqlValue -> rusqlite binding by `@name`
// - query: row extraction into a buffered ResultSet
// - connection: one open connection driven through spawn_blocking

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use query::build_result_set;
