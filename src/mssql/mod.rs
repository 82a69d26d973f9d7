// SQL Server backend
//
// - config: discrete options, ADO connection strings, driver config
// - params: `@name` -> `@Pn` translation and value binding
// - query: result buffering and affected-row totals
// - client: one open tiberius connection

pub mod client;
pub mod config;
pub mod params;
pub mod query;

pub use client::{MssqlClient, MssqlConnection};
pub use config::{MssqlOptions, MssqlOptionsBuilder, config_from_connection_string};
