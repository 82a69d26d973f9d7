use serde::{Deserialize, Serialize};
use tiberius::{AuthMethod, Config as TiberiusConfig};

use crate::config::ConnectionDescriptor;
use crate::error::SqlSessionError;

pub(crate) const DEFAULT_PORT: u16 = 1433;

/// Discrete SQL Server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MssqlOptions {
    pub server: String,
    pub database: String,
    pub user: String,
    pub password: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub instance_name: Option<String>,
    /// Accept the server certificate without validation.
    #[serde(default)]
    pub trust_cert: bool,
}

impl MssqlOptions {
    #[must_use]
    pub fn new(server: String, database: String, user: String, password: String) -> Self {
        Self {
            server,
            database,
            user,
            password,
            port: None,
            instance_name: None,
            trust_cert: false,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_instance_name(mut self, instance_name: Option<String>) -> Self {
        self.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn with_trust_cert(mut self, trust_cert: bool) -> Self {
        self.trust_cert = trust_cert;
        self
    }

    /// Assemble the settings into one ADO.NET-style connection string.
    ///
    /// Values containing `;`, `=`, quotes or surrounding whitespace are wrapped in
    /// double quotes with embedded double quotes doubled.
    #[must_use]
    pub fn connection_string(&self) -> String {
        let mut server = format!("tcp:{}", self.server);
        if let Some(instance) = &self.instance_name {
            server.push('\\');
            server.push_str(instance);
        }
        if let Some(port) = self.port {
            server.push_str(&format!(",{port}"));
        }

        let mut parts = vec![
            format!("server={}", ado_value(&server)),
            format!("database={}", ado_value(&self.database)),
            format!("user={}", ado_value(&self.user)),
            format!("password={}", ado_value(&self.password)),
        ];
        if self.trust_cert {
            parts.push("TrustServerCertificate=true".to_string());
        }
        parts.join(";")
    }

    pub(crate) fn tiberius_config(&self) -> TiberiusConfig {
        let mut config = TiberiusConfig::new();
        config.host(&self.server);
        config.database(&self.database);
        config.port(self.port.unwrap_or(DEFAULT_PORT));
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        if let Some(instance) = &self.instance_name {
            config.instance_name(instance);
        }
        if self.trust_cert {
            config.trust_cert();
        }
        config
    }
}

fn ado_value(value: &str) -> String {
    let needs_quotes = value.contains([';', '=', '"', '\''])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build the driver configuration from an ADO.NET connection string.
///
/// # Errors
/// Returns `SqlSessionError::ConfigError` for blank or unparsable strings.
pub fn config_from_connection_string(
    connection_string: &str,
) -> Result<TiberiusConfig, SqlSessionError> {
    if connection_string.trim().is_empty() {
        return Err(SqlSessionError::ConfigError(
            "connection string must not be blank".to_string(),
        ));
    }
    TiberiusConfig::from_ado_string(connection_string).map_err(|e| {
        SqlSessionError::ConfigError(format!("invalid SQL Server connection string: {e}"))
    })
}

/// Fluent builder for SQL Server options.
#[derive(Debug, Clone)]
pub struct MssqlOptionsBuilder {
    opts: MssqlOptions,
}

impl MssqlOptionsBuilder {
    #[must_use]
    pub fn new(server: String, database: String, user: String, password: String) -> Self {
        Self {
            opts: MssqlOptions::new(server, database, user, password),
        }
    }

    #[must_use]
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn instance_name(mut self, instance_name: Option<String>) -> Self {
        self.opts.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn trust_cert(mut self, trust_cert: bool) -> Self {
        self.opts.trust_cert = trust_cert;
        self
    }

    #[must_use]
    pub fn finish(self) -> MssqlOptions {
        self.opts
    }

    #[must_use]
    pub fn build(self) -> ConnectionDescriptor {
        ConnectionDescriptor::Mssql(self.finish())
    }
}
