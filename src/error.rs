use thiserror::Error;

/// Errors surfaced by a [`Session`](crate::Session) and the helpers around it.
///
/// Driver errors are folded into the variant that names *where* the failure
/// happened (opening the connection vs. running the command), with the driver's
/// message and the offending identifier kept in the text.
#[derive(Debug, Error)]
pub enum SqlSessionError {
    /// Malformed or missing caller input: blank table name, empty column list,
    /// mismatched name/value arrays, invalid identifiers, blank admin arguments.
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// The connection could not be opened or closed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine rejected or failed the command (syntax, constraint violation, ...).
    #[error("Command error: {0}")]
    CommandError(String),

    /// Transaction misuse: commit/rollback without begin, or a second begin.
    #[error("Transaction state error: {0}")]
    StateError(String),

    /// A scalar value could not be coerced into the requested Rust type.
    #[error("Conversion error: {0}")]
    ConversionError(String),

    /// Invalid connection descriptor or runtime setup.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SqlSessionError {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        SqlSessionError::ArgumentError(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        SqlSessionError::StateError(msg.into())
    }

    pub(crate) fn conversion(msg: impl Into<String>) -> Self {
        SqlSessionError::ConversionError(msg.into())
    }
}
