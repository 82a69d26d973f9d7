use std::fmt;

use crate::binder::ensure_unique;
use crate::error::SqlSessionError;
use crate::param::Parameter;

/// How the command text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandKind {
    /// SQL text, possibly with `@name` placeholders.
    #[default]
    Text,
    /// A stored procedure name; parameters are passed as named arguments.
    StoredProcedure,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Text => f.write_str("text"),
            CommandKind::StoredProcedure => f.write_str("stored procedure"),
        }
    }
}

/// The single command a [`Session`](crate::Session) owns.
///
/// Each new statement replaces the text and kind and clears the previous
/// parameters before the new ones are attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    text: String,
    kind: CommandKind,
    parameters: Vec<Parameter>,
}

impl Command {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn reset(
        &mut self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<(), SqlSessionError> {
        self.parameters.clear();
        self.text.clear();
        self.kind = kind;
        if text.trim().is_empty() {
            return Err(SqlSessionError::argument("command text must not be blank"));
        }
        ensure_unique(parameters)?;
        self.text.push_str(text);
        self.parameters.extend_from_slice(parameters);
        Ok(())
    }
}
