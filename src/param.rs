use crate::error::SqlSessionError;
use crate::identifier::validate_name;
use crate::types::SqlValue;

/// Characters some engines use to mark a placeholder; names are stored without them.
const MARKERS: &[char] = &['@', ':', '$', '?'];

/// One named bind parameter.
///
/// The name is stored bare (`id`, not `@id`); [`placeholder`](Parameter::placeholder)
/// renders it the way it appears in SQL text:
/// ```rust
/// use sql_session::prelude::*;
///
/// let p = Parameter::new("id", 5)?;
/// assert_eq!(p.placeholder(), "@id");
/// # Ok::<(), SqlSessionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: SqlValue,
}

impl Parameter {
    /// Create a parameter, rejecting blank names, leading marker characters and
    /// anything outside the identifier allow-list.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ArgumentError` if the name is invalid.
    pub fn new(name: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self, SqlSessionError> {
        let name = name.into();
        if name.starts_with(MARKERS) {
            return Err(SqlSessionError::argument(format!(
                "parameter name '{name}' must not start with a placeholder marker"
            )));
        }
        validate_name(&name, "parameter name")?;
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    /// Build several parameters from `(name, value)` pairs.
    ///
    /// # Errors
    /// Returns the first invalid-name error encountered.
    pub fn list<N, V, I>(pairs: I) -> Result<Vec<Parameter>, SqlSessionError>
    where
        N: Into<String>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (N, V)>,
    {
        pairs
            .into_iter()
            .map(|(name, value)| Parameter::new(name, value))
            .collect()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    /// The placeholder as written in SQL text, e.g. `@id`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("@{}", self.name)
    }

    #[must_use]
    pub fn into_parts(self) -> (String, SqlValue) {
        (self.name, self.value)
    }
}
