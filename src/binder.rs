//! Turning name/value arrays into bound parameters.

use std::collections::HashSet;

use crate::error::SqlSessionError;
use crate::identifier::MAX_PART_LEN;
use crate::param::Parameter;
use crate::types::SqlValue;

/// Prefix that separates WHERE-clause parameters from SET/VALUES parameters.
pub const WHERE_PREFIX: &str = "p_";

/// Zip `names` with `values` positionally.
///
/// Either side being empty yields no parameters at all, which is what statement
/// kinds without values (a DELETE with no WHERE, a SELECT) expect.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` when both sides are non-empty but of
/// different lengths, or when a name is invalid.
pub fn bind<N: AsRef<str>>(
    names: &[N],
    values: &[SqlValue],
) -> Result<Vec<Parameter>, SqlSessionError> {
    if names.is_empty() || values.is_empty() {
        return Ok(Vec::new());
    }
    if names.len() != values.len() {
        return Err(SqlSessionError::argument(format!(
            "{} parameter names but {} values",
            names.len(),
            values.len()
        )));
    }
    names
        .iter()
        .zip(values)
        .map(|(name, value)| Parameter::new(name.as_ref(), value.clone()))
        .collect()
}

/// Reject duplicate parameter names (compared case-insensitively, as SQL Server does).
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` naming the first duplicate.
pub fn ensure_unique(params: &[Parameter]) -> Result<(), SqlSessionError> {
    let mut seen = HashSet::with_capacity(params.len());
    for p in params {
        if !seen.insert(p.name().to_ascii_lowercase()) {
            return Err(SqlSessionError::argument(format!(
                "duplicate parameter name '@{}'",
                p.name()
            )));
        }
    }
    Ok(())
}

/// Tracks names already handed out for one statement.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name; returns `false` if it was already taken.
    pub fn claim(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_ascii_lowercase())
    }

    /// Name for a WHERE parameter on `column`: `p_<column>`, or `p_<column>_<n>`
    /// with the smallest `n` that is still free.
    ///
    /// Names that would exceed the identifier length limit fall back to `p_<n>`.
    pub fn where_name(&mut self, column: &str) -> String {
        let base = format!("{WHERE_PREFIX}{column}");
        if base.len() <= MAX_PART_LEN && self.claim(&base) {
            return base;
        }
        let mut n = 1usize;
        loop {
            let mut candidate = format!("{base}_{n}");
            if candidate.len() > MAX_PART_LEN {
                candidate = format!("{WHERE_PREFIX}{n}");
            }
            if self.claim(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
