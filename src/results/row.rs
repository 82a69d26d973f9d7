use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// One row of a [`ResultSet`](super::ResultSet): values in column order plus a
/// shared name→index map for lookups by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    columns: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
    values: Vec<SqlValue>,
}

impl DataRow {
    pub(crate) fn new(
        columns: Arc<Vec<String>>,
        index: Arc<HashMap<String, usize>>,
        values: Vec<SqlValue>,
    ) -> Self {
        Self {
            columns,
            index,
            values,
        }
    }

    /// Get a value by column name.
    ///
    /// Exact matches win; otherwise the first column matching case-insensitively
    /// is used, since SQL Server column names are case-insensitive.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        let idx = self.index.get(column_name).copied().or_else(|| {
            self.columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(column_name))
        })?;
        self.values.get(idx)
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Iterate `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
