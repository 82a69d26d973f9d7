use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SqlSessionError;
use crate::types::SqlValue;

use super::row::DataRow;

/// The materialized result of a tabular command.
///
/// Rows are buffered in full before the connection is released; once handed to
/// the caller the set is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
    rows: Vec<DataRow>,
}

impl ResultSet {
    /// Start an empty result set with the given column names.
    pub(crate) fn with_columns(columns: Vec<String>, capacity: usize) -> Self {
        // First occurrence wins for duplicate names (e.g. `SELECT a.id, b.id`).
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            columns: Arc::new(columns),
            index: Arc::new(index),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append a row; its width must match the column count.
    pub(crate) fn push_row(&mut self, values: Vec<SqlValue>) -> Result<(), SqlSessionError> {
        if values.len() != self.columns.len() {
            return Err(SqlSessionError::CommandError(format!(
                "row has {} values but result has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(DataRow::new(
            Arc::clone(&self.columns),
            Arc::clone(&self.index),
            values,
        ));
        Ok(())
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row, if any. This is what a scalar command reads.
    #[must_use]
    pub fn first_value(&self) -> Option<&SqlValue> {
        self.rows.first().and_then(|row| row.get_by_index(0))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a DataRow;
    type IntoIter = std::slice::Iter<'a, DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = DataRow;
    type IntoIter = std::vec::IntoIter<DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
