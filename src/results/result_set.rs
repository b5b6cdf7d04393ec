use std::collections::HashMap;
use std::sync::Arc;

use super::row::CustomDbRow;
use crate::types::RowValues;

/// A result set from a database query
///
/// Column names and the name-to-index map are built once and shared by every row.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    /// The number of rows collected
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known row capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        let index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        self.column_index = Some(Arc::new(index));
        self.column_names = Some(column_names);
    }

    /// Add a row to the result set. Rows added before column names are set are dropped.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(column_names), Some(column_index)) = (&self.column_names, &self.column_index)
        {
            self.results.push(CustomDbRow {
                column_names: column_names.clone(),
                rows: row_values,
                column_index_cache: column_index.clone(),
            });
            self.rows_affected += 1;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// First row, if any. Handy for `RETURNING` and single-row lookups.
    #[must_use]
    pub fn first(&self) -> Option<&CustomDbRow> {
        self.results.first()
    }
}
