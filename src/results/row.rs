use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ShowcaseError;
use crate::types::RowValues;

/// A row from a database query result
///
/// This struct represents a single row from a database query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new database row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );

        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    fn require(&self, column_name: &str) -> Result<&RowValues, ShowcaseError> {
        self.get(column_name).ok_or_else(|| {
            ShowcaseError::ExecutionError(format!("column `{column_name}` missing from row"))
        })
    }

    fn mismatch(column_name: &str, expected: &str, found: &RowValues) -> ShowcaseError {
        ShowcaseError::ExecutionError(format!(
            "column `{column_name}`: expected {expected}, found {found:?}"
        ))
    }

    /// Read a non-null integer column.
    ///
    /// # Errors
    /// Returns `ShowcaseError::ExecutionError` if the column is absent or not an integer.
    pub fn get_i64(&self, column_name: &str) -> Result<i64, ShowcaseError> {
        let value = self.require(column_name)?;
        value
            .as_int()
            .copied()
            .ok_or_else(|| Self::mismatch(column_name, "integer", value))
    }

    /// Read a non-null integer column that must fit in 32 bits.
    ///
    /// # Errors
    /// Returns `ShowcaseError::ExecutionError` if the column is absent, not an integer, or out of range.
    pub fn get_i32(&self, column_name: &str) -> Result<i32, ShowcaseError> {
        let wide = self.get_i64(column_name)?;
        i32::try_from(wide).map_err(|e| {
            ShowcaseError::ExecutionError(format!("column `{column_name}` out of range: {e}"))
        })
    }

    /// # Errors
    /// Returns `ShowcaseError::ExecutionError` if the column is absent or not numeric.
    pub fn get_f64(&self, column_name: &str) -> Result<f64, ShowcaseError> {
        let value = self.require(column_name)?;
        value
            .as_float()
            .ok_or_else(|| Self::mismatch(column_name, "float", value))
    }

    /// # Errors
    /// Returns `ShowcaseError::ExecutionError` if the column is absent or not text.
    pub fn get_text(&self, column_name: &str) -> Result<String, ShowcaseError> {
        let value = self.require(column_name)?;
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| Self::mismatch(column_name, "text", value))
    }

    /// # Errors
    /// Returns `ShowcaseError::ExecutionError` if the column is absent or neither text nor NULL.
    pub fn get_opt_text(&self, column_name: &str) -> Result<Option<String>, ShowcaseError> {
        let value = self.require(column_name)?;
        value
            .as_opt_text()
            .map(|text| text.map(str::to_string))
            .ok_or_else(|| Self::mismatch(column_name, "text or NULL", value))
    }

    /// Like [`get_i64`](Self::get_i64) but NULL reads as `None` (outer-join columns).
    ///
    /// # Errors
    /// Returns `ShowcaseError::ExecutionError` if the column is absent or neither integer nor NULL.
    pub fn get_opt_i64(&self, column_name: &str) -> Result<Option<i64>, ShowcaseError> {
        match self.require(column_name)? {
            RowValues::Null => Ok(None),
            RowValues::Int(v) => Ok(Some(*v)),
            other => Err(Self::mismatch(column_name, "integer or NULL", other)),
        }
    }
}
