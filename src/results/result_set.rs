use std::sync::Arc;

use super::row::Record;
use super::{ColumnIndex, build_column_index};
use crate::types::RowValues;

/// A result set from a database query
///
/// Holds the rows returned by a query; every row shares one column-name list and one
/// column-index cache.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Record>,
    /// The number of rows read (or affected, for DML statements)
    pub rows_affected: usize,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Option<ColumnIndex>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index_cache: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index_cache = Some(build_column_index(&column_names));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row's values; ignored until column names have been set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(column_names), Some(cache)) = (&self.column_names, &self.column_index_cache)
        {
            self.results.push(Record::with_index(
                column_names.clone(),
                row_values,
                cache.clone(),
            ));
            self.rows_affected += 1;
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.results
    }

    /// First row, if any.
    #[must_use]
    pub fn into_first(self) -> Option<Record> {
        self.results.into_iter().next()
    }
}
