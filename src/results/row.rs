use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{ColumnIndex, build_column_index};
use crate::types::RowValues;

/// An ordered mapping from column name to value.
///
/// Records are what `select`-style calls return, and they are also the payload for
/// `insert` and `update`. Column order is preserved, so the generated column list and
/// bound parameters follow the order fields were added:
/// ```rust
/// use sql_crud::prelude::*;
///
/// let user = Record::from_pairs([("name", RowValues::from("alice")), ("age", 31.into())]);
/// assert_eq!(user.column_names.as_slice(), ["name", "age"]);
/// assert_eq!(user.get("age"), Some(&RowValues::Int(31)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// The column names (shared across all rows of a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values, positionally aligned with `column_names`
    pub values: Vec<RowValues>,
    #[doc(hidden)]
    pub(crate) column_index_cache: ColumnIndex,
}

impl Record {
    /// Create a record from shared column names and aligned values.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let cache = build_column_index(&column_names);
        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    pub(crate) fn with_index(
        column_names: Arc<Vec<String>>,
        values: Vec<RowValues>,
        column_index_cache: ColumnIndex,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    /// Build a payload from `(column, value)` pairs, keeping their order.
    ///
    /// A repeated column keeps its first position and takes the last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        let mut record = Self::default();
        for (column, value) in pairs {
            record.set(column, value);
        }
        record
    }

    /// Set a column, replacing the value in place if the column already exists.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<RowValues>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        if let Some(idx) = self.get_column_index(&column) {
            self.values[idx] = value;
        } else {
            let idx = self.values.len();
            Arc::make_mut(&mut self.column_index_cache).insert(column.clone(), idx);
            Arc::make_mut(&mut self.column_names).push(column);
            self.values.push(value);
        }
        self
    }

    /// Builder-style variant of [`Record::set`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.set(column, value);
        self
    }

    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Render the record as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(k, v)| {
                    let json = serde_json::to_value(v).unwrap_or(serde_json::Value::Null);
                    (k.to_string(), json)
                })
                .collect(),
        )
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.column_names == other.column_names && self.values == other.values
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_replaces_in_place() {
        let mut rec = Record::from_pairs([("a", 1), ("b", 2)]);
        rec.set("a", 10);
        assert_eq!(rec.column_names.as_slice(), ["a", "b"]);
        assert_eq!(rec.values, vec![RowValues::Int(10), RowValues::Int(2)]);
        assert_eq!(rec.get_by_index(1), Some(&RowValues::Int(2)));
        assert_eq!(rec.get_by_index(2), None);
    }

    #[test]
    fn shared_columns_are_copied_on_write() {
        let names = Arc::new(vec!["id".to_string()]);
        let row = Record::new(names.clone(), vec![RowValues::Int(1)]);
        let extended = row.clone().with("extra", "x");
        assert_eq!(row.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(names.len(), 1);
        assert_eq!(extended.get("extra").and_then(RowValues::as_text), Some("x"));
    }

    #[test]
    fn serializes_as_object_in_order() {
        let rec = Record::default()
            .with("name", "bob")
            .with("nick", Option::<String>::None);
        assert_eq!(
            serde_json::to_string(&rec).unwrap(),
            r#"{"name":"bob","nick":null}"#
        );
        assert_eq!(rec.to_json(), json!({"name": "bob", "nick": null}));
    }
}
