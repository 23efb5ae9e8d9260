use rusqlite::types::Value;

use crate::error::CrudDbError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Owned `SQLite` parameters, movable onto the blocking pool.
#[derive(Debug, Clone)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert row values into `SQLite` values.
    ///
    /// # Errors
    /// Currently infallible; binding errors surface when the statement executes.
    pub fn convert(params: &[RowValues]) -> Result<Self, CrudDbError> {
        Ok(Params(params.iter().map(row_value_to_sqlite_value).collect()))
    }

    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }

    /// Build a borrowed params slice suitable for rusqlite execution.
    #[must_use]
    pub fn as_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.0.iter().map(|v| v as &dyn rusqlite::ToSql).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn converts_native_types() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let params = Params::convert(&[
            RowValues::Bool(true),
            RowValues::Timestamp(dt),
            RowValues::JSON(json!({"k": 1})),
            RowValues::Null,
        ])
        .unwrap();
        assert_eq!(
            params.as_values(),
            &[
                Value::Integer(1),
                Value::Text("2024-06-15 10:30:00".into()),
                Value::Text(r#"{"k":1}"#.into()),
                Value::Null,
            ]
        );
        assert_eq!(params.as_refs().len(), 4);
    }
}
