use chrono::{Datelike, NaiveDateTime, Timelike};
use mysql_async::Value;

use crate::error::CrudDbError;
use crate::types::RowValues;

fn timestamp_to_mysql_value(dt: &NaiveDateTime) -> Result<Value, CrudDbError> {
    let year = u16::try_from(dt.year()).map_err(|_| {
        CrudDbError::ParameterError(format!("timestamp year out of range for MySQL: {dt}"))
    })?;
    // chrono guarantees these fit in u8
    let small = |v: u32| u8::try_from(v).unwrap_or(u8::MAX);
    Ok(Value::Date(
        year,
        small(dt.month()),
        small(dt.day()),
        small(dt.hour()),
        small(dt.minute()),
        small(dt.second()),
        dt.nanosecond() / 1_000,
    ))
}

/// Convert a single `RowValues` to a `mysql_async` value.
///
/// # Errors
/// Returns `CrudDbError::ParameterError` for timestamps before year 0.
pub fn row_value_to_mysql_value(value: &RowValues) -> Result<Value, CrudDbError> {
    Ok(match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => timestamp_to_mysql_value(dt)?,
        RowValues::Null => Value::NULL,
        RowValues::JSON(jval) => Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    })
}

/// Positional `MySQL` parameters.
#[derive(Debug, Clone)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert row values into `mysql_async` values.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` if a value cannot be represented.
    pub fn convert(params: &[RowValues]) -> Result<Self, CrudDbError> {
        params
            .iter()
            .map(row_value_to_mysql_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Params)
    }

    #[must_use]
    pub fn into_mysql_params(self) -> mysql_async::Params {
        if self.0.is_empty() {
            mysql_async::Params::Empty
        } else {
            mysql_async::Params::Positional(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn converts_native_types() {
        let params = Params::convert(&[
            RowValues::Int(42),
            RowValues::Bool(false),
            RowValues::Text("hello".into()),
            RowValues::JSON(json!([1, 2])),
            RowValues::Null,
        ])
        .unwrap();
        assert_eq!(
            params.0,
            vec![
                Value::Int(42),
                Value::Int(0),
                Value::Bytes(b"hello".to_vec()),
                Value::Bytes(b"[1,2]".to_vec()),
                Value::NULL,
            ]
        );
    }

    #[test]
    fn timestamps_become_date_values() {
        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_micro_opt(23, 59, 58, 250_000)
            .unwrap();
        let value = row_value_to_mysql_value(&RowValues::Timestamp(dt)).unwrap();
        assert_eq!(value, Value::Date(2024, 2, 29, 23, 59, 58, 250_000));
    }

    #[test]
    fn negative_years_are_rejected() {
        let dt = NaiveDate::from_ymd_opt(-5, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = row_value_to_mysql_value(&RowValues::Timestamp(dt)).unwrap_err();
        assert!(matches!(err, CrudDbError::ParameterError(_)));
    }

    #[test]
    fn empty_params_map_to_empty() {
        let params = Params::convert(&[]).unwrap();
        assert!(matches!(
            params.into_mysql_params(),
            mysql_async::Params::Empty
        ));
    }
}
