use std::sync::Arc;

use chrono::NaiveDate;
use mysql_async::consts::ColumnType;
use mysql_async::prelude::Queryable;
use mysql_async::{Column, Conn, Row, Value};

use crate::error::CrudDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

// collation id of the `binary` charset
const BINARY_CHARSET: u16 = 63;

fn date_value(
    (year, month, day, hour, minute, second, micros): (u16, u8, u8, u8, u8, u8, u32),
) -> RowValues {
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .and_then(|d| {
            d.and_hms_micro_opt(
                u32::from(hour),
                u32::from(minute),
                u32::from(second),
                micros,
            )
        })
        // zero dates (0000-00-00) have no chrono equivalent
        .map_or(RowValues::Null, RowValues::Timestamp)
}

fn time_value(
    negative: bool,
    days: u32,
    hours: u8,
    minutes: u8,
    seconds: u8,
    micros: u32,
) -> String {
    let sign = if negative { "-" } else { "" };
    let total_hours = days * 24 + u32::from(hours);
    if micros == 0 {
        format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}

fn bytes_value(column: &Column, bytes: Vec<u8>) -> RowValues {
    match column.column_type() {
        ColumnType::MYSQL_TYPE_JSON => match serde_json::from_slice(&bytes) {
            Ok(json) => RowValues::JSON(json),
            Err(_) => RowValues::Text(String::from_utf8_lossy(&bytes).into_owned()),
        },
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            text.parse::<f64>()
                .map_or(RowValues::Text(text), RowValues::Float)
        }
        _ if column.character_set() == BINARY_CHARSET => RowValues::Blob(bytes),
        _ => match String::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text),
            Err(e) => RowValues::Blob(e.into_bytes()),
        },
    }
}

/// Map one binary-protocol `MySQL` value to `RowValues`.
#[must_use]
pub fn mysql_extract_value(column: &Column, value: Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Int(i) => RowValues::Int(i),
        Value::UInt(u) => {
            i64::try_from(u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int)
        }
        Value::Float(f) => RowValues::Float(f64::from(f)),
        Value::Double(d) => RowValues::Float(d),
        Value::Date(y, mo, d, h, mi, s, us) => date_value((y, mo, d, h, mi, s, us)),
        Value::Time(neg, days, h, mi, s, us) => {
            RowValues::Text(time_value(neg, days, h, mi, s, us))
        }
        Value::Bytes(bytes) => bytes_value(column, bytes),
    }
}

/// Run a prepared query and collect every row into a `ResultSet`.
///
/// # Errors
/// Returns `CrudDbError::MysqlError` if execution or row streaming fails.
pub async fn build_result_set(
    conn: &mut Conn,
    query: &str,
    params: mysql_async::Params,
) -> Result<ResultSet, CrudDbError> {
    let mut result = conn.exec_iter(query, params).await?;
    let columns: Arc<[Column]> = result
        .columns()
        .unwrap_or_else(|| Arc::from(Vec::<Column>::new()));
    let rows: Vec<Row> = result.collect_and_drop().await?;

    let column_names: Vec<String> = columns
        .iter()
        .map(|c| c.name_str().into_owned())
        .collect();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for mut row in rows {
        let row_values = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let value = row.take::<Value, _>(idx).unwrap_or(Value::NULL);
                mysql_extract_value(column, value)
            })
            .collect();
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_and_zero_dates() {
        let ts = date_value((2024, 6, 15, 10, 30, 0, 0));
        assert_eq!(
            ts.as_timestamp(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 30, 0)
        );
        assert!(date_value((0, 0, 0, 0, 0, 0, 0)).is_null());
    }

    #[test]
    fn times_render_as_text() {
        assert_eq!(time_value(false, 1, 2, 3, 4, 0), "26:03:04");
        assert_eq!(time_value(true, 0, 0, 0, 5, 1500), "-00:00:05.001500");
    }
}
