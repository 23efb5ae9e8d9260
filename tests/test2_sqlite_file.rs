#![cfg(feature = "sqlite")]
use chrono::NaiveDate;
use serde_json::json;
use sql_crud::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn sqlite_file_paginate_and_types() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("crud.db");
    let rt = Runtime::new()?;

    rt.block_on(async {
        let cfg = ConnectionConfig::for_backend("sqlite")?.database(path.to_string_lossy());
        let mut db = Executor::connect(&cfg).await?;
        db.execute_batch(
            "CREATE TABLE events (
                id INTEGER PRIMARY KEY,
                label TEXT,
                score REAL,
                active BOOLEAN,
                happened_at TEXT,
                payload TEXT,
                raw BLOB
            );",
        )
        .await?;

        let when = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        for id in 1..=25_i64 {
            let record = Record::default()
                .with("id", id)
                .with("label", format!("event-{id:02}"))
                .with("score", 0.5 * id as f64)
                .with("active", id % 2 == 0)
                .with("happened_at", when)
                .with("payload", json!({"n": id}))
                .with("raw", vec![0_u8, 1, 2]);
            db.insert("events", &record).await?;
        }

        let by_id = Condition::raw("1 = 1 ORDER BY id");
        let page1 = db.paginate("events", &Columns::All, &by_id, 1, 10).await?;
        let page3 = db.paginate("events", &Columns::All, &by_id, 3, 10).await?;
        assert_eq!(page1.len(), 10);
        assert_eq!(page1[0].get("id").and_then(RowValues::as_int), Some(&1));
        assert_eq!(page3.len(), 5);
        assert_eq!(page3[0].get("id").and_then(RowValues::as_int), Some(&21));

        let past_end = db.paginate("events", &Columns::All, &by_id, 4, 10).await?;
        assert!(past_end.is_empty());

        let err = db
            .paginate("events", &Columns::All, &Condition::Always, 0, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, CrudDbError::ParameterError(_)));

        let row = db.get_by_id("events", 4).await?.expect("row 4 exists");
        assert_eq!(row.get("label").and_then(RowValues::as_text), Some("event-04"));
        assert_eq!(row.get("score").and_then(RowValues::as_float), Some(2.0));
        assert_eq!(row.get("active").and_then(RowValues::as_bool), Some(&true));
        assert_eq!(
            row.get("happened_at").and_then(RowValues::as_timestamp),
            Some(when)
        );
        assert_eq!(
            row.get("payload").and_then(RowValues::as_text),
            Some(r#"{"n":4}"#)
        );
        assert_eq!(row.get("raw").and_then(RowValues::as_blob), Some(&[0_u8, 1, 2][..]));

        let odd = db
            .find_by_many(
                "events",
                &Condition::eq("active", false).and(Condition::in_list("id", [1_i64, 3, 4])),
                &Columns::list(["id"]),
            )
            .await?;
        assert_eq!(odd.len(), 2);

        let none = db
            .find_by_many("events", &Condition::in_list("id", Vec::<i64>::new()), &Columns::All)
            .await?;
        assert!(none.is_empty());

        db.close().await?;
        Ok::<(), CrudDbError>(())
    })?;

    // the data survives a reconnect
    rt.block_on(async {
        let cfg = ConnectionConfig::for_backend("sqlite")?.database(path.to_string_lossy());
        let mut db = Executor::connect(&cfg).await?;
        assert_eq!(db.select_all("events").await?.len(), 25);
        db.close().await?;
        Ok::<(), CrudDbError>(())
    })?;
    Ok(())
}
