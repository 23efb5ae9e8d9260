use sql_crud::prelude::*;

#[test]
fn unsupported_backend_is_rejected_before_connecting() {
    let err = ConnectionConfig::for_backend("oracle").unwrap_err();
    assert!(matches!(err, CrudDbError::UnsupportedBackend(ref name) if name.contains("oracle")));

    let err = "".parse::<DatabaseType>().unwrap_err();
    assert!(matches!(err, CrudDbError::UnsupportedBackend(_)));
}

#[test]
fn backend_aliases_resolve() -> Result<(), CrudDbError> {
    for (literal, expected) in [
        ("mysql", DatabaseType::Mysql),
        ("MariaDB", DatabaseType::Mysql),
        ("postgres", DatabaseType::Postgres),
        ("postgresql", DatabaseType::Postgres),
        ("pgsql", DatabaseType::Postgres),
        ("sqlite", DatabaseType::Sqlite),
        (" SQLite3 ", DatabaseType::Sqlite),
    ] {
        assert_eq!(ConnectionConfig::for_backend(literal)?.db_type, expected);
    }
    Ok(())
}

#[test]
fn statements_follow_the_dialect() -> Result<(), CrudDbError> {
    let pg = QueryBuilder::new(DatabaseType::Postgres);
    let my = QueryBuilder::new(DatabaseType::Mysql);

    let stmt = pg.select("users", &Columns::All, &Condition::Always, None)?;
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE TRUE");
    let stmt = my.select("users", &Columns::All, &Condition::Always, Some(5))?;
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE 1 LIMIT 5");

    let stmt = pg.get_by_id("users", "abc")?;
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE id = ?");
    assert_eq!(stmt.params, vec![RowValues::Text("abc".into())]);
    assert_eq!(
        sql_crud::translate_placeholders(&stmt.sql),
        "SELECT * FROM users WHERE id = $1"
    );
    Ok(())
}

#[test]
fn page_offsets() -> Result<(), CrudDbError> {
    assert_eq!(page_offset(1, 10)?, 0);
    assert_eq!(page_offset(3, 10)?, 20);
    assert!(page_offset(0, 10).is_err());
    assert!(page_offset(u64::MAX, 2).is_err());
    Ok(())
}
