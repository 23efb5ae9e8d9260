use super::executor::{SqliteConnection, run_blocking};
use crate::config::ConnectionConfig;
use crate::error::CrudDbError;

impl SqliteConnection {
    /// Open the database at `config.database` (a file path, `:memory:`, or a `file:` URI).
    ///
    /// File databases are switched to WAL journaling.
    ///
    /// # Errors
    /// Returns `CrudDbError::ConfigError` for an empty path or
    /// `CrudDbError::ConnectionError` if the database cannot be opened.
    pub async fn open(config: &ConnectionConfig) -> Result<Self, CrudDbError> {
        config.validate()?;
        let path = config.database.clone();
        let in_memory = is_memory_path(&path);

        let opened_path = path.clone();
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(&opened_path))
            .await
            .map_err(|e| {
                CrudDbError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
            })?
            .map_err(|e| {
                CrudDbError::ConnectionError(format!("Failed to open SQLite database {path}: {e}"))
            })?;

        let connection = SqliteConnection::new(conn, path);
        if !in_memory {
            run_blocking(connection.conn_handle(), |conn| {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(CrudDbError::SqliteError)
            })
            .await?;
        }
        Ok(connection)
    }
}

fn is_memory_path(path: &str) -> bool {
    path == ":memory:" || path.starts_with("file::memory:") || path.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_memory_paths() {
        assert!(is_memory_path(":memory:"));
        assert!(is_memory_path("file::memory:?cache=shared"));
        assert!(is_memory_path("file:db1?mode=memory&cache=shared"));
        assert!(!is_memory_path("/tmp/app.db"));
    }

    #[test]
    fn file_databases_use_wal() -> Result<(), Box<dyn std::error::Error>> {
        use crate::executor::AsyncDatabaseExecutor;
        use crate::types::DatabaseType;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("wal.db").to_string_lossy().into_owned();
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let cfg = ConnectionConfig::new(DatabaseType::Sqlite).database(path.clone());
            let mut conn = SqliteConnection::open(&cfg).await?;
            assert_eq!(conn.path(), path);
            let rs = conn.execute_select("PRAGMA journal_mode", &[]).await?;
            assert_eq!(
                rs.results[0].get_by_index(0).and_then(|v| v.as_text()),
                Some("wal")
            );
            Box::new(conn).close().await
        })?;
        Ok(())
    }
}
