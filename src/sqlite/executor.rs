use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::params::Params;
use super::query::build_result_set;
use crate::error::CrudDbError;
use crate::executor::AsyncDatabaseExecutor;
use crate::results::ResultSet;
use crate::types::{DatabaseType, RowValues};

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// A single `SQLite` connection; statements run on tokio's blocking pool.
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    path: String,
}

impl SqliteConnection {
    pub(crate) fn new(conn: rusqlite::Connection, path: String) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        }
    }

    pub(crate) fn conn_handle(&self) -> SharedSqliteConnection {
        Arc::clone(&self.conn)
    }

    /// Path (or URI) the connection was opened with.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, CrudDbError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, CrudDbError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| CrudDbError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

#[async_trait]
impl AsyncDatabaseExecutor for SqliteConnection {
    fn db_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    async fn execute_batch(&mut self, query: &str) -> Result<(), CrudDbError> {
        let sql_owned = query.to_owned();
        run_blocking(self.conn_handle(), move |conn| {
            conn.execute_batch(&sql_owned)
                .map_err(CrudDbError::SqliteError)
        })
        .await
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, CrudDbError> {
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params)?;
        run_blocking(self.conn_handle(), move |conn| {
            let mut stmt = conn.prepare_cached(&sql_owned)?;
            build_result_set(&mut stmt, params_owned.as_values())
        })
        .await
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, CrudDbError> {
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params)?;
        run_blocking(self.conn_handle(), move |conn| {
            let mut stmt = conn.prepare_cached(&sql_owned)?;
            let refs = params_owned.as_refs();
            Ok(stmt.execute(&refs[..])?)
        })
        .await
    }

    async fn close(self: Box<Self>) -> Result<(), CrudDbError> {
        let SqliteConnection { conn, path } = *self;
        let conn = Arc::try_unwrap(conn).map_err(|_| {
            CrudDbError::ConnectionError(format!("sqlite connection {path} is still in use"))
        })?;
        let raw = conn.into_inner();
        run_close(raw).await
    }
}

async fn run_close(raw: rusqlite::Connection) -> Result<(), CrudDbError> {
    tokio::task::spawn_blocking(move || raw.close().map_err(|(_, e)| CrudDbError::SqliteError(e)))
        .await
        .map_err(|e| CrudDbError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}
