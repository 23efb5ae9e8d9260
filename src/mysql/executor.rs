use std::fmt;

use async_trait::async_trait;
use mysql_async::Conn;
use mysql_async::prelude::Queryable;

use super::params::Params;
use super::query::build_result_set;
use crate::error::CrudDbError;
use crate::executor::AsyncDatabaseExecutor;
use crate::results::ResultSet;
use crate::types::{DatabaseType, RowValues};

/// A single `MySQL`/`MariaDB` connection.
pub struct MysqlConnection {
    conn: Conn,
    database: String,
}

impl MysqlConnection {
    pub(crate) fn new(conn: Conn, database: String) -> Self {
        Self { conn, database }
    }
}

impl fmt::Debug for MysqlConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlConnection")
            .field("database", &self.database)
            .field("connection_id", &self.conn.id())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AsyncDatabaseExecutor for MysqlConnection {
    fn db_type(&self) -> DatabaseType {
        DatabaseType::Mysql
    }

    async fn execute_batch(&mut self, query: &str) -> Result<(), CrudDbError> {
        self.conn.query_drop(query).await?;
        Ok(())
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, CrudDbError> {
        let converted = Params::convert(params)?;
        build_result_set(&mut self.conn, query, converted.into_mysql_params()).await
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, CrudDbError> {
        let converted = Params::convert(params)?;
        self.conn
            .exec_drop(query, converted.into_mysql_params())
            .await?;
        usize::try_from(self.conn.affected_rows())
            .map_err(|e| CrudDbError::ExecutionError(format!("row count out of range: {e}")))
    }

    async fn close(self: Box<Self>) -> Result<(), CrudDbError> {
        let MysqlConnection { conn, .. } = *self;
        conn.disconnect().await?;
        Ok(())
    }
}
