use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::Client;

use super::params::Params;
use super::query::build_result_set;
use crate::error::CrudDbError;
use crate::executor::AsyncDatabaseExecutor;
use crate::results::ResultSet;
use crate::translation::translate_placeholders;
use crate::types::{DatabaseType, RowValues};

/// A single `PostgreSQL` connection.
pub struct PostgresConnection {
    client: Client,
    connection_task: JoinHandle<()>,
}

impl PostgresConnection {
    pub(crate) fn new(client: Client, connection_task: JoinHandle<()>) -> Self {
        Self {
            client,
            connection_task,
        }
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("closed", &self.client.is_closed())
            .finish_non_exhaustive()
    }
}

// Statements arrive with `?` markers; Postgres wants `$N`.
fn postgres_sql<'a>(query: &'a str, params: &[RowValues]) -> Cow<'a, str> {
    if params.is_empty() {
        Cow::Borrowed(query)
    } else {
        translate_placeholders(query)
    }
}

#[async_trait]
impl AsyncDatabaseExecutor for PostgresConnection {
    fn db_type(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    async fn execute_batch(&mut self, query: &str) -> Result<(), CrudDbError> {
        self.client.batch_execute(query).await?;
        Ok(())
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, CrudDbError> {
        let sql = postgres_sql(query, params);
        let converted = Params::convert(params)?;
        let stmt = self.client.prepare(sql.as_ref()).await?;
        build_result_set(&self.client, &stmt, converted.as_refs()).await
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, CrudDbError> {
        let sql = postgres_sql(query, params);
        let converted = Params::convert(params)?;
        let stmt = self.client.prepare(sql.as_ref()).await?;
        let rows = self.client.execute(&stmt, converted.as_refs()).await?;
        usize::try_from(rows)
            .map_err(|e| CrudDbError::ExecutionError(format!("row count out of range: {e}")))
    }

    async fn close(self: Box<Self>) -> Result<(), CrudDbError> {
        let PostgresConnection {
            client,
            connection_task,
        } = *self;
        // dropping the client ends the connection future
        drop(client);
        connection_task.await.map_err(|e| {
            CrudDbError::ConnectionError(format!("postgres connection task failed: {e}"))
        })
    }
}
