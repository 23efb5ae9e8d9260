use std::fmt;

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::error::CrudDbError;
use crate::query_builder::{Columns, Condition, DEFAULT_PAGE_SIZE, QueryBuilder, Statement};
use crate::results::{Record, ResultSet};
use crate::types::{DatabaseType, RowValues};

mod dispatch;

pub(crate) use dispatch::open_connection;

/// One open database connection, as seen by [`Executor`].
///
/// Each backend module provides exactly one implementation.
#[async_trait]
pub trait AsyncDatabaseExecutor: Send {
    fn db_type(&self) -> DatabaseType;

    /// Executes one or more SQL statements with no parameters.
    async fn execute_batch(&mut self, query: &str) -> Result<(), CrudDbError>;

    /// Executes a single SELECT statement and returns the result set.
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, CrudDbError>;

    /// Executes a single DML statement (INSERT, UPDATE, DELETE, etc.) and returns the number of
    /// rows affected.
    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, CrudDbError>;

    /// Release the connection.
    async fn close(self: Box<Self>) -> Result<(), CrudDbError>;
}

/// CRUD operations against a single connection.
///
/// Every operation awaits one round trip and statements run in autocommit mode.
/// ```rust,no_run
/// use sql_crud::prelude::*;
///
/// # async fn demo() -> Result<(), CrudDbError> {
/// let cfg = ConnectionConfig::for_backend("sqlite")?.database(":memory:");
/// let mut db = Executor::connect(&cfg).await?;
/// db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
/// db.insert("users", &Record::from_pairs([("id", RowValues::Int(1)), ("name", "ana".into())]))
///     .await?;
/// let user = db.get_by_id("users", 1).await?;
/// assert_eq!(user.and_then(|u| u.get("name").cloned()), Some(RowValues::Text("ana".into())));
/// db.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Executor {
    conn: Box<dyn AsyncDatabaseExecutor>,
    builder: QueryBuilder,
}

impl Executor {
    /// Open a connection for `config.db_type`.
    ///
    /// # Errors
    /// Returns `CrudDbError::UnsupportedBackend` if the backend was not compiled in,
    /// `CrudDbError::ConfigError` for missing settings, or `CrudDbError::ConnectionError`
    /// if the connection cannot be established.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CrudDbError> {
        tracing::info!(
            backend = %config.db_type,
            host = %config.host,
            database = %config.database,
            "opening database connection"
        );
        let conn = open_connection(config).await?;
        Ok(Self::from_connection(conn, QueryBuilder::from_config(config)))
    }

    /// Wrap an already-open connection.
    ///
    /// A builder for a different dialect than `conn` is replaced by a plain one for `conn`.
    #[must_use]
    pub fn from_connection(conn: Box<dyn AsyncDatabaseExecutor>, builder: QueryBuilder) -> Self {
        let builder = if builder.db_type() == conn.db_type() {
            builder
        } else {
            QueryBuilder::new(conn.db_type())
        };
        Self { conn, builder }
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        self.conn.db_type()
    }

    #[must_use]
    pub fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Insert one row and return the number of rows affected.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for an empty record,
    /// `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn insert(&mut self, table: &str, record: &Record) -> Result<usize, CrudDbError> {
        let stmt = self.builder.insert(table, record)?;
        self.execute(&stmt).await
    }

    /// Update the rows matching `condition`.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for an empty record,
    /// `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn update(
        &mut self,
        table: &str,
        record: &Record,
        condition: &Condition,
    ) -> Result<usize, CrudDbError> {
        let stmt = self.builder.update(table, record, condition)?;
        self.execute(&stmt).await
    }

    /// Delete the rows matching `condition`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn delete(
        &mut self,
        table: &str,
        condition: &Condition,
    ) -> Result<usize, CrudDbError> {
        let stmt = self.builder.delete(table, condition)?;
        self.execute(&stmt).await
    }

    /// Select rows, optionally capped at `limit`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn select(
        &mut self,
        table: &str,
        columns: &Columns,
        condition: &Condition,
        limit: Option<u64>,
    ) -> Result<Vec<Record>, CrudDbError> {
        let stmt = self.builder.select(table, columns, condition, limit)?;
        Ok(self.fetch(&stmt).await?.into_records())
    }

    /// Every row of `table`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn select_all(&mut self, table: &str) -> Result<Vec<Record>, CrudDbError> {
        self.select(table, &Columns::All, &Condition::Always, None)
            .await
    }

    /// The row whose `id` column equals `id`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn get_by_id(
        &mut self,
        table: &str,
        id: impl Into<RowValues>,
    ) -> Result<Option<Record>, CrudDbError> {
        let stmt = self.builder.get_by_id(table, id)?;
        Ok(self.fetch(&stmt).await?.into_first())
    }

    /// The first row matching `condition`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn find_by_one(
        &mut self,
        table: &str,
        condition: &Condition,
        columns: &Columns,
    ) -> Result<Option<Record>, CrudDbError> {
        let stmt = self.builder.find_by_one(table, condition, columns)?;
        Ok(self.fetch(&stmt).await?.into_first())
    }

    /// Every row matching `condition`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn find_by_many(
        &mut self,
        table: &str,
        condition: &Condition,
        columns: &Columns,
    ) -> Result<Vec<Record>, CrudDbError> {
        let stmt = self.builder.find_by_many(table, condition, columns)?;
        Ok(self.fetch(&stmt).await?.into_records())
    }

    /// One page of matching rows; pages start at 1.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for page 0,
    /// `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn paginate(
        &mut self,
        table: &str,
        columns: &Columns,
        condition: &Condition,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Record>, CrudDbError> {
        let stmt = self
            .builder
            .paginate(table, columns, condition, page, limit)?;
        Ok(self.fetch(&stmt).await?.into_records())
    }

    /// Page `page` of every row in `table`, [`DEFAULT_PAGE_SIZE`] rows per page.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for page 0,
    /// `CrudDbError::InvalidIdentifier` for a bad name, or the driver error.
    pub async fn paginate_default(
        &mut self,
        table: &str,
        page: u64,
    ) -> Result<Vec<Record>, CrudDbError> {
        self.paginate(table, &Columns::All, &Condition::Always, page, DEFAULT_PAGE_SIZE)
            .await
    }

    /// Run a prepared SELECT statement.
    ///
    /// # Errors
    /// Returns the driver error.
    pub async fn fetch(&mut self, stmt: &Statement) -> Result<ResultSet, CrudDbError> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "select");
        self.conn.execute_select(&stmt.sql, &stmt.params).await
    }

    /// Run a prepared DML statement and return the rows affected.
    ///
    /// # Errors
    /// Returns the driver error.
    pub async fn execute(&mut self, stmt: &Statement) -> Result<usize, CrudDbError> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "dml");
        self.conn.execute_dml(&stmt.sql, &stmt.params).await
    }

    /// Run parameterless SQL, such as schema setup.
    ///
    /// # Errors
    /// Returns the driver error.
    pub async fn execute_batch(&mut self, sql: &str) -> Result<(), CrudDbError> {
        tracing::debug!(sql = %sql, "batch");
        self.conn.execute_batch(sql).await
    }

    /// Release the connection.
    ///
    /// # Errors
    /// Returns the driver error raised while disconnecting.
    pub async fn close(self) -> Result<(), CrudDbError> {
        let db_type = self.conn.db_type();
        self.conn.close().await?;
        tracing::info!(backend = %db_type, "database connection closed");
        Ok(())
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("db_type", &self.conn.db_type())
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}
