use super::AsyncDatabaseExecutor;
use crate::config::ConnectionConfig;
use crate::error::CrudDbError;
use crate::types::DatabaseType;

#[cfg(feature = "mysql")]
use crate::mysql::MysqlConnection;
#[cfg(feature = "postgres")]
use crate::postgres::PostgresConnection;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConnection;

/// Open the backend connection selected by `config.db_type`.
///
/// # Errors
/// Returns `CrudDbError::UnsupportedBackend` when the backend's feature is disabled, or the
/// backend's connection error.
pub(crate) async fn open_connection(
    config: &ConnectionConfig,
) -> Result<Box<dyn AsyncDatabaseExecutor>, CrudDbError> {
    match config.db_type {
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => Ok(Box::new(PostgresConnection::connect(config).await?)),
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => Ok(Box::new(SqliteConnection::open(config).await?)),
        #[cfg(feature = "mysql")]
        DatabaseType::Mysql => Ok(Box::new(MysqlConnection::connect(config).await?)),
        #[allow(unreachable_patterns)]
        other => Err(CrudDbError::UnsupportedBackend(format!(
            "{other} support is not compiled in (enable the `{other}` feature)"
        ))),
    }
}
