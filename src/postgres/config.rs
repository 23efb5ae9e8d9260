use tokio_postgres::NoTls;

use super::executor::PostgresConnection;
use crate::config::ConnectionConfig;
use crate::error::CrudDbError;

impl PostgresConnection {
    /// Open one connection and drive it on a background task.
    ///
    /// # Errors
    /// Returns `CrudDbError::ConfigError` if required config fields are missing or
    /// `CrudDbError::ConnectionError` if the server cannot be reached or rejects the login.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CrudDbError> {
        config.validate()?;

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.host)
            .user(&config.username)
            .password(&config.password)
            .dbname(&config.database);
        if let Some(port) = config.effective_port() {
            pg_config.port(port);
        }

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            CrudDbError::ConnectionError(format!("Failed to connect to Postgres: {e}"))
        })?;

        let connection_task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection task ended with an error");
            }
        });

        Ok(Self::new(client, connection_task))
    }
}
