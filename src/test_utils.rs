//! Embedded `PostgreSQL` server for integration tests.

use std::sync::LazyLock;

use postgresql_embedded::PostgreSQL;
use tokio::runtime::Runtime;

use crate::config::ConnectionConfig;
use crate::executor::Executor;
use crate::types::DatabaseType;

/// Runtime that owns the embedded server process for its whole life.
static SHARED_RUNTIME: LazyLock<Runtime> =
    LazyLock::new(|| Runtime::new().expect("Failed to create tokio runtime for test utilities"));

/// A running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    postgresql: PostgreSQL,
    /// Connection settings for the database created at startup.
    pub config: ConnectionConfig,
}

/// Start an embedded `PostgreSQL` server and create `database` on it.
///
/// # Errors
/// Returns an error if the bundled binaries cannot be set up or started, if the database
/// cannot be created, or if the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    database: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(database).await?;

        let settings = postgresql.settings();
        let config = ConnectionConfig::new(DatabaseType::Postgres)
            .host(settings.host.clone())
            .port(settings.port)
            .username(settings.username.clone())
            .password(settings.password.clone())
            .database(database);
        tracing::debug!(port = settings.port, database, "embedded postgres started");

        let mut db = Executor::connect(&config).await?;
        db.execute_batch("SELECT 1").await?;
        db.close().await?;

        Ok(EmbeddedPostgres { postgresql, config })
    })
}

/// Stop a server started by [`setup_postgres_embedded`].
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        if let Err(e) = postgresql.stop().await {
            tracing::warn!("embedded postgres did not stop cleanly: {e}");
        }
    });
}
