use std::fmt;

use crate::error::CrudDbError;
use crate::types::DatabaseType;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_DATABASE: &str = "your_database_name";

const ENV_PREFIX: &str = "SQL_CRUD_";

/// Connection settings for a single backend.
///
/// Built with [`ConnectionConfig::new`] (or [`ConnectionConfig::for_backend`] when the
/// backend arrives as a string) and refined with the builder setters:
/// ```rust
/// use sql_crud::prelude::*;
///
/// let cfg = ConnectionConfig::for_backend("sqlite")?
///     .database(":memory:")
///     .allowed_tables(["users", "posts"]);
/// assert_eq!(cfg.db_type, DatabaseType::Sqlite);
/// # Ok::<(), CrudDbError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub db_type: DatabaseType,
    pub host: String,
    /// Falls back to the backend's default port when `None`.
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    /// Database name, or the file path for `SQLite`.
    pub database: String,
    /// When set, only these tables may be named in generated statements.
    pub allowed_tables: Option<Vec<String>>,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(db_type: DatabaseType) -> Self {
        Self {
            db_type,
            host: DEFAULT_HOST.to_string(),
            port: None,
            username: DEFAULT_USERNAME.to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            allowed_tables: None,
        }
    }

    /// Parse the backend literal and return a default config for it.
    ///
    /// # Errors
    /// Returns `CrudDbError::UnsupportedBackend` for an unrecognized literal.
    pub fn for_backend(backend: &str) -> Result<Self, CrudDbError> {
        Ok(Self::new(backend.parse()?))
    }

    /// Load settings from `SQL_CRUD_*` environment variables.
    ///
    /// `SQL_CRUD_BACKEND` is required; `SQL_CRUD_HOST`, `SQL_CRUD_PORT`, `SQL_CRUD_USER`,
    /// `SQL_CRUD_PASSWORD`, `SQL_CRUD_DATABASE` and `SQL_CRUD_ALLOWED_TABLES` (comma separated)
    /// fall back to the defaults when unset.
    ///
    /// # Errors
    /// Returns `CrudDbError::ConfigError` if the backend is missing or the port is not a number,
    /// and `CrudDbError::UnsupportedBackend` for an unrecognized backend.
    pub fn from_env() -> Result<Self, CrudDbError> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, CrudDbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("BACKEND").ok_or_else(|| {
            CrudDbError::ConfigError(format!("{ENV_PREFIX}BACKEND is required"))
        })?;
        let mut cfg = Self::for_backend(&backend)?;

        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("PORT") {
            let port = port.trim().parse::<u16>().map_err(|e| {
                CrudDbError::ConfigError(format!("invalid {ENV_PREFIX}PORT '{port}': {e}"))
            })?;
            cfg.port = Some(port);
        }
        if let Some(user) = lookup("USER") {
            cfg.username = user;
        }
        if let Some(password) = lookup("PASSWORD") {
            cfg.password = password;
        }
        if let Some(database) = lookup("DATABASE") {
            cfg.database = database;
        }
        if let Some(tables) = lookup("ALLOWED_TABLES") {
            cfg.allowed_tables = Some(
                tables
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            );
        }
        Ok(cfg)
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    #[must_use]
    pub fn allowed_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    /// Configured port, or the backend default.
    #[must_use]
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| self.db_type.default_port())
    }

    /// Check the fields the selected backend needs before a connection is attempted.
    ///
    /// # Errors
    /// Returns `CrudDbError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), CrudDbError> {
        if self.database.trim().is_empty() {
            return Err(CrudDbError::ConfigError(
                "database is required".to_string(),
            ));
        }
        if self.db_type != DatabaseType::Sqlite {
            if self.host.trim().is_empty() {
                return Err(CrudDbError::ConfigError("host is required".to_string()));
            }
            if self.username.trim().is_empty() {
                return Err(CrudDbError::ConfigError(
                    "username is required".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// Manual Debug implementation so the password never reaches logs
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("db_type", &self.db_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("allowed_tables", &self.allowed_tables)
            .finish()
    }
}
