//! Single-connection CRUD executor for `PostgreSQL`, `SQLite` and `MySQL`/`MariaDB`.
//!
//! Statements are built from validated identifiers and a [`Condition`] tree, with every value
//! bound as a parameter. Each backend lives behind a cargo feature of the same name.

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;

pub use config::ConnectionConfig;
pub use error::CrudDbError;
pub use executor::{AsyncDatabaseExecutor, Executor};
pub use query_builder::{Columns, CompareOp, Condition, QueryBuilder, Statement};
pub use results::{Record, ResultSet};
pub use translation::translate_placeholders;
pub use types::{DatabaseType, RowValues};
