// PostgreSQL backend over a single tokio-postgres client
//
// - config: connection setup from `ConnectionConfig`
// - params: `RowValues` -> `ToSql` encoding
// - query: result extraction and building
// - executor: `AsyncDatabaseExecutor` implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use executor::PostgresConnection;
pub use params::Params;
pub use query::build_result_set;
