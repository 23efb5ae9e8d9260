// SQLite backend over one rusqlite connection driven on the blocking pool
//
// - config: opening the database file and applying pragmas
// - params: `RowValues` -> rusqlite value conversion
// - query: result extraction and building
// - executor: `AsyncDatabaseExecutor` implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use executor::SqliteConnection;
pub use params::Params;
pub use query::build_result_set;
