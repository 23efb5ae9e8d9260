// MySQL/MariaDB backend over one mysql_async connection
//
// - config: building `OptsBuilder` and connecting
// - params: `RowValues` -> `mysql_async::Value` conversion
// - query: result extraction and building
// - executor: `AsyncDatabaseExecutor` implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use executor::MysqlConnection;
pub use params::Params;
pub use query::build_result_set;
