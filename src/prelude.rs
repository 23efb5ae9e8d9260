//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::ConnectionConfig;
pub use crate::error::CrudDbError;
pub use crate::executor::{AsyncDatabaseExecutor, Executor};
pub use crate::query_builder::{
    Columns, CompareOp, Condition, DEFAULT_PAGE_SIZE, QueryBuilder, Statement, page_offset,
};
pub use crate::results::{Record, ResultSet};
pub use crate::types::{DatabaseType, RowValues};
