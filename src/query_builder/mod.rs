//! SQL text construction.
//!
//! Every statement is built with `?` placeholders and an ordered parameter list; the
//! PostgreSQL backend rewrites the placeholders to `$N` just before execution.

use std::collections::HashSet;

use crate::config::ConnectionConfig;
use crate::error::CrudDbError;
use crate::types::{DatabaseType, RowValues};

mod condition;
mod dml;
mod ident;
mod select;

pub use condition::{CompareOp, Condition};
pub use ident::{Columns, validate_identifier};
pub use select::{DEFAULT_PAGE_SIZE, page_offset};

/// A query and its parameters bundled together
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The SQL text
    pub sql: String,
    /// Values bound positionally to the `?` placeholders
    pub params: Vec<RowValues>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Builds CRUD statements for one backend dialect.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    db_type: DatabaseType,
    allowed_tables: Option<HashSet<String>>,
}

impl QueryBuilder {
    #[must_use]
    pub fn new(db_type: DatabaseType) -> Self {
        Self {
            db_type,
            allowed_tables: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &ConnectionConfig) -> Self {
        let builder = Self::new(config.db_type);
        match &config.allowed_tables {
            Some(tables) => builder.with_allowed_tables(tables.iter().cloned()),
            None => builder,
        }
    }

    /// Restrict generated statements to the named tables.
    #[must_use]
    pub fn with_allowed_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    fn table<'a>(&self, name: &'a str) -> Result<&'a str, CrudDbError> {
        let name = validate_identifier(name)?;
        if let Some(allowed) = &self.allowed_tables {
            if !allowed.contains(name) {
                return Err(CrudDbError::InvalidIdentifier(format!(
                    "table {name:?} is not in the allowed table list"
                )));
            }
        }
        Ok(name)
    }

    fn condition(
        &self,
        condition: &Condition,
        params: &mut Vec<RowValues>,
    ) -> Result<String, CrudDbError> {
        condition.render(self.db_type, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_guards_tables() {
        let builder = QueryBuilder::new(DatabaseType::Sqlite).with_allowed_tables(["users"]);
        assert!(builder.table("users").is_ok());
        assert!(matches!(
            builder.table("secrets"),
            Err(CrudDbError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn from_config_carries_allow_list() {
        let cfg = ConnectionConfig::new(DatabaseType::Mysql).allowed_tables(["posts"]);
        let builder = QueryBuilder::from_config(&cfg);
        assert_eq!(builder.db_type(), DatabaseType::Mysql);
        assert!(builder.table("posts").is_ok());
        assert!(builder.table("users").is_err());
    }
}
