use super::{Columns, Condition, QueryBuilder, Statement};
use crate::error::CrudDbError;
use crate::types::RowValues;

/// Rows per page when the caller does not pick a size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Row offset of a 1-based page: `(page - 1) * limit`.
///
/// # Errors
/// Returns `CrudDbError::ParameterError` for page 0 or when the offset overflows.
pub fn page_offset(page: u64, limit: u64) -> Result<u64, CrudDbError> {
    if page == 0 {
        return Err(CrudDbError::ParameterError(
            "page numbers start at 1".to_string(),
        ));
    }
    (page - 1).checked_mul(limit).ok_or_else(|| {
        CrudDbError::ParameterError(format!("offset for page {page} x {limit} overflows"))
    })
}

impl QueryBuilder {
    /// `SELECT <columns> FROM <table> WHERE <condition> [LIMIT <limit>]`.
    ///
    /// A limit of zero is treated like no limit.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn select(
        &self,
        table: &str,
        columns: &Columns,
        condition: &Condition,
        limit: Option<u64>,
    ) -> Result<Statement, CrudDbError> {
        let mut stmt = self.select_where(table, columns, condition)?;
        if let Some(limit) = limit.filter(|&n| n > 0) {
            stmt.sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(stmt)
    }

    /// `SELECT * FROM <table> WHERE id = ?` with the id bound.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad table name.
    pub fn get_by_id(
        &self,
        table: &str,
        id: impl Into<RowValues>,
    ) -> Result<Statement, CrudDbError> {
        let table = self.table(table)?;
        Ok(Statement::new(
            format!("SELECT * FROM {table} WHERE id = ?"),
            vec![id.into()],
        ))
    }

    /// `SELECT <columns> FROM <table> WHERE <condition>`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn find_by_many(
        &self,
        table: &str,
        condition: &Condition,
        columns: &Columns,
    ) -> Result<Statement, CrudDbError> {
        self.select_where(table, columns, condition)
    }

    /// `SELECT <columns> FROM <table> WHERE <condition> LIMIT 1`.
    ///
    /// `LIMIT 1` is appended unconditionally, even when raw condition text carries its own
    /// limit clause.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn find_by_one(
        &self,
        table: &str,
        condition: &Condition,
        columns: &Columns,
    ) -> Result<Statement, CrudDbError> {
        let mut stmt = self.select_where(table, columns, condition)?;
        stmt.sql.push_str(" LIMIT 1");
        Ok(stmt)
    }

    /// `SELECT <columns> FROM <table> WHERE <condition> LIMIT <limit> OFFSET <offset>`.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for page 0, and
    /// `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn paginate(
        &self,
        table: &str,
        columns: &Columns,
        condition: &Condition,
        page: u64,
        limit: u64,
    ) -> Result<Statement, CrudDbError> {
        let offset = page_offset(page, limit)?;
        let mut stmt = self.select_where(table, columns, condition)?;
        stmt.sql
            .push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        Ok(stmt)
    }

    fn select_where(
        &self,
        table: &str,
        columns: &Columns,
        condition: &Condition,
    ) -> Result<Statement, CrudDbError> {
        let table = self.table(table)?;
        let columns = columns.render()?;
        let mut params = Vec::new();
        let where_clause = self.condition(condition, &mut params)?;
        Ok(Statement::new(
            format!("SELECT {columns} FROM {table} WHERE {where_clause}"),
            params,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatabaseType;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(DatabaseType::Sqlite)
    }

    #[test]
    fn select_defaults_match_everything() {
        let stmt = builder()
            .select("users", &Columns::All, &Condition::Always, None)
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE 1");
        assert!(stmt.params.is_empty());

        let stmt = QueryBuilder::new(DatabaseType::Postgres)
            .select("users", &Columns::All, &Condition::Always, Some(5))
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE TRUE LIMIT 5");
    }

    #[test]
    fn zero_limit_means_no_limit() {
        let stmt = builder()
            .select("users", &Columns::All, &Condition::Always, Some(0))
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE 1");
    }

    #[test]
    fn select_with_columns_condition_and_limit() {
        let stmt = builder()
            .select(
                "users",
                &Columns::parse("id, name"),
                &Condition::raw("age > 21"),
                Some(10),
            )
            .unwrap();
        assert_eq!(stmt.sql, "SELECT id, name FROM users WHERE age > 21 LIMIT 10");
    }

    #[test]
    fn get_by_id_binds_instead_of_interpolating() {
        let stmt = builder().get_by_id("users", "42; DROP TABLE users").unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE id = ?");
        assert!(!stmt.sql.contains("42"));
        assert_eq!(
            stmt.params,
            vec![RowValues::Text("42; DROP TABLE users".into())]
        );
    }

    #[test]
    fn find_by_one_always_appends_limit_one() {
        let stmt = builder()
            .find_by_one("users", &Condition::raw("name = 'a' LIMIT 3"), &Columns::All)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users WHERE name = 'a' LIMIT 3 LIMIT 1"
        );
        assert_eq!(stmt.sql.matches(" LIMIT 1").count(), 1);
        assert!(stmt.sql.ends_with(" LIMIT 1"));
    }

    #[test]
    fn find_by_many_has_no_limit() {
        let stmt = builder()
            .find_by_many("users", &Condition::eq("city", "Oslo"), &Columns::parse("name"))
            .unwrap();
        assert_eq!(stmt.sql, "SELECT name FROM users WHERE city = ?");
        assert_eq!(stmt.params, vec![RowValues::Text("Oslo".into())]);
    }

    #[test]
    fn paginate_offsets() {
        assert_eq!(page_offset(1, 10).unwrap(), 0);
        assert_eq!(page_offset(3, 10).unwrap(), 20);
        assert!(matches!(page_offset(0, 10), Err(CrudDbError::ParameterError(_))));
        assert!(page_offset(u64::MAX, 2).is_err());

        let stmt = builder()
            .paginate("users", &Columns::All, &Condition::Always, 3, 10)
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE 1 LIMIT 10 OFFSET 20");
        let stmt = builder()
            .paginate("users", &Columns::All, &Condition::Always, 1, 10)
            .unwrap();
        assert!(stmt.sql.ends_with("LIMIT 10 OFFSET 0"));
    }
}
