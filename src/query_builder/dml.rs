use super::{Condition, QueryBuilder, Statement, validate_identifier};
use crate::error::CrudDbError;
use crate::results::Record;

impl QueryBuilder {
    /// `INSERT INTO <table> (<cols>) VALUES (?, ...)`, one placeholder per record field.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for an empty record and
    /// `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn insert(&self, table: &str, record: &Record) -> Result<Statement, CrudDbError> {
        let table = self.table(table)?;
        if record.is_empty() {
            return Err(CrudDbError::ParameterError(format!(
                "insert into {table} needs at least one column"
            )));
        }
        for column in record.column_names.iter() {
            validate_identifier(column)?;
        }

        let columns = record.column_names.join(", ");
        let placeholders = vec!["?"; record.len()].join(", ");
        Ok(Statement::new(
            format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
            record.values.clone(),
        ))
    }

    /// `UPDATE <table> SET col1 = ?, col2 = ? WHERE <condition>`.
    ///
    /// Record values are bound first, then any values the condition binds.
    ///
    /// # Errors
    /// Returns `CrudDbError::ParameterError` for an empty record and
    /// `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn update(
        &self,
        table: &str,
        record: &Record,
        condition: &Condition,
    ) -> Result<Statement, CrudDbError> {
        let table = self.table(table)?;
        if record.is_empty() {
            return Err(CrudDbError::ParameterError(format!(
                "update of {table} needs at least one column"
            )));
        }

        let mut assignments = Vec::with_capacity(record.len());
        for column in record.column_names.iter() {
            assignments.push(format!("{} = ?", validate_identifier(column)?));
        }

        let mut params = record.values.clone();
        let where_clause = self.condition(condition, &mut params)?;
        Ok(Statement::new(
            format!(
                "UPDATE {table} SET {} WHERE {where_clause}",
                assignments.join(", ")
            ),
            params,
        ))
    }

    /// `DELETE FROM <table> WHERE <condition>`.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` for a bad table or column name.
    pub fn delete(&self, table: &str, condition: &Condition) -> Result<Statement, CrudDbError> {
        let table = self.table(table)?;
        let mut params = Vec::new();
        let where_clause = self.condition(condition, &mut params)?;
        Ok(Statement::new(
            format!("DELETE FROM {table} WHERE {where_clause}"),
            params,
        ))
    }
}
