use std::ops::Not;

use super::ident::validate_identifier;
use crate::error::CrudDbError;
use crate::types::{DatabaseType, RowValues};

/// Comparison operators for [`Condition::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl CompareOp {
    fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Like => "LIKE",
        }
    }
}

/// A WHERE-clause predicate.
///
/// Structured variants render with `?` placeholders and bind their values; column names
/// are validated as identifiers. [`Condition::Raw`] is the escape hatch for trusted SQL:
/// ```rust
/// use sql_crud::prelude::*;
///
/// let active_adults = Condition::eq("active", true).and(Condition::ge("age", 18));
/// let legacy = Condition::raw("deleted_at IS NULL AND role <> 'bot'");
/// # let _ = (active_adults, legacy);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// Matches every row.
    #[default]
    Always,
    /// Caller-trusted SQL text inserted verbatim; nothing is bound.
    Raw(String),
    Compare {
        column: String,
        op: CompareOp,
        value: RowValues,
    },
    IsNull(String),
    IsNotNull(String),
    In {
        column: String,
        values: Vec<RowValues>,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    #[must_use]
    pub fn always() -> Self {
        Condition::Always
    }

    /// Trusted SQL text. It is neither validated nor escaped.
    ///
    /// On `PostgreSQL`, once the statement binds any values, every bare `?` outside quotes
    /// and comments is renumbered as a placeholder. Write the jsonb key-exists test as
    /// `jsonb_exists(col, 'key')` rather than `col ? 'key'` there.
    pub fn raw(text: impl Into<String>) -> Self {
        Condition::Raw(text.into())
    }

    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<RowValues>) -> Self {
        Condition::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn le(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Le, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn ge(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Ge, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<RowValues>) -> Self {
        Self::compare(column, CompareOp::Like, pattern)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Condition::IsNull(column.into())
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Condition::IsNotNull(column.into())
    }

    pub fn in_list<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Condition::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut parts) => {
                parts.push(other);
                Condition::And(parts)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut parts) => {
                parts.push(other);
                Condition::Or(parts)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    /// Render into SQL text, appending bound values to `params` in placeholder order.
    ///
    /// # Errors
    /// Returns `CrudDbError::InvalidIdentifier` if a column name is not a plain identifier.
    pub fn render(
        &self,
        db_type: DatabaseType,
        params: &mut Vec<RowValues>,
    ) -> Result<String, CrudDbError> {
        match self {
            Condition::Always => Ok(db_type.always_true_literal().to_string()),
            Condition::Raw(text) => Ok(text.clone()),
            Condition::Compare { column, op, value } => {
                let column = validate_identifier(column)?;
                // `= NULL` never matches; use the IS forms instead
                match (op, value) {
                    (CompareOp::Eq, RowValues::Null) => Ok(format!("{column} IS NULL")),
                    (CompareOp::Ne, RowValues::Null) => Ok(format!("{column} IS NOT NULL")),
                    _ => {
                        params.push(value.clone());
                        Ok(format!("{column} {} ?", op.as_sql()))
                    }
                }
            }
            Condition::IsNull(column) => Ok(format!("{} IS NULL", validate_identifier(column)?)),
            Condition::IsNotNull(column) => {
                Ok(format!("{} IS NOT NULL", validate_identifier(column)?))
            }
            Condition::In { column, values } => {
                let column = validate_identifier(column)?;
                if values.is_empty() {
                    return Ok(db_type.never_true_literal().to_string());
                }
                let placeholders = vec!["?"; values.len()].join(", ");
                params.extend(values.iter().cloned());
                Ok(format!("{column} IN ({placeholders})"))
            }
            Condition::And(parts) => {
                render_joined(parts, " AND ", db_type.always_true_literal(), db_type, params)
            }
            // an empty disjunction matches nothing
            Condition::Or(parts) => {
                render_joined(parts, " OR ", db_type.never_true_literal(), db_type, params)
            }
            Condition::Not(inner) => Ok(format!("NOT ({})", inner.render(db_type, params)?)),
        }
    }

    fn needs_parens(&self) -> bool {
        matches!(
            self,
            Condition::Raw(_) | Condition::And(_) | Condition::Or(_)
        )
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Self::Output {
        Condition::Not(Box::new(self))
    }
}

fn render_joined(
    parts: &[Condition],
    separator: &str,
    empty: &str,
    db_type: DatabaseType,
    params: &mut Vec<RowValues>,
) -> Result<String, CrudDbError> {
    match parts {
        [] => Ok(empty.to_string()),
        [only] => only.render(db_type, params),
        _ => {
            let mut rendered = Vec::with_capacity(parts.len());
            for part in parts {
                let sql = part.render(db_type, params)?;
                if part.needs_parens() {
                    rendered.push(format!("({sql})"));
                } else {
                    rendered.push(sql);
                }
            }
            Ok(rendered.join(separator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(cond: &Condition) -> (String, Vec<RowValues>) {
        let mut params = Vec::new();
        let sql = cond.render(DatabaseType::Sqlite, &mut params).unwrap();
        (sql, params)
    }

    #[test]
    fn always_depends_on_dialect() {
        let mut params = Vec::new();
        assert_eq!(Condition::always().render(DatabaseType::Mysql, &mut params).unwrap(), "1");
        assert_eq!(
            Condition::Always.render(DatabaseType::Postgres, &mut params).unwrap(),
            "TRUE"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn raw_is_verbatim_and_unbound() {
        let (sql, params) = render(&Condition::raw("name = 'x' LIMIT 5"));
        assert_eq!(sql, "name = 'x' LIMIT 5");
        assert!(params.is_empty());
    }

    #[test]
    fn nested_tree_binds_in_order() {
        let cond = Condition::eq("status", "open")
            .and(Condition::gt("age", 18).or(Condition::is_null("age")))
            .and(!Condition::in_list("role", ["bot", "system"]));
        let (sql, params) = render(&cond);
        assert_eq!(
            sql,
            "status = ? AND (age > ? OR age IS NULL) AND NOT (role IN (?, ?))"
        );
        assert_eq!(
            params,
            vec![
                RowValues::Text("open".into()),
                RowValues::Int(18),
                RowValues::Text("bot".into()),
                RowValues::Text("system".into()),
            ]
        );
    }

    #[test]
    fn compare_with_explicit_operator() {
        let (sql, params) = render(&Condition::compare("score", CompareOp::Le, 2.5));
        assert_eq!(sql, "score <= ?");
        assert_eq!(params, vec![RowValues::Float(2.5)]);
        let (sql, _) = render(&Condition::compare("name", CompareOp::Ne, "x"));
        assert_eq!(sql, "name <> ?");
    }

    #[test]
    fn null_comparisons_use_is() {
        let (sql, params) = render(&Condition::eq("deleted_at", RowValues::Null));
        assert_eq!(sql, "deleted_at IS NULL");
        assert!(params.is_empty());
        let (sql, _) = render(&Condition::ne("deleted_at", RowValues::Null));
        assert_eq!(sql, "deleted_at IS NOT NULL");
    }

    #[test]
    fn empty_in_matches_nothing() {
        let (sql, params) = render(&Condition::in_list("id", Vec::<i64>::new()));
        assert_eq!(sql, "1 = 0");
        assert!(params.is_empty());
    }

    #[test]
    fn empty_in_is_false_on_postgres() {
        let mut params = Vec::new();
        let sql = Condition::in_list("id", Vec::<i64>::new())
            .render(DatabaseType::Postgres, &mut params)
            .unwrap();
        assert_eq!(sql, "FALSE");
    }

    #[test]
    fn empty_or_matches_nothing() {
        let (sql, params) = render(&Condition::Or(vec![]));
        assert_eq!(sql, "1 = 0");
        assert!(params.is_empty());

        let mut params = Vec::new();
        let sql = Condition::Or(vec![])
            .render(DatabaseType::Postgres, &mut params)
            .unwrap();
        assert_eq!(sql, "FALSE");
    }

    #[test]
    fn empty_or_inside_and_still_matches_nothing() {
        let (sql, params) = render(&Condition::eq("id", 1).and(Condition::Or(vec![])));
        assert_eq!(sql, "id = ? AND (1 = 0)");
        assert_eq!(params, vec![RowValues::Int(1)]);
    }

    #[test]
    fn empty_and_matches_everything() {
        let (sql, _) = render(&Condition::And(vec![]));
        assert_eq!(sql, "1");
        let (sql, _) = render(&Condition::is_null("x").or(Condition::And(vec![])));
        assert_eq!(sql, "x IS NULL OR (1)");
    }

    #[test]
    fn rejects_bad_column() {
        let mut params = Vec::new();
        let err = Condition::eq("id = 1 OR 1", 1)
            .render(DatabaseType::Sqlite, &mut params)
            .unwrap_err();
        assert!(matches!(err, CrudDbError::InvalidIdentifier(_)));
    }
}
