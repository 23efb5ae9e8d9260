use std::sync::LazyLock;

use regex::Regex;

use crate::error::CrudDbError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier pattern is a valid regex")
});

/// Check that `name` is a plain (optionally schema-qualified) SQL identifier.
///
/// # Errors
/// Returns `CrudDbError::InvalidIdentifier` when the name contains anything other than
/// ASCII letters, digits, underscores and a single `.` separator.
pub fn validate_identifier(name: &str) -> Result<&str, CrudDbError> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(CrudDbError::InvalidIdentifier(format!("{name:?}")))
    }
}

/// The column list of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Columns {
    /// `*`
    #[default]
    All,
    /// Named columns, each validated as an identifier when rendered.
    List(Vec<String>),
    /// Caller-trusted text inserted verbatim (expressions, aliases, aggregates).
    Raw(String),
}

impl Columns {
    #[must_use]
    pub fn all() -> Self {
        Columns::All
    }

    pub fn list<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Columns::List(columns.into_iter().map(Into::into).collect())
    }

    /// Trusted column text; it is not validated or escaped.
    pub fn raw(text: impl Into<String>) -> Self {
        Columns::Raw(text.into())
    }

    /// `"*"` (or empty text) selects everything; otherwise a comma separated name list.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "*" {
            Columns::All
        } else {
            Columns::list(trimmed.split(',').map(str::trim))
        }
    }

    pub(crate) fn render(&self) -> Result<String, CrudDbError> {
        match self {
            Columns::All => Ok("*".to_string()),
            Columns::List(columns) if columns.is_empty() => Ok("*".to_string()),
            Columns::List(columns) => {
                for column in columns {
                    validate_identifier(column)?;
                }
                Ok(columns.join(", "))
            }
            Columns::Raw(text) => Ok(text.clone()),
        }
    }
}

impl From<&str> for Columns {
    fn from(text: &str) -> Self {
        Columns::parse(text)
    }
}
