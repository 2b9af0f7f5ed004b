//! Monitored table domain types
//!
//! Table, schema and column names end up inside SQL text, so they are
//! validated as plain identifiers on construction.

use crate::error::DomainError;
use serde::Serialize;
use std::fmt;

/// A SQL identifier restricted to `[A-Za-z_][A-Za-z0-9_$]*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Maximum identifier length accepted by Redshift
    pub const MAX_LEN: usize = 127;

    /// Create a new validated identifier
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` for empty, overlong or
    /// non-identifier strings.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let mut chars = value.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

        if valid_start && valid_rest && value.len() <= Self::MAX_LEN {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidIdentifier(value))
        }
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table configured for lag tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoredTable {
    /// Config section name (`[table.<name>]`)
    pub name: String,
    /// Schema holding the replicated table
    pub schema: SqlIdentifier,
    /// Replicated table
    pub table: SqlIdentifier,
    /// Column holding the source row creation timestamp
    pub timestamp_column: SqlIdentifier,
    /// Host of the replication source
    pub source_host: Option<String>,
    /// Database on the replication source
    pub source_database: Option<String>,
    /// Replication task feeding the table (e.g. a DMS task id)
    pub replication_task: Option<String>,
}

impl MonitoredTable {
    /// Create a table with no source metadata
    pub fn new(
        name: impl Into<String>,
        schema: SqlIdentifier,
        table: SqlIdentifier,
        timestamp_column: SqlIdentifier,
    ) -> Self {
        Self {
            name: name.into(),
            schema,
            table,
            timestamp_column,
            source_host: None,
            source_database: None,
            replication_task: None,
        }
    }

    /// Qualified name as used in queries and messages
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    /// Query measuring seconds since the newest replicated row
    pub fn lag_query(&self) -> String {
        format!(
            "SELECT DATEDIFF(second, MAX({}), GETDATE()) AS lag_seconds FROM {}.{}",
            self.timestamp_column, self.schema, self.table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> SqlIdentifier {
        SqlIdentifier::new(s).unwrap()
    }

    #[test]
    fn test_identifier_accepts_plain_names() {
        assert!(SqlIdentifier::new("orders").is_ok());
        assert!(SqlIdentifier::new("_stage$1").is_ok());
        assert!(SqlIdentifier::new("dateCreated").is_ok());
    }

    #[test]
    fn test_identifier_rejects_injection() {
        for bad in ["", "1orders", "orders; DROP TABLE x", "a.b", "o'rders", "a b"] {
            assert_eq!(
                SqlIdentifier::new(bad),
                Err(DomainError::InvalidIdentifier(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_identifier_length_limit() {
        let long = "a".repeat(SqlIdentifier::MAX_LEN + 1);
        assert!(SqlIdentifier::new(long).is_err());
    }

    #[test]
    fn test_lag_query() {
        let table = MonitoredTable::new("orders", ident("sales"), ident("orders"), ident("dateCreated"));
        assert_eq!(table.qualified_name(), "sales.orders");
        assert_eq!(
            table.lag_query(),
            "SELECT DATEDIFF(second, MAX(dateCreated), GETDATE()) AS lag_seconds FROM sales.orders"
        );
    }
}
