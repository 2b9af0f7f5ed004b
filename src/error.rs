//! Unified error types for lagwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration loading/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the database layer
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A notification channel could not be set up
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// One or more channels rejected the test alert
    #[error("{0} channel(s) failed the notification test")]
    NotifyTestFailed(usize),

    /// IO error (log file, stdout)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the database layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Could not establish a connection
    #[error("Failed to connect to {host}:{port}/{dbname}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        dbname: String,
        message: String,
    },

    /// A lag query failed
    #[error("Lag query failed for {table}: {message}")]
    QueryFailed { table: String, message: String },

    /// The lag query returned no value (empty table or NULL timestamps)
    #[error("No rows to measure lag for {0}")]
    NoData(String),
}

/// Errors from notification channels
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Email could not be built (bad address, bad header)
    #[error("Invalid email message: {0}")]
    InvalidMessage(String),

    /// SMTP transport failure
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    /// The HTTP client for Slack could not be built (TLS backend)
    #[error("Slack client setup failed: {0}")]
    SlackClient(String),

    /// Slack request failed before a response arrived
    #[error("Slack request failed: {0}")]
    SlackRequest(String),

    /// Slack answered with a non-success status
    #[error("Slack webhook returned {status}: {body}")]
    SlackStatus { status: u16, body: String },
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Lag must be non-negative
    #[error("Invalid lag: {0}s (must be non-negative)")]
    NegativeLag(i64),

    /// Identifier is not safe to interpolate into SQL
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Critical threshold below warning threshold
    #[error("Critical threshold {critical}s is below warning threshold {warning}s")]
    ThresholdOrder { warning: u64, critical: u64 },

    /// Threshold of zero would alert on every reading
    #[error("Threshold must be greater than zero")]
    ZeroThreshold,
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    /// Required section absent
    #[error("Section [{section}] not found in {path}")]
    MissingSection { section: String, path: String },

    /// Missing required config field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Neither `[email]` nor `[slack]` is configured
    #[error("No notification channels configured (add an [email] or [slack] section to the secrets file)")]
    NoChannels,

    /// No tables to monitor
    #[error("No monitored tables configured (add at least one [table.<name>] section)")]
    NoTables,

    /// Credential reference not present in the secrets file
    #[error("Credential '{0}' not found in [credentials] of the secrets file")]
    UnresolvedCredential(String),

    /// Domain validation of a configured value failed
    #[error("{key}: {source}")]
    Domain {
        key: String,
        #[source]
        source: DomainError,
    },
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::NegativeLag(-5);
        assert_eq!(err.to_string(), "Invalid lag: -5s (must be non-negative)");
    }

    #[test]
    fn test_threshold_order_display() {
        let err = DomainError::ThresholdOrder {
            warning: 900,
            critical: 300,
        };
        assert!(err.to_string().contains("300s"));
        assert!(err.to_string().contains("900s"));
    }

    #[test]
    fn test_connection_error_display() {
        let err = DatabaseError::ConnectionFailed {
            host: "cluster.example.com".to_string(),
            port: 5439,
            dbname: "dev".to_string(),
            message: "timeout expired".to_string(),
        };
        assert!(err.to_string().contains("cluster.example.com:5439/dev"));
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = ConfigError::NoTables.into();
        assert!(matches!(err, AppError::Config(_)));

        let err: AppError = DatabaseError::NoData("sales.orders".to_string()).into();
        assert!(matches!(err, AppError::Database(_)));

        let err: AppError = NotifyError::SlackClient("no TLS backend".to_string()).into();
        assert!(matches!(err, AppError::Notify(_)));
    }
}
