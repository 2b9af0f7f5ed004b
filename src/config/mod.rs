//! Configuration system
//!
//! Handles INI config file parsing and CLI argument merging.
//!
//! Two files are read: the connection config (Redshift endpoint, thresholds
//! and monitored tables) and the secrets config (passwords, SMTP and Slack).

pub mod builder;
pub mod file;

pub use builder::{ConfigBuilder, RunConfig};
pub use file::IniDocument;

use crate::alerts::{AlertConfig, LagThresholds};
use crate::domain::{MonitoredTable, SqlIdentifier};
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Prefix of monitored table sections
pub const TABLE_SECTION_PREFIX: &str = "table.";

/// Connection config file contents
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Redshift connection settings
    pub connection: ConnectionConfig,
    /// Alert thresholds
    pub thresholds: LagThresholds,
    /// Monitored tables, in section-name order
    pub tables: Vec<MonitoredTable>,
}

impl Config {
    /// Build from a parsed connection config document
    pub fn from_document(doc: &IniDocument) -> Result<Self, ConfigError> {
        let connection = ConnectionConfig::from_document(doc)?;

        let monitor = doc.section("monitor");
        let warning = match monitor {
            Some(s) => s.parse_or("warning_threshold_secs", DEFAULT_WARNING_SECS)?,
            None => DEFAULT_WARNING_SECS,
        };
        let critical_key = "critical_threshold_secs";
        let critical = match monitor {
            // `none` or `0` turns the critical level off
            Some(s) if s.get(critical_key).is_some_and(|v| v.eq_ignore_ascii_case("none")) => None,
            Some(s) if s.get(critical_key).is_some() => {
                s.parse_opt::<u64>(critical_key)?.filter(|&secs| secs > 0)
            }
            // the implicit default never undercuts the warning threshold
            _ => Some(DEFAULT_CRITICAL_SECS.max(warning)),
        };
        let thresholds =
            LagThresholds::new(warning, critical).map_err(|source| ConfigError::Domain {
                key: "monitor".to_string(),
                source,
            })?;

        let default_column = monitor
            .and_then(|s| s.get("timestamp_column"))
            .unwrap_or(DEFAULT_TIMESTAMP_COLUMN);

        let tables = doc
            .sections_with_prefix(TABLE_SECTION_PREFIX)
            .map(|(name, section)| -> Result<MonitoredTable, ConfigError> {
                let ident = |key: &str, value: &str| {
                    SqlIdentifier::new(value).map_err(|source| ConfigError::Domain {
                        key: section.qualified(key),
                        source,
                    })
                };

                let schema = ident("schema", section.require("schema")?)?;
                let table = ident("table", section.get("table").unwrap_or(name))?;
                let column = ident(
                    "timestamp_column",
                    section.get("timestamp_column").unwrap_or(default_column),
                )?;

                let mut monitored = MonitoredTable::new(name, schema, table, column);
                monitored.source_host = section.get("source_host").map(String::from);
                monitored.source_database = section.get("source_database").map(String::from);
                monitored.replication_task = section.get("replication_task").map(String::from);
                Ok(monitored)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        if tables.is_empty() {
            return Err(ConfigError::NoTables);
        }

        Ok(Self {
            connection,
            thresholds,
            tables,
        })
    }
}

const DEFAULT_WARNING_SECS: u64 = 900;
const DEFAULT_CRITICAL_SECS: u64 = 14_400;
const DEFAULT_TIMESTAMP_COLUMN: &str = "dateCreated";

/// Redshift connection settings
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    /// Key of the password in the secrets file's `[credentials]` section
    pub credential: String,
    pub sslmode: String,
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    fn from_document(doc: &IniDocument) -> Result<Self, ConfigError> {
        let section = doc.require_section("redshift")?;

        let sslmode = section.get("sslmode").unwrap_or("require").to_lowercase();
        if !SSL_MODES.contains(&sslmode.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: section.qualified("sslmode"),
                message: format!("'{}' (expected one of {})", sslmode, SSL_MODES.join(", ")),
            });
        }

        Ok(Self {
            host: section.require("host")?.to_string(),
            port: section.parse_or("port", 5439)?,
            dbname: section.require("dbname")?.to_string(),
            user: section.require("user")?.to_string(),
            credential: section
                .get("credential")
                .unwrap_or("redshift_password")
                .to_string(),
            sslmode,
            connect_timeout: Duration::from_secs(section.parse_or("connect_timeout_secs", 10)?),
        })
    }
}

const SSL_MODES: &[&str] = &[
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
}

/// Secrets config file contents
#[derive(Clone, Default)]
pub struct Secrets {
    credentials: BTreeMap<String, String>,
    /// Notification channels
    pub alerts: AlertConfig,
}

impl Secrets {
    /// Build from a parsed secrets document
    pub fn from_document(doc: &IniDocument) -> Result<Self, ConfigError> {
        let credentials = doc
            .section("credentials")
            .map(|section| {
                section
                    .keys()
                    .filter_map(|key| section.get(key).map(|v| (key.to_string(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            credentials,
            alerts: AlertConfig::from_document(doc)?,
        })
    }

    /// Resolve a credential reference
    pub fn credential(&self, name: &str) -> Result<&str, ConfigError> {
        self.credentials
            .get(&name.to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnresolvedCredential(name.to_string()))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("credentials", &self.credentials.keys().collect::<Vec<_>>())
            .field("alerts", &self.alerts)
            .finish()
    }
}
