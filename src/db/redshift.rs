//! Redshift lag source
//!
//! Redshift speaks the PostgreSQL wire protocol, so the connection goes
//! through diesel's libpq-backed `PgConnection`.

use super::traits::LagSource;
use crate::config::ConnectionConfig;
use crate::domain::{LagSeconds, MonitoredTable};
use crate::error::DatabaseError;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};

#[derive(QueryableByName)]
struct LagRow {
    #[diesel(sql_type = Nullable<BigInt>)]
    lag_seconds: Option<i64>,
}

/// Live connection to a Redshift cluster
pub struct RedshiftSource {
    conn: PgConnection,
    endpoint: String,
}

impl RedshiftSource {
    /// Open a connection
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` when libpq cannot connect
    /// or authenticate within the configured timeout.
    pub fn connect(config: &ConnectionConfig, password: &str) -> Result<Self, DatabaseError> {
        log::debug!(
            "Connecting to {}:{}/{} as {} (sslmode={})",
            config.host,
            config.port,
            config.dbname,
            config.user,
            config.sslmode
        );

        let conn = PgConnection::establish(&connection_string(config, password)).map_err(|e| {
            DatabaseError::ConnectionFailed {
                host: config.host.clone(),
                port: config.port,
                dbname: config.dbname.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            conn,
            endpoint: format!("{}:{}/{}", config.host, config.port, config.dbname),
        })
    }

    /// Round-trip a trivial query
    pub fn ping(&mut self) -> Result<(), DatabaseError> {
        diesel::sql_query("SELECT 1")
            .execute(&mut self.conn)
            .map(|_| ())
            .map_err(|e| DatabaseError::QueryFailed {
                table: "SELECT 1".to_string(),
                message: e.to_string(),
            })
    }
}

impl LagSource for RedshiftSource {
    fn query_lag(&mut self, table: &MonitoredTable) -> Result<LagSeconds, DatabaseError> {
        let name = table.qualified_name();
        let query = table.lag_query();
        log::debug!("{}", query);

        let row: LagRow = diesel::sql_query(query)
            .get_result(&mut self.conn)
            .map_err(|e| DatabaseError::QueryFailed {
                table: name.clone(),
                message: e.to_string(),
            })?;

        lag_from_row(&name, row.lag_seconds)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Interpret the raw `DATEDIFF` result for a table
///
/// NULL (empty table) is an error; a negative difference means the source
/// clock is ahead of the cluster and counts as no lag.
fn lag_from_row(table: &str, raw: Option<i64>) -> Result<LagSeconds, DatabaseError> {
    let raw = raw.ok_or_else(|| DatabaseError::NoData(table.to_string()))?;
    Ok(LagSeconds::new(raw).unwrap_or_else(|_| {
        log::warn!(
            "{} has rows {}s in the future (clock skew?); treating lag as 0",
            table,
            raw.unsigned_abs()
        );
        LagSeconds::from_secs(0)
    }))
}

/// Build a libpq keyword/value connection string
fn connection_string(config: &ConnectionConfig, password: &str) -> String {
    format!(
        "host={} port={} dbname={} user={} password={} sslmode={} connect_timeout={} application_name=lagwatch",
        quote(&config.host),
        config.port,
        quote(&config.dbname),
        quote(&config.user),
        quote(password),
        config.sslmode,
        config.connect_timeout.as_secs().max(1),
    )
}

/// Quote a libpq connection string value
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            host: "cluster.example.com".to_string(),
            port: 5439,
            dbname: "analytics".to_string(),
            user: "monitor".to_string(),
            credential: "redshift_password".to_string(),
            sslmode: "require".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote(r"a\b"), r"'a\\b'");
        assert_eq!(quote("with space"), "'with space'");
    }

    #[test]
    fn test_connection_string() {
        let conn = connection_string(&config(), "p@ss'word");
        assert!(conn.starts_with("host='cluster.example.com' port=5439 dbname='analytics'"));
        assert!(conn.contains(r"password='p@ss\'word'"));
        assert!(conn.contains("sslmode=require"));
        assert!(conn.contains("connect_timeout=10"));
    }

    #[test]
    fn test_null_lag_is_no_data() {
        assert!(matches!(
            lag_from_row("sales.orders", None),
            Err(DatabaseError::NoData(table)) if table == "sales.orders"
        ));
    }

    #[test]
    fn test_negative_lag_is_clamped() {
        assert_eq!(
            lag_from_row("sales.orders", Some(-30)).unwrap(),
            LagSeconds::from_secs(0)
        );
        assert_eq!(
            lag_from_row("sales.orders", Some(450)).unwrap(),
            LagSeconds::from_secs(450)
        );
    }

    #[test]
    fn test_connect_failure_is_reported() {
        let mut cfg = config();
        cfg.host = "127.0.0.1".to_string();
        cfg.port = 9;
        cfg.sslmode = "disable".to_string();
        cfg.connect_timeout = Duration::from_secs(2);

        let result = RedshiftSource::connect(&cfg, "irrelevant");
        assert!(matches!(
            result,
            Err(DatabaseError::ConnectionFailed { port: 9, .. })
        ));
    }
}
