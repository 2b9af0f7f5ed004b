//! Alert system domain types
//!
//! Defines the lag threshold rule, alert severities and the alert itself.

use crate::domain::{LagReading, LagSeconds, MonitoredTable};
use crate::error::DomainError;
use serde::Serialize;
use std::fmt;

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Lag at or above the warning threshold
    Warning,
    /// Lag at or above the critical threshold
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Lag thresholds deciding whether a reading raises an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LagThresholds {
    warning: LagSeconds,
    critical: Option<LagSeconds>,
}

impl LagThresholds {
    /// Create validated thresholds
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ZeroThreshold` for a zero warning threshold and
    /// `DomainError::ThresholdOrder` when `critical < warning`.
    pub fn new(warning_secs: u64, critical_secs: Option<u64>) -> Result<Self, DomainError> {
        if warning_secs == 0 {
            return Err(DomainError::ZeroThreshold);
        }
        if let Some(critical) = critical_secs {
            if critical < warning_secs {
                return Err(DomainError::ThresholdOrder {
                    warning: warning_secs,
                    critical,
                });
            }
        }

        Ok(Self {
            warning: LagSeconds::from_secs(warning_secs),
            critical: critical_secs.map(LagSeconds::from_secs),
        })
    }

    /// Warning threshold
    pub fn warning(&self) -> LagSeconds {
        self.warning
    }

    /// Critical threshold, if configured
    pub fn critical(&self) -> Option<LagSeconds> {
        self.critical
    }

    /// Classify a lag. `None` means within limits.
    pub fn evaluate(&self, lag: LagSeconds) -> Option<AlertSeverity> {
        match self.critical {
            Some(critical) if lag >= critical => Some(AlertSeverity::Critical),
            _ if lag >= self.warning => Some(AlertSeverity::Warning),
            _ => None,
        }
    }

    /// The threshold that a given severity was raised against
    pub fn threshold_for(&self, severity: AlertSeverity) -> LagSeconds {
        match severity {
            AlertSeverity::Critical => self.critical.unwrap_or(self.warning),
            AlertSeverity::Warning => self.warning,
        }
    }
}

impl Default for LagThresholds {
    fn default() -> Self {
        Self {
            warning: LagSeconds::from_secs(900),
            critical: Some(LagSeconds::from_secs(14_400)),
        }
    }
}

impl fmt::Display for LagThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.critical {
            Some(critical) => write!(f, "warning >= {}, critical >= {}", self.warning, critical),
            None => write!(f, "warning >= {}", self.warning),
        }
    }
}

/// Alert raised for one breaching table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Config name of the table
    pub table_name: String,
    /// Qualified table name
    pub table: String,
    /// Reading that raised the alert
    pub reading: LagReading,
    /// Threshold that was breached
    pub threshold: LagSeconds,
    /// Alert severity
    pub severity: AlertSeverity,
    /// Short summary, used as email subject
    pub subject: String,
    /// Full plain-text message
    pub message: String,
}

impl Alert {
    /// Build an alert for a breaching reading
    pub fn new(
        table: &MonitoredTable,
        reading: LagReading,
        severity: AlertSeverity,
        threshold: LagSeconds,
    ) -> Self {
        let qualified = table.qualified_name();
        let subject = match severity {
            AlertSeverity::Warning => format!("Redshift Lag Alert: {}", qualified),
            AlertSeverity::Critical => format!("Critical Lag Alert: {}", qualified),
        };

        let message = format!(
            "Redshift has a lag of {} seconds ({}) for {} (threshold {} seconds).\n\n\
             DETAILS:\n\
             Source Host: {}\n\
             Source Database: {}\n\
             Source Table: {}\n\
             Replication Task: {}\n\
             Measured At: {}",
            reading.lag.as_secs(),
            reading.lag.humanize(),
            qualified,
            threshold.as_secs(),
            table.source_host.as_deref().unwrap_or("unknown"),
            table.source_database.as_deref().unwrap_or(table.schema.as_str()),
            table.table,
            table.replication_task.as_deref().unwrap_or("None"),
            reading.measured_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        Self {
            table_name: table.name.clone(),
            table: qualified,
            reading,
            threshold,
            severity,
            subject,
            message,
        }
    }
}
