//! Lag domain types
//!
//! Provides validated types for replication lag and per-table readings.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Replication lag in whole seconds (always non-negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LagSeconds(u64);

impl LagSeconds {
    /// Create a lag from an unsigned second count
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Create a lag from a signed database value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeLag` if `secs` is negative.
    pub fn new(secs: i64) -> Result<Self, DomainError> {
        u64::try_from(secs)
            .map(Self)
            .map_err(|_| DomainError::NegativeLag(secs))
    }

    /// Get the lag in seconds
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Human-readable breakdown, e.g. `2h 5m 0s`
    pub fn humanize(&self) -> String {
        let hours = self.0 / 3600;
        let mins = (self.0 % 3600) / 60;
        let secs = self.0 % 60;
        if hours > 0 {
            format!("{}h {}m {}s", hours, mins, secs)
        } else if mins > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}s", secs)
        }
    }
}

impl fmt::Display for LagSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// A single lag measurement for one monitored table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LagReading {
    /// Qualified table name (`schema.table`)
    pub table: String,
    /// Measured lag
    pub lag: LagSeconds,
    /// When the measurement was taken
    pub measured_at: DateTime<Utc>,
}

impl LagReading {
    /// Create a reading stamped with the current time
    pub fn now(table: impl Into<String>, lag: LagSeconds) -> Self {
        Self {
            table: table.into(),
            lag,
            measured_at: Utc::now(),
        }
    }
}
