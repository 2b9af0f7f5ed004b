//! Trait definitions for lag queries
//!
//! These traits abstract over the database driver to enable testing with mocks.

use crate::domain::{LagSeconds, MonitoredTable};
use crate::error::DatabaseError;

/// Something that can measure replication lag for a table
///
/// The production implementation talks to Redshift; tests script the
/// answers per table.
pub trait LagSource {
    /// Measure the current lag of one table
    ///
    /// A failure here affects only this table; the caller moves on to the
    /// next one.
    fn query_lag(&mut self, table: &MonitoredTable) -> Result<LagSeconds, DatabaseError>;

    /// Short description of the source, for logs
    fn describe(&self) -> String;
}
