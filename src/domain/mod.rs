//! Domain models for lagwatch
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod lag;
pub mod table;

pub use lag::{LagReading, LagSeconds};
pub use table::{MonitoredTable, SqlIdentifier};
