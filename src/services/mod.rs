//! Service layer for lag monitoring
//!
//! Services encapsulate the business logic of a monitoring run.

pub mod monitor;

pub use monitor::{LagMonitor, MonitorConfig, RunReport, TableOutcome, TableReport};
