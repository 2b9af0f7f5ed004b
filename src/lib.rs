//! lagwatch - Redshift replication lag monitoring library
//!
//! This library provides the core functionality for measuring replication
//! lag of Redshift tables and alerting through email and Slack when it
//! crosses configured thresholds.
//!
//! # Modules
//!
//! - [`alerts`]: Thresholds, alerts and notification channels
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`db`]: Database abstraction layer
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`services`]: The monitoring run

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
