//! Validate command implementation
//!
//! Loads and validates both configuration files, optionally testing the
//! database connection.

use crate::alerts::NotificationManager;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::cli::output::{print_output, ValidationSummary};
use crate::config::ConfigBuilder;
use crate::db::RedshiftSource;
use crate::error::Result;
use std::path::Path;

/// Execute the validate command
pub fn run_validate(
    args: &ValidateArgs,
    config_path: &Path,
    secrets_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let run = ConfigBuilder::from_files(config_path, secrets_path)?.build()?;
    let connection = &run.config.connection;

    let mut summary = ValidationSummary {
        endpoint: format!(
            "{}@{}:{}/{} (sslmode={})",
            connection.user, connection.host, connection.port, connection.dbname, connection.sslmode
        ),
        thresholds: run.config.thresholds.to_string(),
        tables: run
            .config
            .tables
            .iter()
            .map(|t| format!("{} -> {}.{}", t.name, t.qualified_name(), t.timestamp_column))
            .collect(),
        channels: NotificationManager::from_config(&run.secrets.alerts)?
            .channel_names()
            .into_iter()
            .map(String::from)
            .collect(),
        connection_ok: None,
    };

    if !args.connect {
        print_output(&summary, format)?;
        return Ok(());
    }

    let outcome = RedshiftSource::connect(connection, run.password()?)
        .and_then(|mut source| source.ping());
    summary.connection_ok = Some(outcome.is_ok());
    print_output(&summary, format)?;

    outcome?;
    Ok(())
}
