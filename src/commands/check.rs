//! Check command implementation
//!
//! Runs one monitoring pass over the configured tables.

use crate::alerts::NotificationManager;
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::cli::output::print_output;
use crate::config::ConfigBuilder;
use crate::db::RedshiftSource;
use crate::error::Result;
use crate::services::{LagMonitor, MonitorConfig};
use std::path::Path;

/// Execute the check command
///
/// Configuration and connection errors abort the run. Everything after the
/// connection is established is reported, never propagated.
pub fn run_check(
    args: &CheckArgs,
    config_path: &Path,
    secrets_path: &Path,
    format: OutputFormat,
    dry_run: bool,
) -> Result<()> {
    let run = ConfigBuilder::from_files(config_path, secrets_path)?
        .with_warning_threshold(args.warning_threshold)
        .with_critical_threshold(args.critical_threshold)
        .with_tables(&args.tables)
        .with_dry_run(dry_run)
        .build()?;

    let notifier = NotificationManager::from_config(&run.secrets.alerts)?;
    log::debug!("Notification channels: {:?}", notifier.channel_names());

    let mut source = RedshiftSource::connect(&run.config.connection, run.password()?)?;

    let monitor = LagMonitor::new(
        MonitorConfig {
            thresholds: run.config.thresholds,
            tables: run.config.tables.clone(),
            dry_run: run.dry_run,
        },
        &notifier,
    );
    let report = monitor.run(&mut source);

    print_output(&report, format)?;

    Ok(())
}
