//! Notification test command
//!
//! Sends a synthetic alert through every configured channel.

use crate::alerts::{Alert, AlertSeverity, NotificationManager};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Message};
use crate::config::ConfigBuilder;
use crate::domain::LagReading;
use crate::error::{AppError, ConfigError, Result};
use std::path::Path;

/// Execute the notify-test command
pub fn run_notify_test(config_path: &Path, secrets_path: &Path, format: OutputFormat) -> Result<()> {
    let run = ConfigBuilder::from_files(config_path, secrets_path)?.build()?;
    let notifier = NotificationManager::from_config(&run.secrets.alerts)?;

    if notifier.notifier_count() == 0 {
        return Err(ConfigError::NoChannels.into());
    }

    // validated non-empty at load time
    let Some(table) = run.config.tables.first() else {
        return Ok(());
    };
    let threshold = run.config.thresholds.warning();
    let reading = LagReading::now(table.qualified_name(), threshold);
    let mut alert = Alert::new(table, reading, AlertSeverity::Warning, threshold);
    alert.subject = format!("[TEST] {}", alert.subject);
    alert.message = format!(
        "This is a test alert sent by `lagwatch notify-test`; no action is needed.\n\n{}",
        alert.message
    );

    let results = notifier.notify_all(&alert);
    let failed = results.iter().filter(|r| !r.delivered()).count();

    for result in &results {
        let message = match &result.error {
            None => format!("{}: test alert delivered", result.channel),
            Some(e) => format!("{}: {}", result.channel, e),
        };
        print_output(
            &Message {
                message,
                success: result.delivered(),
            },
            format,
        )?;
    }

    if failed > 0 {
        return Err(AppError::NotifyTestFailed(failed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_channels_is_an_error() {
        let config = write(
            "[redshift]\nhost = h\ndbname = d\nuser = u\n\n[table.orders]\nschema = sales\n",
        );
        let secrets = write("[credentials]\nredshift_password = x\n");

        let result = run_notify_test(config.path(), secrets.path(), OutputFormat::Compact);
        assert!(matches!(result, Err(AppError::Config(ConfigError::NoChannels))));
    }
}
