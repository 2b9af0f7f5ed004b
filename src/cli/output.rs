//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::services::{RunReport, TableOutcome};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

impl TableDisplay for RunReport {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Lag check at {}{}\n\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            if self.dry_run { " (dry run)" } else { "" }
        );

        output.push_str("  Table                          Lag          Status\n");
        output.push_str("  ────────────────────────────────────────────────────────────\n");

        for entry in &self.tables {
            let (lag, status) = match &entry.outcome {
                TableOutcome::WithinLimits { reading } => (reading.lag.to_string(), "ok".to_string()),
                TableOutcome::Breached { alert, dispatch } => {
                    let delivered: Vec<&str> = dispatch
                        .iter()
                        .filter(|r| r.delivered())
                        .map(|r| r.channel.as_str())
                        .collect();
                    let failed: Vec<&str> = dispatch
                        .iter()
                        .filter(|r| !r.delivered())
                        .map(|r| r.channel.as_str())
                        .collect();

                    let mut status = alert.severity.to_string();
                    if !delivered.is_empty() {
                        status.push_str(&format!(" sent: {}", delivered.join(",")));
                    }
                    if !failed.is_empty() {
                        status.push_str(&format!(" failed: {}", failed.join(",")));
                    }
                    (alert.reading.lag.to_string(), status)
                }
                TableOutcome::QueryFailed { error } => ("-".to_string(), format!("ERROR {}", error)),
            };

            output.push_str(&format!("  {:<30} {:<12} {}\n", entry.table, lag, status));
        }

        output.push_str(&format!(
            "\n{} table(s), {} alert(s), {} failed",
            self.tables.len(),
            self.alerts().count(),
            self.failed_count()
        ));

        output
    }

    fn to_compact(&self) -> String {
        self.tables
            .iter()
            .map(|entry| match &entry.outcome {
                TableOutcome::WithinLimits { reading } => format!("{}={}", entry.table, reading.lag),
                TableOutcome::Breached { alert, .. } => {
                    format!("{}={}!{}", entry.table, alert.reading.lag, alert.severity)
                }
                TableOutcome::QueryFailed { .. } => format!("{}=ERROR", entry.table),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Configuration summary for `validate`
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub endpoint: String,
    pub thresholds: String,
    pub tables: Vec<String>,
    pub channels: Vec<String>,
    /// `None` when the connection was not tested
    pub connection_ok: Option<bool>,
}

impl TableDisplay for ValidationSummary {
    fn to_table(&self) -> String {
        let mut output = format!("✓ Configuration is valid\n\nRedshift:   {}\n", self.endpoint);
        output.push_str(&format!("Thresholds: {}\n", self.thresholds));
        output.push_str(&format!(
            "Channels:   {}\n",
            if self.channels.is_empty() {
                "none (alerts are only logged)".to_string()
            } else {
                self.channels.join(", ")
            }
        ));
        output.push_str(&format!("Tables ({}):\n", self.tables.len()));
        for table in &self.tables {
            output.push_str(&format!("  {}\n", table));
        }
        match self.connection_ok {
            Some(true) => output.push_str("✓ Connection succeeded\n"),
            Some(false) => output.push_str("✗ Connection failed\n"),
            None => {}
        }
        output
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
