//! Lag monitor
//!
//! Runs one monitoring pass: query every table, evaluate thresholds and
//! dispatch one alert per breaching table.

use crate::alerts::{Alert, AlertSeverity, ChannelResult, LagThresholds, NotificationManager};
use crate::db::LagSource;
use crate::domain::{LagReading, MonitoredTable};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome for one monitored table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    /// Lag below the warning threshold
    WithinLimits { reading: LagReading },
    /// Lag at or above a threshold; one alert raised
    Breached {
        alert: Alert,
        /// Empty when dispatch was skipped (dry run, no channels)
        dispatch: Vec<ChannelResult>,
    },
    /// The lag query failed; table skipped
    QueryFailed { error: String },
}

/// Per-table entry of a run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    /// Config name of the table
    pub name: String,
    /// Qualified table name
    pub table: String,
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

/// Result of one monitoring pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub tables: Vec<TableReport>,
}

impl RunReport {
    /// Alerts raised during the run
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.tables.iter().filter_map(|t| match &t.outcome {
            TableOutcome::Breached { alert, .. } => Some(alert),
            _ => None,
        })
    }

    /// Number of tables whose query failed
    pub fn failed_count(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| matches!(t.outcome, TableOutcome::QueryFailed { .. }))
            .count()
    }

    /// Number of channel deliveries that failed
    pub fn dispatch_failures(&self) -> usize {
        self.tables
            .iter()
            .map(|t| match &t.outcome {
                TableOutcome::Breached { dispatch, .. } => {
                    dispatch.iter().filter(|r| !r.delivered()).count()
                }
                _ => 0,
            })
            .sum()
    }
}

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub thresholds: LagThresholds,
    pub tables: Vec<MonitoredTable>,
    /// Evaluate without dispatching
    pub dry_run: bool,
}

/// One-shot lag monitor
pub struct LagMonitor<'a> {
    config: MonitorConfig,
    notifier: &'a NotificationManager,
}

impl<'a> LagMonitor<'a> {
    /// Create a new monitor
    pub fn new(config: MonitorConfig, notifier: &'a NotificationManager) -> Self {
        Self { config, notifier }
    }

    /// Check every table once
    ///
    /// Never fails: per-table query errors and dispatch errors are logged
    /// and recorded in the report.
    pub fn run<S: LagSource>(&self, source: &mut S) -> RunReport {
        let started_at = Utc::now();
        log::info!(
            "Checking {} table(s) on {} ({})",
            self.config.tables.len(),
            source.describe(),
            self.config.thresholds
        );

        let tables = self
            .config
            .tables
            .iter()
            .map(|table| TableReport {
                name: table.name.clone(),
                table: table.qualified_name(),
                outcome: self.check_table(source, table),
            })
            .collect();

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            dry_run: self.config.dry_run,
            tables,
        };

        log::info!(
            "Run finished: {} table(s), {} alert(s), {} query failure(s), {} dispatch failure(s)",
            report.tables.len(),
            report.alerts().count(),
            report.failed_count(),
            report.dispatch_failures()
        );

        report
    }

    fn check_table<S: LagSource>(&self, source: &mut S, table: &MonitoredTable) -> TableOutcome {
        let lag = match source.query_lag(table) {
            Ok(lag) => lag,
            Err(e) => {
                log::error!("Fetching lag for {} failed: {}", table.qualified_name(), e);
                return TableOutcome::QueryFailed {
                    error: e.to_string(),
                };
            }
        };

        let reading = LagReading::now(table.qualified_name(), lag);

        let Some(severity) = self.config.thresholds.evaluate(lag) else {
            log::info!(
                "Replication lag is within acceptable limits for {} ({})",
                reading.table,
                lag
            );
            return TableOutcome::WithinLimits { reading };
        };

        let alert = Alert::new(
            table,
            reading,
            severity,
            self.config.thresholds.threshold_for(severity),
        );
        match severity {
            AlertSeverity::Critical => log::error!("{}", alert.subject),
            AlertSeverity::Warning => log::warn!("{}", alert.subject),
        }
        log::info!("{} lag {} >= {}", alert.table, alert.reading.lag, alert.threshold);

        let dispatch = if self.config.dry_run {
            log::info!("Dry run: not dispatching alert for {}", alert.table);
            Vec::new()
        } else {
            self.notifier.notify_all(&alert)
        };

        TableOutcome::Breached { alert, dispatch }
    }
}
