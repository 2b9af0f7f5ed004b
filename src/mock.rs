//! Mock implementations for testing
//!
//! Provides a scripted lag source and in-memory notifiers for unit testing
//! without a warehouse, an SMTP server or Slack.

use crate::alerts::{Alert, AlertSeverity, Notifier};
use crate::db::LagSource;
use crate::domain::{LagReading, LagSeconds, MonitoredTable, SqlIdentifier};
use crate::error::{DatabaseError, NotifyError};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted lag answer for one table
#[derive(Debug, Clone)]
enum Answer {
    Lag(u64),
    Fail(String),
    Empty,
}

/// Lag source answering from a per-table script
#[derive(Debug, Default)]
pub struct MockLagSource {
    answers: HashMap<String, Answer>,
    queried: Vec<String>,
}

impl MockLagSource {
    /// Create an empty mock; unscripted tables fail
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: table reports `secs` of lag
    pub fn with_lag(mut self, qualified: &str, secs: u64) -> Self {
        self.answers.insert(qualified.to_string(), Answer::Lag(secs));
        self
    }

    /// Builder: query for table fails
    pub fn with_failure(mut self, qualified: &str, message: &str) -> Self {
        self.answers
            .insert(qualified.to_string(), Answer::Fail(message.to_string()));
        self
    }

    /// Builder: table is empty
    pub fn with_empty(mut self, qualified: &str) -> Self {
        self.answers.insert(qualified.to_string(), Answer::Empty);
        self
    }

    /// Tables queried so far, in order
    pub fn queried(&self) -> &[String] {
        &self.queried
    }
}

impl LagSource for MockLagSource {
    fn query_lag(&mut self, table: &MonitoredTable) -> Result<LagSeconds, DatabaseError> {
        let name = table.qualified_name();
        self.queried.push(name.clone());

        match self.answers.get(&name) {
            Some(Answer::Lag(secs)) => Ok(LagSeconds::from_secs(*secs)),
            Some(Answer::Empty) => Err(DatabaseError::NoData(name)),
            Some(Answer::Fail(message)) => Err(DatabaseError::QueryFailed {
                table: name,
                message: message.clone(),
            }),
            None => Err(DatabaseError::QueryFailed {
                table: name,
                message: "relation does not exist".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Notifier that records every alert it receives
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    name: String,
    sent: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingNotifier {
    /// Create a recorder; clones share the same record
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Alerts received so far
    pub fn sent(&self) -> Vec<Alert> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Notifier that always fails
#[derive(Debug, Clone)]
pub struct FailingNotifier {
    name: String,
}

impl FailingNotifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Notifier for FailingNotifier {
    fn notify(&self, _alert: &Alert) -> Result<(), NotifyError> {
        Err(NotifyError::SlackStatus {
            status: 404,
            body: "no_service".to_string(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A table `<schema>.<name>` in schema `sales`, timestamp column `dateCreated`
pub fn table(name: &str) -> MonitoredTable {
    MonitoredTable::new(
        name,
        SqlIdentifier::new("sales").unwrap(),
        SqlIdentifier::new(name).unwrap(),
        SqlIdentifier::new("dateCreated").unwrap(),
    )
}

/// A warning alert for `sales.<name>` with the given lag
pub fn sample_alert(name: &str, secs: u64) -> Alert {
    let table = table(name);
    let reading = LagReading::now(table.qualified_name(), LagSeconds::from_secs(secs));
    Alert::new(
        &table,
        reading,
        AlertSeverity::Warning,
        LagSeconds::from_secs(300),
    )
}
