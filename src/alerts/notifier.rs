//! Alert notification system
//!
//! Provides the notification channel trait and the manager that fans an
//! alert out to every configured channel.

use super::config::AlertConfig;
use super::email::EmailNotifier;
use super::slack::SlackNotifier;
use super::types::Alert;
use crate::error::NotifyError;
use serde::Serialize;

/// Notification channel trait
pub trait Notifier: Send + Sync {
    /// Send a notification for an alert
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Outcome of dispatching one alert to one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelResult {
    pub channel: String,
    /// `None` on success, the failure reason otherwise
    pub error: Option<String>,
}

impl ChannelResult {
    /// Whether the channel accepted the alert
    pub fn delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Notification manager
///
/// Manages multiple notification channels and dispatches alerts to them.
/// A failing channel never stops the remaining ones from being attempted.
pub struct NotificationManager {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationManager {
    /// Create a new notification manager
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Build the channels described by the secrets file
    pub fn from_config(config: &AlertConfig) -> Result<Self, NotifyError> {
        let mut manager = Self::new();

        if let Some(email) = &config.email {
            manager.add_notifier(Box::new(EmailNotifier::new(email.clone())));
        }
        if let Some(slack) = &config.slack {
            manager.add_notifier(Box::new(SlackNotifier::new(slack.clone())?));
        }

        Ok(manager)
    }

    /// Add a notifier
    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Send notification to all channels
    pub fn notify_all(&self, alert: &Alert) -> Vec<ChannelResult> {
        self.notifiers
            .iter()
            .map(|notifier| match notifier.notify(alert) {
                Ok(()) => {
                    log::info!("{} alert for {} sent via {}", alert.severity, alert.table, notifier.name());
                    ChannelResult {
                        channel: notifier.name().to_string(),
                        error: None,
                    }
                }
                Err(e) => {
                    log::warn!("Failed to notify via {} for {}: {}", notifier.name(), alert.table, e);
                    ChannelResult {
                        channel: notifier.name().to_string(),
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }

    /// Names of the active channels
    pub fn channel_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Get number of active notifiers
    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
