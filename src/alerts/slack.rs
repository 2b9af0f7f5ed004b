//! Slack incoming-webhook channel

use super::config::SlackConfig;
use super::notifier::Notifier;
use super::types::{Alert, AlertSeverity};
use crate::error::NotifyError;

use reqwest::blocking::Client;
use std::time::Duration;

const SLACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts alerts to a Slack webhook
pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
}

impl SlackNotifier {
    /// Create a new Slack notifier
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::SlackClient` if the TLS backend cannot be
    /// initialized.
    pub fn new(config: SlackConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(SLACK_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::SlackClient(e.to_string()))?;

        Ok(Self {
            webhook_url: config.webhook_url,
            client,
        })
    }

    fn payload(alert: &Alert) -> serde_json::Value {
        let marker = match alert.severity {
            AlertSeverity::Warning => ":warning:",
            AlertSeverity::Critical => ":rotating_light:",
        };
        serde_json::json!({
            "text": format!("{} *{}*\n{}", marker, alert.subject, alert.message),
        })
    }
}

impl Notifier for SlackNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&Self::payload(alert))
            .send()
            .map_err(|e| NotifyError::SlackRequest(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::debug!("Slack alert for {} sent", alert.table);
            Ok(())
        } else {
            let body = response.text().unwrap_or_default();
            Err(NotifyError::SlackStatus {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::sample_alert;

    #[test]
    fn test_payload_has_text() {
        let payload = SlackNotifier::payload(&sample_alert("orders", 450));
        let text = payload["text"].as_str().unwrap();
        assert!(text.starts_with(":warning: *Redshift Lag Alert: sales.orders*"));
        assert!(text.contains("450"));
    }

    #[test]
    fn test_unreachable_webhook_is_an_error() {
        let notifier = SlackNotifier::new(SlackConfig {
            webhook_url: "http://127.0.0.1:9/services/T/B/X".to_string(),
        })
        .unwrap();
        let result = notifier.notify(&sample_alert("orders", 450));
        assert!(matches!(result, Err(NotifyError::SlackRequest(_))));
    }
}
