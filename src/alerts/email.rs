//! Email channel (SMTP)

use super::config::{EmailConfig, SmtpSecurity};
use super::notifier::Notifier;
use super::types::{Alert, AlertSeverity};
use crate::error::NotifyError;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends alerts as plain-text email
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    /// Create a new email notifier
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Recipients for an alert; critical alerts also reach the critical list
    fn recipients(&self, severity: AlertSeverity) -> Vec<&Mailbox> {
        let mut recipients: Vec<&Mailbox> = self.config.recipients.iter().collect();
        if severity == AlertSeverity::Critical {
            for extra in &self.config.critical_recipients {
                let known = recipients
                    .iter()
                    .any(|r| r.email.to_string().eq_ignore_ascii_case(&extra.email.to_string()));
                if !known {
                    recipients.push(extra);
                }
            }
        }
        recipients
    }

    fn build_message(&self, alert: &Alert) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(self.config.from.clone())
            .subject(alert.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        for recipient in self.recipients(alert.severity) {
            builder = builder.to(recipient.clone());
        }

        builder
            .body(alert.message.clone())
            .map_err(|e| NotifyError::InvalidMessage(e.to_string()))
    }

    fn transport(&self) -> Result<SmtpTransport, NotifyError> {
        let host = self.config.smtp_host.as_str();
        let builder = match self.config.security {
            SmtpSecurity::Ssl => SmtpTransport::relay(host),
            SmtpSecurity::StartTls => SmtpTransport::starttls_relay(host),
            SmtpSecurity::None => Ok(SmtpTransport::builder_dangerous(host)),
        }
        .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        let mut builder = builder
            .port(self.config.smtp_port)
            .timeout(Some(SMTP_TIMEOUT));

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let message = self.build_message(alert)?;
        let transport = self.transport()?;

        transport
            .send(&message)
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        log::debug!(
            "Email '{}' delivered to {}",
            alert.subject,
            self.recipients(alert.severity)
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }
}
