//! Alert channel configuration
//!
//! Email and Slack settings, read from the secrets file.

use crate::config::file::{IniDocument, Section};
use crate::error::ConfigError;
use lettre::message::Mailbox;
use std::fmt;
use std::str::FromStr;

/// Notification channel settings
#[derive(Debug, Clone, Default)]
pub struct AlertConfig {
    /// `[email]` section, if present
    pub email: Option<EmailConfig>,
    /// `[slack]` section, if present
    pub slack: Option<SlackConfig>,
}

impl AlertConfig {
    /// Read the `[email]` and `[slack]` sections of a secrets document
    pub fn from_document(doc: &IniDocument) -> Result<Self, ConfigError> {
        let email = doc
            .section("email")
            .map(|section| EmailConfig::from_section(&section))
            .transpose()?;
        let slack = doc
            .section("slack")
            .map(|section| SlackConfig::from_section(&section))
            .transpose()?;

        Ok(Self { email, slack })
    }

    /// Whether any channel is configured
    pub fn has_channels(&self) -> bool {
        self.email.is_some() || self.slack.is_some()
    }
}

/// SMTP connection security
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Implicit TLS (SMTPS, usually port 465)
    #[default]
    Ssl,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    StartTls,
    /// Unencrypted, for local relays only
    None,
}

impl SmtpSecurity {
    /// Conventional port for this mode
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Ssl => 465,
            Self::StartTls => 587,
            Self::None => 25,
        }
    }
}

impl FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ssl" | "tls" | "smtps" => Ok(Self::Ssl),
            "starttls" => Ok(Self::StartTls),
            "none" | "plain" => Ok(Self::None),
            _ => Err("expected one of ssl, starttls, none".to_string()),
        }
    }
}

impl fmt::Display for SmtpSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ssl => write!(f, "ssl"),
            Self::StartTls => write!(f, "starttls"),
            Self::None => write!(f, "none"),
        }
    }
}

/// SMTP settings
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub security: SmtpSecurity,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Mailbox,
    pub recipients: Vec<Mailbox>,
    /// Extra recipients for critical alerts
    pub critical_recipients: Vec<Mailbox>,
}

impl EmailConfig {
    fn from_section(section: &Section<'_>) -> Result<Self, ConfigError> {
        let smtp_host = section.require("smtp_host")?.to_string();
        let security: SmtpSecurity = section.parse_or("security", SmtpSecurity::default())?;
        let smtp_port = section.parse_or("smtp_port", security.default_port())?;
        let username = section.get("smtp_username").map(String::from);
        let password = section.get("smtp_password").map(String::from);

        if username.is_some() != password.is_some() {
            return Err(ConfigError::InvalidValue {
                key: section.qualified("smtp_password"),
                message: "smtp_username and smtp_password must be set together".to_string(),
            });
        }

        let mailbox = |key: &str, raw: &str| {
            raw.parse::<Mailbox>().map_err(|e| ConfigError::InvalidValue {
                key: section.qualified(key),
                message: format!("'{}': {}", raw, e),
            })
        };
        let mailboxes = |key: &str| -> Result<Vec<Mailbox>, ConfigError> {
            section.list(key).iter().map(|raw| mailbox(key, raw.as_str())).collect()
        };

        let from = match section.get("from").or(username.as_deref()) {
            Some(from) => mailbox("from", from)?,
            None => return Err(ConfigError::MissingField(section.qualified("from"))),
        };

        let recipients = mailboxes("recipients")?;
        if recipients.is_empty() {
            return Err(ConfigError::MissingField(section.qualified("recipients")));
        }

        Ok(Self {
            smtp_host,
            smtp_port,
            security,
            username,
            password,
            from,
            recipients,
            critical_recipients: mailboxes("critical_recipients")?,
        })
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .field("critical_recipients", &self.critical_recipients)
            .finish()
    }
}

/// Slack incoming-webhook settings
#[derive(Clone)]
pub struct SlackConfig {
    pub webhook_url: String,
}

impl SlackConfig {
    fn from_section(section: &Section<'_>) -> Result<Self, ConfigError> {
        let webhook_url = section.require("webhook_url")?.to_string();
        if !(webhook_url.starts_with("https://") || webhook_url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                key: section.qualified("webhook_url"),
                message: "must be an http(s) URL".to_string(),
            });
        }

        Ok(Self { webhook_url })
    }
}

// Webhook URLs embed a token
impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}
