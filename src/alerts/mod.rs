//! Alert and notification system
//!
//! Provides threshold-based lag alerting with email and Slack channels.

mod config;
mod email;
mod notifier;
mod slack;
mod types;

pub use self::config::{AlertConfig, EmailConfig, SlackConfig, SmtpSecurity};
pub use email::EmailNotifier;
pub use notifier::{ChannelResult, NotificationManager, Notifier};
pub use slack::SlackNotifier;
pub use types::{Alert, AlertSeverity, LagThresholds};
