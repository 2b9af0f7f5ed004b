//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::alerts::LagThresholds;
use crate::config::{Config, IniDocument, Secrets};
use crate::error::ConfigError;
use std::path::Path;

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub config: Config,
    pub secrets: Secrets,
    /// Evaluate and report without sending notifications
    pub dry_run: bool,
}

impl RunConfig {
    /// Password for the configured Redshift user
    pub fn password(&self) -> Result<&str, ConfigError> {
        self.secrets.credential(&self.config.connection.credential)
    }
}

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
    secrets: Secrets,
    warning_threshold: Option<u64>,
    critical_threshold: Option<u64>,
    only_tables: Vec<String>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Start from already parsed config and secrets
    pub fn new(config: Config, secrets: Secrets) -> Self {
        Self {
            config,
            secrets,
            warning_threshold: None,
            critical_threshold: None,
            only_tables: Vec::new(),
            dry_run: false,
        }
    }

    /// Load both configuration files
    pub fn from_files<P: AsRef<Path>, S: AsRef<Path>>(
        config_path: P,
        secrets_path: S,
    ) -> Result<Self, ConfigError> {
        let config = Config::from_document(&IniDocument::load(config_path)?)?;
        let secrets = Secrets::from_document(&IniDocument::load(secrets_path)?)?;
        log::debug!(
            "Loaded {} monitored table(s), thresholds: {}",
            config.tables.len(),
            config.thresholds
        );
        Ok(Self::new(config, secrets))
    }

    /// Override with CLI warning threshold
    pub fn with_warning_threshold(mut self, secs: Option<u64>) -> Self {
        if let Some(s) = secs {
            self.warning_threshold = Some(s);
        }
        self
    }

    /// Override with CLI critical threshold
    pub fn with_critical_threshold(mut self, secs: Option<u64>) -> Self {
        if let Some(s) = secs {
            self.critical_threshold = Some(s);
        }
        self
    }

    /// Restrict the run to the named tables
    pub fn with_tables(mut self, names: &[String]) -> Self {
        self.only_tables.extend(names.iter().map(|n| n.to_lowercase()));
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Apply overrides and validate the result
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let mut config = self.config;

        if self.warning_threshold.is_some() || self.critical_threshold.is_some() {
            let warning = self
                .warning_threshold
                .unwrap_or_else(|| config.thresholds.warning().as_secs());
            // a raised warning threshold lifts the file's critical one along with it
            let critical = match self.critical_threshold {
                Some(c) => Some(c),
                None => config
                    .thresholds
                    .critical()
                    .map(|c| c.as_secs().max(warning)),
            };

            config.thresholds =
                LagThresholds::new(warning, critical).map_err(|source| ConfigError::Domain {
                    key: "threshold".to_string(),
                    source,
                })?;
        }

        if !self.only_tables.is_empty() {
            if let Some(unknown) = self
                .only_tables
                .iter()
                .find(|name| !config.tables.iter().any(|t| &t.name == *name))
            {
                return Err(ConfigError::InvalidValue {
                    key: "table".to_string(),
                    message: format!("'{}' is not a configured table", unknown),
                });
            }
            config.tables.retain(|t| self.only_tables.contains(&t.name));
        }

        let run = RunConfig {
            config,
            secrets: self.secrets,
            dry_run: self.dry_run,
        };

        // Fail before connecting rather than after
        run.password()?;

        if !run.secrets.alerts.has_channels() {
            log::warn!("No [email] or [slack] section in secrets; alerts will only be logged");
        }

        Ok(run)
    }
}
