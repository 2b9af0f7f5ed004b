//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Redshift replication lag monitor
///
/// Queries Redshift for the freshness of replicated tables and alerts via
/// email and Slack when lag exceeds the configured thresholds. Meant to be
/// run from cron or an orchestrator; runs `check` when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "lagwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for the run report
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to the connection configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "LAGWATCH_CONFIG",
        default_value = "lagwatch.ini"
    )]
    pub config: PathBuf,

    /// Path to the secrets configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "LAGWATCH_SECRETS",
        default_value = "secrets.ini"
    )]
    pub secrets: PathBuf,

    /// Append log records to this file instead of stderr
    #[arg(long, global = true, env = "LAGWATCH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Dry run mode - evaluate and report, don't send notifications
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check replication lag and alert on breaches (default)
    Check(CheckArgs),

    /// Validate configuration files
    Validate(ValidateArgs),

    /// Send a synthetic alert through every configured channel
    NotifyTest,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the check command
#[derive(Parser, Debug, Default)]
pub struct CheckArgs {
    /// Only check these tables (config section names, repeatable)
    #[arg(short, long = "table", value_name = "NAME")]
    pub tables: Vec<String>,

    /// Override the warning threshold in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub warning_threshold: Option<u64>,

    /// Override the critical threshold in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub critical_threshold: Option<u64>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Also open a database connection and run a trivial query
    #[arg(long)]
    pub connect: bool,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_subcommand() {
        let args = Cli::try_parse_from(["lagwatch"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["lagwatch", "-v", "check"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_paths() {
        let args = Cli::try_parse_from([
            "lagwatch",
            "--config",
            "/etc/lagwatch/lagwatch.ini",
            "--secrets",
            "/etc/lagwatch/secrets.ini",
            "--log-file",
            "/var/log/lagwatch.log",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/lagwatch/lagwatch.ini"));
        assert_eq!(args.secrets, PathBuf::from("/etc/lagwatch/secrets.ini"));
        assert_eq!(args.log_file, Some(PathBuf::from("/var/log/lagwatch.log")));
    }

    #[test]
    fn test_cli_parse_check_args() {
        let args = Cli::try_parse_from([
            "lagwatch",
            "--dry-run",
            "check",
            "--table",
            "orders",
            "-t",
            "users",
            "--warning-threshold",
            "300",
        ])
        .unwrap();

        assert!(args.dry_run);
        if let Some(Commands::Check(check)) = args.command {
            assert_eq!(check.tables, vec!["orders", "users"]);
            assert_eq!(check.warning_threshold, Some(300));
            assert_eq!(check.critical_threshold, None);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_format_short() {
        let args = Cli::try_parse_from(["lagwatch", "-f", "json", "check"]).unwrap();
        assert!(matches!(args.format, OutputFormat::Json));

        let args = Cli::try_parse_from(["lagwatch", "check", "--format", "compact"]).unwrap();
        assert!(matches!(args.format, OutputFormat::Compact));
    }

    #[test]
    fn test_cli_zero_threshold_rejected() {
        let result = Cli::try_parse_from(["lagwatch", "check", "--warning-threshold", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_validate_connect() {
        let args = Cli::try_parse_from(["lagwatch", "validate", "--connect"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Validate(ValidateArgs { connect: true }))
        ));
    }

    #[test]
    fn test_cli_parse_notify_test() {
        let args = Cli::try_parse_from(["lagwatch", "notify-test"]).unwrap();
        assert!(matches!(args.command, Some(Commands::NotifyTest)));
    }
}
