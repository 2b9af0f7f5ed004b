//! lagwatch - Redshift replication lag monitor
//!
//! A command-line tool, run from cron or an orchestrator, that checks how far
//! replicated Redshift tables lag behind their sources and alerts via email
//! and Slack.

use chrono::Local;
use clap::Parser;
use lagwatch::cli::args::{generate_completions, CheckArgs, Cli, Commands};
use lagwatch::commands::{run_check, run_notify_test, run_validate};
use lagwatch::error::{AppError, ConfigError, DatabaseError};
use std::fs::OpenOptions;
use std::path::Path;

const BANNER_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        init_logging(cli.verbose, None).ok();
        log::error!("Cannot open log file: {}", e);
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        None => run_job(cli, &CheckArgs::default()),

        Some(Commands::Check(args)) => run_job(cli, args),

        Some(Commands::Validate(args)) => run_validate(args, &cli.config, &cli.secrets, cli.format),

        Some(Commands::NotifyTest) => run_notify_test(&cli.config, &cli.secrets, cli.format),

        Some(Commands::Completions { shell }) => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

/// A check run, bracketed by start/finish records in the log
fn run_job(cli: &Cli, args: &CheckArgs) -> Result<(), AppError> {
    log::info!(
        "Starting lag check job at {}",
        Local::now().format(BANNER_TIME_FORMAT)
    );

    run_check(args, &cli.config, &cli.secrets, cli.format, cli.dry_run)?;

    log::info!(
        "Lag check job finished at {}",
        Local::now().format(BANNER_TIME_FORMAT)
    );
    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    // Set log level based on verbose flag
    if verbose {
        builder.filter_module("lagwatch", log::LevelFilter::Debug);
    }

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never)
                .format_timestamp_secs();
        }
        None => {
            builder.format_timestamp(None);
        }
    }

    builder.try_init().map_err(std::io::Error::other)
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Pass --config and --secrets, or set LAGWATCH_CONFIG and");
            eprintln!("      LAGWATCH_SECRETS to the paths of the two .ini files.");
        }
        AppError::Config(ConfigError::UnresolvedCredential(name)) => {
            eprintln!();
            eprintln!("Hint: Add '{} = <password>' to the [credentials] section", name);
            eprintln!("      of the secrets file.");
        }
        AppError::Database(DatabaseError::ConnectionFailed { .. }) => {
            eprintln!();
            eprintln!("Hint: Check host, port and sslmode in [redshift], and that the");
            eprintln!("      cluster's security group allows this machine.");
        }
        _ => {}
    }
}
