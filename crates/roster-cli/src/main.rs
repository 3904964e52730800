//! Roster cleaning pipeline CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use roster_cli::logging::{LogConfig, LogFormat, init_logging};
use roster_cli::summary::{FailedRun, outcomes_json, print_outcomes};
use roster_model::RunOutcome;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_file, run_fingerprint, run_scan};

/// Exit code for a run that stopped on missing required columns.
const EXIT_ABORTED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Run(args) => match run_file(&args) {
            Ok(outcome) => {
                let code = if outcome.is_aborted() { EXIT_ABORTED } else { 0 };
                finish(report(&[outcome], &[], args.json), code)
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Scan(args) => match run_scan(&args) {
            Ok(result) => {
                let code = if result.has_failures() {
                    1
                } else if result.has_aborted() {
                    EXIT_ABORTED
                } else {
                    0
                };
                finish(report(&result.outcomes, &result.failures, args.json), code)
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Fingerprint(args) => match run_fingerprint(&args) {
            Ok(report) => {
                println!("fingerprint:  {}", report["fingerprint"].as_str().unwrap_or(""));
                println!("accepted key: {}", report["accepted_key"].as_str().unwrap_or(""));
                println!("invalid key:  {}", report["invalid_key"].as_str().unwrap_or(""));
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn report(outcomes: &[RunOutcome], failures: &[FailedRun], json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcomes_json(outcomes, failures))?
        );
    } else {
        print_outcomes(outcomes, failures);
    }
    Ok(())
}

fn finish(result: Result<()>, code: i32) -> i32 {
    match result {
        Ok(()) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
