//! Statement mapping review CLI.
//!
//! Exit codes: 0 when the review may be submitted, 1 while rows are pending
//! or names collide, 2 on any other failure.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use stmt_cli::logging::{LogConfig, LogFormat, init_logging};
use stmt_cli::settings::load_settings;
use stmt_map::MappingError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_config, run_resume, run_review, run_submit};

const EXIT_GATE_CLOSED: i32 = 1;
const EXIT_FAILURE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FAILURE);
    }
    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(EXIT_FAILURE);
        }
    };
    let result = match &cli.command {
        Command::Review(args) => run_review(args, &settings).map(|o| o.can_submit),
        Command::Resume(args) => run_resume(args, &settings).map(|o| o.can_submit),
        Command::Submit(args) => run_submit(args).map(|()| true),
        Command::Config(args) => {
            run_config(args, cli.config.as_deref(), &settings).map(|()| true)
        }
    };
    let exit_code = match result {
        Ok(true) => 0,
        Ok(false) => EXIT_GATE_CLOSED,
        Err(error) => report_error(&error),
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    let mapping = error.downcast_ref::<MappingError>();
    if let Some(hint) = mapping.and_then(MappingError::suggestion) {
        eprintln!("hint: {hint}");
    }
    match mapping {
        Some(MappingError::PendingFields { .. } | MappingError::DuplicateFields(_)) => {
            EXIT_GATE_CLOSED
        }
        _ => EXIT_FAILURE,
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
