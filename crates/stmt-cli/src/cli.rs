//! CLI argument definitions for statement mapping review.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "stmt-review",
    version,
    about = "Review AI field mappings for commission statements",
    long_about = "Review AI-suggested field mappings for a commission statement.\n\n\
                  Approve, skip, rename or redirect each extracted field, then submit\n\
                  the reconciled mapping once every row is resolved."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start reviewing a fresh mapping batch.
    Review(ReviewArgs),

    /// Continue a saved review session.
    Resume(ResumeArgs),

    /// Print the submission payload of a finished session.
    Submit(SubmitArgs),

    /// Print the effective settings as TOML.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct ReviewArgs {
    /// AI mapping response (JSON).
    #[arg(long = "batch", value_name = "PATH")]
    pub batch: PathBuf,

    /// Database field list (JSON).
    #[arg(long = "fields", value_name = "PATH")]
    pub fields: PathBuf,

    /// Decisions to apply in order (JSON array).
    #[arg(long = "decisions", value_name = "PATH")]
    pub decisions: Option<PathBuf>,

    /// Save the session so it can be resumed later.
    #[arg(long = "save-session", value_name = "PATH")]
    pub save_session: Option<PathBuf>,

    /// Note stored with the saved session.
    #[arg(long = "description", requires = "save_session")]
    pub description: Option<String>,

    /// Override the auto-approval threshold from settings.
    #[arg(long = "auto-approve-threshold", value_name = "SCORE")]
    pub auto_approve_threshold: Option<f64>,

    /// Output format (default from settings).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Parser)]
pub struct ResumeArgs {
    /// Saved session file.
    #[arg(long = "session", value_name = "PATH")]
    pub session: PathBuf,

    /// Decisions to apply in order (JSON array).
    #[arg(long = "decisions", value_name = "PATH")]
    pub decisions: Option<PathBuf>,

    /// Do not write the updated session back.
    #[arg(long = "no-save")]
    pub no_save: bool,

    /// Output format (default from settings).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Parser)]
pub struct SubmitArgs {
    /// Saved session file.
    #[arg(long = "session", value_name = "PATH")]
    pub session: PathBuf,

    /// Output format (default: json).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Also write them to the settings file (`--config` or the default location).
    #[arg(long = "write")]
    pub write: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
