//! CLI argument definitions for the roster pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use roster_cli::discover::RAW_PREFIX;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Roster cleaning pipeline - normalize, validate and deduplicate user CSV files",
    long_about = "Clean user roster CSV files held in an object store.\n\n\
                  Each input is fingerprinted by content; accepted rows are written to\n\
                  processed/users_cleaned_<fingerprint>.csv and rejected rows to\n\
                  errors/invalid_rows_<fingerprint>.csv. Inputs already processed are skipped."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// Allow row values (names, emails) to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process one object.
    Run(RunArgs),

    /// Process every input found under a prefix, once.
    Scan(ScanArgs),

    /// Print the fingerprint and output keys of a local file.
    Fingerprint(FingerprintArgs),
}

/// Where objects live.
#[derive(Args)]
pub struct StoreArgs {
    /// Directory holding one sub-directory per bucket.
    #[arg(
        long = "store-root",
        env = "ROSTER_STORE_ROOT",
        value_name = "DIR",
        default_value = "."
    )]
    pub store_root: PathBuf,

    /// Bucket to read inputs from and write outputs to.
    #[arg(long = "bucket", env = "ROSTER_BUCKET", value_name = "BUCKET")]
    pub bucket: String,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Object key of the input file (for example raw/users.csv).
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Print the outcome as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ScanArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only keys starting with this prefix are considered.
    #[arg(long = "prefix", default_value = RAW_PREFIX)]
    pub prefix: String,

    /// File extension of inputs (case-insensitive).
    #[arg(long = "extension", default_value = "csv")]
    pub extension: String,

    /// Print outcomes as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct FingerprintArgs {
    /// Local file to fingerprint.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
