//! CLI argument definitions for Template Review Studio.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "trs",
    version,
    about = "Template Review Studio - Review permissioned grid templates",
    long_about = "Manage permissioned grid templates and their review workflow.\n\n\
                  Templates live in a .trs store file. Each submission is an immutable\n\
                  versioned grid; reviewers approve or reject the pending version and\n\
                  supervisors resubmit a new grid after a rejection."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the .trs store file.
    #[arg(
        long = "store",
        value_name = "PATH",
        default_value = "templates.trs",
        global = true
    )]
    pub store: PathBuf,

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
    /// Create a template request with its initial grid submission.
    Create(CreateArgs),

    /// Approve or reject the pending submission of a template.
    Review(ReviewArgs),

    /// Submit a new grid for a rejected template.
    Resubmit(ResubmitArgs),

    /// Show the submission history of a template, newest first.
    History(HistoryArgs),

    /// Show a template's current grid with per-cell access classes.
    Show(ShowArgs),

    /// List all templates with their review status.
    List,

    /// Validate a grid JSON file without storing it.
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct CreateArgs {
    /// Path to the grid JSON file (values, permissions, merge_regions).
    #[arg(value_name = "GRID_FILE")]
    pub grid: PathBuf,

    /// Template name.
    #[arg(long)]
    pub name: String,

    /// Department identifier.
    #[arg(long)]
    pub department: String,

    /// Equipment identifier.
    #[arg(long)]
    pub equipment: String,

    /// Supervisor user id.
    #[arg(long)]
    pub supervisor: String,

    /// Optional description.
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Parser)]
pub struct ReviewArgs {
    /// Template id.
    #[arg(value_name = "TEMPLATE_ID")]
    pub template: u64,

    /// Decision for the pending submission.
    #[arg(value_enum)]
    pub decision: DecisionArg,

    /// Reviewer user id.
    #[arg(long)]
    pub reviewer: String,

    /// Review comment (required to reject, 5-500 characters).
    #[arg(long)]
    pub comment: Option<String>,

    /// Fail if the current version differs (optimistic concurrency).
    #[arg(long = "expected-version", value_name = "N")]
    pub expected_version: Option<u32>,
}

#[derive(Parser)]
pub struct ResubmitArgs {
    /// Template id.
    #[arg(value_name = "TEMPLATE_ID")]
    pub template: u64,

    /// Path to the new grid JSON file.
    #[arg(value_name = "GRID_FILE")]
    pub grid: PathBuf,

    /// Fail if the current version differs (optimistic concurrency).
    #[arg(long = "expected-version", value_name = "N")]
    pub expected_version: Option<u32>,
}

#[derive(Parser)]
pub struct HistoryArgs {
    /// Template id.
    #[arg(value_name = "TEMPLATE_ID")]
    pub template: u64,

    /// Number of submissions to skip from the newest end.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum number of submissions to show.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Template id.
    #[arg(value_name = "TEMPLATE_ID")]
    pub template: u64,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the grid JSON file to validate.
    #[arg(value_name = "GRID_FILE")]
    pub grid: PathBuf,
}

/// Review decision choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum DecisionArg {
    Approve,
    Reject,
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
