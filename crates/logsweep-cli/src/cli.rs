//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// Logsweep - Archive stale log directories and expire old archives.
#[derive(Debug, Parser)]
#[command(name = "logsweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON, or TOML when ending in .toml)
    #[arg(short, long, env = "LOGSWEEP_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Write log output to this file (truncated) instead of stderr
    #[arg(short, long, env = "LOGSWEEP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Report what would be done without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Keep running and repeat every N minutes (until Ctrl+C)
    #[arg(long, value_name = "MINUTES")]
    pub interval_minutes: Option<u64>,

    /// With --interval-minutes, stop after this many runs
    #[arg(long, requires = "interval_minutes")]
    pub cycles: Option<usize>,
}

/// Summary format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable table (default)
    Text,
    /// JSON document
    Json,
    /// No summary, exit status only
    Quiet,
}

impl Cli {
    /// Default log filter directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
