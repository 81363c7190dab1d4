//! CLI arguments and subcommands for herakles-check-procs.
//!
//! This module defines the command-line interface structure using the clap library.
//! Short flags follow the classic `check_procs` plugin conventions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Check result output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Main CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(
    name = "herakles-check-procs",
    about = "Count processes matching a filter set and check the count against warning/critical limits",
    long_about = "Count processes matching a filter set and check the count against warning/critical limits.\n\n\
                  Process status letters for -s/-S:\n  \
                  F - process being created by fork\n  \
                  R - currently runnable\n  \
                  D - sleeping on an address\n  \
                  T - process debugging or suspension\n  \
                  Z - awaiting collection by parent (zombie)\n  \
                  W - waiting for interrupt\n  \
                  L - blocked on a lock\n\n\
                  Thread state letters for -W/-T:\n  \
                  l - uwrlck\n  \
                  w - uwait\n\n\
                  Limits are given as upper:lower. The upper bound triggers when at least that many \
                  processes match, the lower bound when at most that many match. Either side may be empty.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true,
    after_help = "Exit codes: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Match processes whose command name equals this value
    #[arg(short = 'C', long = "command")]
    pub command_name: Option<String>,

    /// Match processes with an argument containing this substring
    #[arg(short = 'a', long)]
    pub argument: Option<String>,

    /// Match processes whose status is one of these letters
    #[arg(short = 's', long)]
    pub status: Option<String>,

    /// Match processes whose status is none of these letters
    #[arg(short = 'S', long)]
    pub not_status: Option<String>,

    /// Match threads whose wait state is one of these letters
    #[arg(short = 'W', long)]
    pub thread_status: Option<String>,

    /// Match threads whose wait state is none of these letters
    #[arg(short = 'T', long)]
    pub not_thread_status: Option<String>,

    /// Match the process with this pid
    #[arg(short = 'p', long)]
    pub pid: Option<u32>,

    /// Match processes owned by this user
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Warning limit: upper:lower
    #[arg(short = 'w', long)]
    pub warning: Option<String>,

    /// Critical limit: upper:lower
    #[arg(short = 'c', long)]
    pub critical: Option<String>,

    /// Evaluate threads: a process matches only if all of its threads match
    #[arg(short = 't', long)]
    pub threads: bool,

    /// Debug output (same as --log-level debug)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Check result output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Read the snapshot from a JSON file instead of /proc
    #[arg(long)]
    pub snapshot_file: Option<PathBuf>,

    /// Config file (YAML/JSON/TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 3 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a configuration file
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Print every snapshot record with its filter outcome
    Test {
        /// Show the outcome of each individual filter
        #[arg(long)]
        verbose: bool,

        /// Only print matching records
        #[arg(long)]
        matching_only: bool,
    },

    /// Generate a synthetic snapshot JSON file
    GenerateSnapshot {
        /// Output file path
        #[arg(short = 'o', long, default_value = "snapshot.json")]
        output: PathBuf,

        /// Number of processes to generate
        #[arg(long, default_value_t = 40)]
        processes: usize,

        /// Maximum threads per process (1 = process records only)
        #[arg(long, default_value_t = 1)]
        max_threads: usize,
    },

    /// Check runtime requirements and permissions
    CheckRequirements,
}
