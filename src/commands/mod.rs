//! CLI command implementations for herakles-check-procs.
//!
//! This module provides implementations for the check and its subcommands:
//! - `check`: Evaluate one snapshot and print the status line
//! - `config`: Configuration file generation
//! - `test`: Per-record filter diagnostics
//! - `generate`: Synthetic snapshot generation

pub mod check;
pub mod config;
pub mod generate;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use generate::command_generate_snapshot;
pub use test::command_test;
