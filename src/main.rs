//! herakles-check-procs - version 0.1.0
//!
//! Process count check for Nagios-compatible monitoring systems.
//! This is the main entry point that resolves configuration, takes one
//! snapshot, prints the status line and exits with the check's severity.

mod cli;
mod commands;
mod config;
mod process;
mod startup_checks;

use clap::Parser;
use herakles_check_procs::{unknown_line, UNKNOWN_EXIT_CODE};
use std::path::Path;
use std::process::exit;
use tracing::{debug, error, Level};

use cli::{Args, Commands};
use commands::{command_check, command_config, command_generate_snapshot, command_test};
use config::{render_config, resolve_config, Config, DEFAULT_LOG_LEVEL};
use process::{JsonSnapshot, ProcSnapshot, SnapshotSource};

const PROC_ROOT: &str = "/proc";

/// Initializes tracing logging on stderr; stdout carries the check result.
fn setup_logging(config: &Config) {
    let level = match config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL) {
        "off" => return,
        "error" => Level::ERROR,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    debug!("Logging initialized with level: {}", level);
}

/// Prints the UNKNOWN status line and exits.
fn fail(reason: impl std::fmt::Display) -> ! {
    println!("{}", unknown_line(reason));
    exit(UNKNOWN_EXIT_CODE);
}

fn snapshot_source(config: &Config) -> Box<dyn SnapshotSource> {
    match &config.snapshot_file {
        Some(path) => Box::new(JsonSnapshot::new(path)),
        None => Box::new(ProcSnapshot::new(PROC_ROOT)),
    }
}

/// Main application entry point.
fn main() {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(c) => c,
        Err(e) => fail(format!("{:#}", e)),
    };
    setup_logging(&config);

    if args.show_config {
        match render_config(&config, &args.config_format) {
            Ok(output) => {
                println!("{output}");
                exit(0);
            }
            Err(e) => fail(format!("{:#}", e)),
        }
    }

    // Subcommands that need no filter validation
    match &args.command {
        Some(Commands::Config {
            output,
            format,
            commented,
        }) => {
            if let Err(e) = command_config(output.clone(), format.clone(), *commented) {
                fail(format!("{:#}", e));
            }
            exit(0);
        }
        Some(Commands::GenerateSnapshot {
            output,
            processes,
            max_threads,
        }) => {
            if let Err(e) = command_generate_snapshot(output.clone(), *processes, *max_threads) {
                fail(format!("{:#}", e));
            }
            exit(0);
        }
        Some(Commands::CheckRequirements) => {
            println!("🔍 Checking Runtime Requirements");
            println!("================================\n");
            match startup_checks::validate_requirements(Path::new(PROC_ROOT)) {
                Ok(_) => {
                    println!("\n✅ All requirements met");
                    exit(0);
                }
                Err(e) => {
                    eprintln!("\n❌ Requirements check failed: {}", e);
                    exit(1);
                }
            }
        }
        _ => {}
    }

    // Fail fast: nothing is evaluated with an invalid configuration
    let check_config = match config.to_check_config(Some(std::process::id())) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration invalid: {}", e);
            fail(e);
        }
    };

    if args.check_config {
        println!("✅ Configuration is valid");
        exit(0);
    }

    let source = snapshot_source(&config);

    if let Some(Commands::Test {
        verbose,
        matching_only,
    }) = &args.command
    {
        if let Err(e) = command_test(&check_config, source.as_ref(), *verbose, *matching_only) {
            fail(format!("{:#}", e));
        }
        exit(0);
    }

    match command_check(&check_config, source.as_ref(), args.output) {
        Ok(severity) => exit(severity.exit_code()),
        Err(e) => {
            error!("Snapshot unavailable: {:#}", e);
            fail(format!("{:#}", e));
        }
    }
}
