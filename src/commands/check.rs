//! Check command implementation.
//!
//! Takes one snapshot, evaluates it and prints the plugin status line.

use chrono::Local;
use herakles_check_procs::{evaluate_snapshot, status_line, CheckConfig, CheckReport, Severity};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::process::SnapshotSource;

/// Runs the check and returns its severity. Snapshot failures are propagated.
pub fn command_check(
    config: &CheckConfig,
    source: &dyn SnapshotSource,
    output: OutputFormat,
) -> anyhow::Result<Severity> {
    let records = source.snapshot(config.thread_mode)?;
    debug!(
        "Snapshot holds {} {} records",
        records.len(),
        if config.thread_mode { "thread" } else { "process" }
    );

    let outcome = evaluate_snapshot(&records, config);
    let now = Local::now();

    match output {
        OutputFormat::Text => println!("{}", status_line(&outcome, &config.filters, &now)),
        OutputFormat::Json => {
            let report = CheckReport::new(&outcome, config, &now);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(outcome.severity)
}
