//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config, DEFAULT_LOG_LEVEL};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> anyhow::Result<()> {
    let config = Config {
        log_level: Some(DEFAULT_LOG_LEVEL.into()),
        threads: Some(false),
        ..Default::default()
    };
    let output = output.unwrap_or_else(|| PathBuf::from("herakles-check-procs.yaml"));

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Herakles Process Check Configuration
# ====================================
#
# Filters (all configured filters must match)
# -------------------------------------------
# command: "sshd"              # Exact command name
# argument: "--config"         # Substring of any argument after argv[0]
# status: "RD"                 # Process status in [F R D T Z W L]
# not_status: "Z"              # Process status not in [F R D T Z W L]
# thread_status: "l"           # Thread wait state in [l=uwrlck w=uwait]
# not_thread_status: "w"       # Thread wait state not in [l w]
# pid: 1                       # Exact pid
# user: "root"                 # Owning user name
#
# Limits ("upper:lower", either side may be empty)
# ------------------------------------------------
# warning: "10:1"              # WARNING at >= 10 or <= 1 matching processes
# critical: "20:0"             # CRITICAL at >= 20 or <= 0 matching processes
#
# Mode
# ----
# threads: false               # Count a process only if all its threads match
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace
#
# Snapshot
# --------
# snapshot_file: null          # Read records from a JSON snapshot instead of /proc
"#;

    format!("{comments}\n{yaml}")
}
