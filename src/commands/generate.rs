//! Generate snapshot command implementation.
//!
//! Writes a synthetic snapshot JSON file usable with `--snapshot-file`.

use chrono::{Duration, Utc};
use herakles_check_procs::{ProcessRecord, ProcessStatus};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::process::{SnapshotFile, SNAPSHOT_VERSION};

// Constants for snapshot generation ranges
const MAX_AGE_SECONDS: i64 = 30 * 24 * 3600; // 30 days
const FIRST_PID: u32 = 300;

const COMMANDS: [(&str, &str, &[&str]); 8] = [
    ("sshd", "root", &["-D"]),
    ("nginx", "www-data", &["-g", "daemon off;"]),
    ("postgres", "postgres", &["-D", "/var/lib/postgresql/data"]),
    ("redis-server", "redis", &["127.0.0.1:6379"]),
    ("java", "app", &["-Xmx2g", "-jar", "/opt/app/service.jar"]),
    ("cron", "root", &["-f"]),
    ("python3", "app", &["/opt/app/worker.py", "--queue=default"]),
    ("bash", "operator", &[]),
];

const WAIT_STATES: [&str; 5] = ["uwait", "uwrlck", "select", "nanslp", "kqread"];

/// Generates a synthetic snapshot file.
pub fn command_generate_snapshot(
    output: PathBuf,
    processes: usize,
    max_threads: usize,
) -> anyhow::Result<()> {
    debug!(
        "Generating snapshot: processes={}, max_threads={}, output={}",
        processes,
        max_threads,
        output.display()
    );

    let snapshot = generate_snapshot(&mut rand::thread_rng(), processes, max_threads);
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(&output, json)?;

    info!("Snapshot written with {} records", snapshot.records.len());
    println!(
        "✅ Snapshot with {} records written to: {}",
        snapshot.records.len(),
        output.display()
    );
    Ok(())
}

/// Builds the snapshot; with `max_threads > 1` every process yields 1..=max_threads thread records.
pub fn generate_snapshot<R: Rng>(rng: &mut R, processes: usize, max_threads: usize) -> SnapshotFile {
    let now = Utc::now();
    let threads = max_threads > 1;
    let mut records = Vec::new();

    for i in 0..processes {
        let (command, owner, args) = COMMANDS[rng.gen_range(0..COMMANDS.len())];
        let status = pick_status(rng);
        let start_time = now - Duration::seconds(rng.gen_range(0..MAX_AGE_SECONDS));

        let mut arguments = vec![format!("/usr/bin/{}", command)];
        arguments.extend(args.iter().map(|a| a.to_string()));

        let process = ProcessRecord {
            pid: FIRST_PID + i as u32,
            command_name: command.to_string(),
            arguments,
            status,
            thread_wait_state: None,
            owner: owner.to_string(),
            start_time: Some(start_time),
        };

        if !threads {
            records.push(process);
            continue;
        }

        for _ in 0..rng.gen_range(1..=max_threads) {
            let wait = WAIT_STATES.choose(rng).copied().unwrap_or("uwait");
            records.push(ProcessRecord {
                status: pick_status(rng),
                thread_wait_state: Some(wait.to_string()),
                ..process.clone()
            });
        }
    }

    SnapshotFile {
        version: SNAPSHOT_VERSION.to_string(),
        generated_at: now.to_rfc3339(),
        threads,
        records,
    }
}

/// Mostly sleeping processes, some running, the occasional odd state.
fn pick_status<R: Rng>(rng: &mut R) -> ProcessStatus {
    match rng.gen_range(0..100) {
        0..=69 => ProcessStatus::Sleeping,
        70..=89 => ProcessStatus::Running,
        90..=93 => ProcessStatus::Waiting,
        94..=96 => ProcessStatus::Stopped,
        97..=98 => ProcessStatus::Zombie,
        _ => ProcessStatus::LockBlocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_process_snapshot() {
        let mut rng = StdRng::seed_from_u64(7);
        let snapshot = generate_snapshot(&mut rng, 25, 1);
        assert!(!snapshot.threads);
        assert_eq!(snapshot.records.len(), 25);
        assert!(snapshot.records.iter().all(|r| r.thread_wait_state.is_none()));
        assert!(snapshot.records.iter().all(|r| r.start_time.is_some()));
    }

    #[test]
    fn test_generate_thread_snapshot() {
        let mut rng = StdRng::seed_from_u64(7);
        let snapshot = generate_snapshot(&mut rng, 10, 4);
        assert!(snapshot.threads);
        assert!(snapshot.records.len() >= 10);
        assert!(snapshot.records.len() <= 40);
        assert!(snapshot.records.iter().all(|r| r.thread_wait_state.is_some()));
    }

    #[test]
    fn test_command_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        command_generate_snapshot(path.clone(), 5, 1).unwrap();
        let loaded = crate::process::snapshot::load_snapshot_file(&path).unwrap();
        assert_eq!(loaded.records.len(), 5);
    }
}
