//! Process scanning utilities for building snapshots from /proc.
//!
//! Processes that exit while the scan is running are skipped; only a failure
//! to list the /proc root itself is reported as an error.

use ahash::AHashMap as HashMap;
use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use herakles_check_procs::ProcessRecord;
use nix::unistd::{Uid, User};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::process::snapshot::SnapshotSource;
use crate::process::stat::{
    command_from_argv0, parse_boot_time, parse_cmdline, parse_stat, parse_status_uid,
    status_from_state, wait_state_from_wchan, CLK_TCK,
};

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Scans a /proc-like directory for entries with numeric names.
pub fn collect_proc_entries(root: &Path) -> anyhow::Result<Vec<ProcEntry>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("Cannot read process table at {}", root.display()))?;

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let p = entry.path();
        let pid: u32 = match p.file_name().and_then(|s| s.to_str()).map(str::parse) {
            Some(Ok(v)) => v,
            _ => continue,
        };
        out.push(ProcEntry { pid, proc_path: p });
    }
    out.sort_by_key(|e| e.pid);
    Ok(out)
}

/// Snapshot source reading the live /proc filesystem.
pub struct ProcSnapshot {
    root: PathBuf,
}

impl ProcSnapshot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn boot_time(&self) -> Option<i64> {
        let content = fs::read_to_string(self.root.join("stat")).ok()?;
        parse_boot_time(&content)
    }
}

impl SnapshotSource for ProcSnapshot {
    fn snapshot(&self, threads: bool) -> anyhow::Result<Vec<ProcessRecord>> {
        let entries = collect_proc_entries(&self.root)?;
        let boot_time = self.boot_time();
        let mut owners = OwnerCache::default();
        let mut records = Vec::with_capacity(entries.len());

        for entry in &entries {
            let Some(process) = read_process(entry, boot_time, &mut owners) else {
                debug!("Process {} vanished during scan", entry.pid);
                continue;
            };

            if !threads {
                records.push(process);
                continue;
            }

            let tasks = match collect_proc_entries(&entry.proc_path.join("task")) {
                Ok(tasks) => tasks,
                Err(e) => {
                    debug!("No task list for pid {}: {}", entry.pid, e);
                    continue;
                }
            };
            for task in &tasks {
                if let Some(thread) = read_thread(&process, &task.proc_path) {
                    records.push(thread);
                }
            }
        }

        debug!(
            "Scanned {} processes, {} records from {}",
            entries.len(),
            records.len(),
            self.root.display()
        );
        Ok(records)
    }
}

/// Reads the process-level record for one /proc entry.
fn read_process(
    entry: &ProcEntry,
    boot_time: Option<i64>,
    owners: &mut OwnerCache,
) -> Option<ProcessRecord> {
    let stat = parse_stat(&fs::read_to_string(entry.proc_path.join("stat")).ok()?)?;

    let arguments = fs::read(entry.proc_path.join("cmdline"))
        .map(|c| parse_cmdline(&c))
        .unwrap_or_default();
    let command_name = arguments
        .first()
        .and_then(|argv0| command_from_argv0(argv0))
        .or_else(|| read_comm(&entry.proc_path))?;

    let owner = fs::read_to_string(entry.proc_path.join("status"))
        .ok()
        .and_then(|s| parse_status_uid(&s))
        .map(|uid| owners.name(uid))
        .unwrap_or_default();

    let start_time = boot_time.and_then(|boot| start_time_from_ticks(boot, stat.start_ticks));

    trace!("pid {} {} state {}", entry.pid, command_name, stat.state);
    Some(ProcessRecord {
        pid: entry.pid,
        command_name,
        arguments,
        status: status_from_state(stat.state),
        thread_wait_state: None,
        owner,
        start_time,
    })
}

/// Builds a thread record: process identity plus the thread's own state and wait channel.
fn read_thread(process: &ProcessRecord, task_path: &Path) -> Option<ProcessRecord> {
    let stat = parse_stat(&fs::read_to_string(task_path.join("stat")).ok()?)?;
    let wait_state = fs::read_to_string(task_path.join("wchan"))
        .map(|w| wait_state_from_wchan(&w))
        .unwrap_or_default();

    Some(ProcessRecord {
        status: status_from_state(stat.state),
        thread_wait_state: Some(wait_state),
        ..process.clone()
    })
}

fn read_comm(proc_path: &Path) -> Option<String> {
    let comm = fs::read_to_string(proc_path.join("comm")).ok()?;
    let t = comm.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn start_time_from_ticks(boot_time: i64, start_ticks: u64) -> Option<DateTime<Utc>> {
    let secs = boot_time + (start_ticks / *CLK_TCK) as i64;
    Utc.timestamp_opt(secs, 0).single()
}

/// Caches uid to user name lookups for one scan.
#[derive(Default)]
struct OwnerCache {
    names: HashMap<u32, String>,
}

impl OwnerCache {
    fn name(&mut self, uid: u32) -> String {
        self.names
            .entry(uid)
            .or_insert_with(|| match User::from_uid(Uid::from_raw(uid)) {
                Ok(Some(user)) => user.name,
                _ => uid.to_string(),
            })
            .clone()
    }
}
