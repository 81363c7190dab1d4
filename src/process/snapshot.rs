//! Snapshot sources and the recorded snapshot file format.

use anyhow::{bail, Context};
use herakles_check_procs::ProcessRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SNAPSHOT_VERSION: &str = "1";

/// Yields the records of one evaluation, process or thread granularity.
pub trait SnapshotSource {
    fn snapshot(&self, threads: bool) -> anyhow::Result<Vec<ProcessRecord>>;
}

/// Root structure for snapshot JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub version: String,
    pub generated_at: String,
    /// True if `records` are thread records.
    #[serde(default)]
    pub threads: bool,
    pub records: Vec<ProcessRecord>,
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot_file(path: &Path) -> anyhow::Result<SnapshotFile> {
    debug!("Loading snapshot from: {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    let snapshot: SnapshotFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot file {}", path.display()))?;

    info!(
        "Loaded snapshot version {} from {} ({} records)",
        snapshot.version,
        snapshot.generated_at,
        snapshot.records.len()
    );
    Ok(snapshot)
}

/// Snapshot source backed by a recorded JSON file.
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for JsonSnapshot {
    fn snapshot(&self, threads: bool) -> anyhow::Result<Vec<ProcessRecord>> {
        let file = load_snapshot_file(&self.path)?;
        if threads && !file.threads {
            bail!(
                "Thread mode requested but {} contains process records only",
                self.path.display()
            );
        }
        if !threads && file.threads {
            debug!("Snapshot holds thread records, evaluating them without deduplication");
        }
        Ok(file.records)
    }
}
