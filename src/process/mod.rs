//! Snapshot enumeration for the check.
//!
//! This module provides:
//! - `stat`: Parsers for /proc/<pid>/{stat,cmdline,status} and /proc/stat
//! - `scanner`: Process and thread discovery from /proc
//! - `snapshot`: The `SnapshotSource` seam and recorded JSON snapshots

pub mod scanner;
pub mod snapshot;
pub mod stat;

// Re-export commonly used types
pub use scanner::ProcSnapshot;
pub use snapshot::{JsonSnapshot, SnapshotFile, SnapshotSource, SNAPSHOT_VERSION};
