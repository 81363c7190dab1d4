//! Process and thread records as delivered by a snapshot source.
//!
//! A record describes either a whole process or one of its threads. Thread
//! records carry the owning process's pid, command and arguments plus a
//! `thread_wait_state` token naming what the thread is blocked on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling state of a process, reduced to the classes the status filters know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessStatus {
    /// Process being created by fork.
    Forking,
    /// Currently runnable.
    Running,
    /// Sleeping on an address.
    Sleeping,
    /// Stopped for debugging or suspended.
    Stopped,
    /// Awaiting collection by its parent.
    Zombie,
    /// Waiting for an interrupt.
    Waiting,
    /// Blocked on a lock.
    LockBlocked,
}

impl ProcessStatus {
    /// All statuses, in letter order `FRDTZWL`.
    pub const ALL: [ProcessStatus; 7] = [
        ProcessStatus::Forking,
        ProcessStatus::Running,
        ProcessStatus::Sleeping,
        ProcessStatus::Stopped,
        ProcessStatus::Zombie,
        ProcessStatus::Waiting,
        ProcessStatus::LockBlocked,
    ];

    /// Single-letter class used by the `status-in` / `status-not-in` filters.
    pub fn letter(self) -> char {
        match self {
            ProcessStatus::Forking => 'F',
            ProcessStatus::Running => 'R',
            ProcessStatus::Sleeping => 'D',
            ProcessStatus::Stopped => 'T',
            ProcessStatus::Zombie => 'Z',
            ProcessStatus::Waiting => 'W',
            ProcessStatus::LockBlocked => 'L',
        }
    }
}

/// One entry of a process or thread snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    /// Base executable name (basename of argv[0], or the kernel's short name).
    pub command_name: String,
    /// Full argument vector including argv[0]; empty when unavailable (kernel threads).
    #[serde(default)]
    pub arguments: Vec<String>,
    pub status: ProcessStatus,
    /// Wait channel token; only present on thread records.
    #[serde(default)]
    pub thread_wait_state: Option<String>,
    pub owner: String,
    /// Used for display only.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

impl ProcessRecord {
    /// Creates a process-granularity record with no arguments and no start time.
    pub fn new(pid: u32, command_name: impl Into<String>, status: ProcessStatus) -> Self {
        Self {
            pid,
            command_name: command_name.into(),
            arguments: Vec::new(),
            status,
            thread_wait_state: None,
            owner: String::new(),
            start_time: None,
        }
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_wait_state(mut self, wait_state: impl Into<String>) -> Self {
        self.thread_wait_state = Some(wait_state.into());
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Arguments after argv[0].
    pub fn trailing_arguments(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }
}
