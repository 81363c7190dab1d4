//! Per-process deduplication of thread-granularity match outcomes.
//!
//! In thread mode a process counts as passing only if every one of its thread
//! records passes the filter set. The first failing thread vetoes the process
//! for the rest of the pass, whatever order the records arrive in.

use ahash::AHashMap as HashMap;
use tracing::trace;

/// Verdict for a process seen during the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidState {
    Good,
    /// Sticky: a vetoed process never returns to `Good`.
    Bad,
}

/// Bookkeeping for one distinct pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidAggregate {
    pub pid: u32,
    pub match_count: u32,
    pub state: PidState,
}

/// Folds per-record filter outcomes into a passing-process count.
///
/// Constructed with `thread_mode = false` it is a plain running counter and
/// keeps no per-pid state.
#[derive(Debug, Default)]
pub struct ThreadDeduplicator {
    thread_mode: bool,
    passing: usize,
    pids: HashMap<u32, PidAggregate>,
}

impl ThreadDeduplicator {
    pub fn new(thread_mode: bool) -> Self {
        Self {
            thread_mode,
            passing: 0,
            pids: HashMap::new(),
        }
    }

    /// Records the filter outcome of one record belonging to `pid`.
    pub fn observe(&mut self, pid: u32, passed: bool) {
        if !self.thread_mode {
            if passed {
                self.passing += 1;
            }
            return;
        }

        match (self.pids.get_mut(&pid), passed) {
            (None, passed) => {
                let state = if passed { PidState::Good } else { PidState::Bad };
                self.pids.insert(
                    pid,
                    PidAggregate {
                        pid,
                        match_count: 1,
                        state,
                    },
                );
                if passed {
                    self.passing += 1;
                }
                trace!("pid {} first seen, state {:?}", pid, state);
            }
            (Some(entry), true) => {
                if entry.state == PidState::Good {
                    entry.match_count += 1;
                }
            }
            (Some(entry), false) => {
                if entry.state == PidState::Good {
                    entry.state = PidState::Bad;
                    self.passing -= 1;
                    trace!("pid {} vetoed after {} matching threads", pid, entry.match_count);
                }
            }
        }
    }

    /// Number of distinct processes currently counted as passing.
    pub fn passing_count(&self) -> usize {
        self.passing
    }

    pub fn is_thread_mode(&self) -> bool {
        self.thread_mode
    }

    pub fn aggregate(&self, pid: u32) -> Option<&PidAggregate> {
        self.pids.get(&pid)
    }

    /// True unless a thread of `pid` failed the filters. Outside thread mode
    /// there is no veto, so every pid counts.
    pub fn is_counted(&self, pid: u32) -> bool {
        !self.thread_mode
            || self
                .pids
                .get(&pid)
                .is_some_and(|entry| entry.state == PidState::Good)
    }

    /// Number of distinct pids tracked (always 0 outside thread mode).
    pub fn tracked_pids(&self) -> usize {
        self.pids.len()
    }

    /// Consumes the deduplicator, discarding the per-pid index.
    pub fn finish(self) -> usize {
        self.passing
    }
}
