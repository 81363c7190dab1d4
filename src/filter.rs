//! Composable process/thread filter predicate.
//!
//! A [`FilterSet`] holds the operator's enabled filters. A filter that is not
//! configured (`None`) places no constraint on a record, so an empty set
//! matches everything. All configured filters combine with logical AND.

use crate::error::ConfigError;
use crate::record::{ProcessRecord, ProcessStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_STATUS_LEN: usize = 7;
pub const MAX_USERNAME_LEN: usize = 100;
pub const MAX_PATTERN_LEN: usize = 1000;

/// Wait channel prefixes recognised by the thread-state filters and their letters.
const THREAD_STATE_TOKENS: [(char, &str); 2] = [('l', "uwrlck"), ('w', "uwait")];

/// Validated set of process status letters (`FRDTZWL`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusLetters(String);

impl StatusLetters {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        if value.len() > MAX_STATUS_LEN {
            return Err(ConfigError::TooLong {
                field: "status",
                len: value.len(),
                max: MAX_STATUS_LEN,
            });
        }
        let valid = |c: char| ProcessStatus::ALL.iter().any(|s| s.letter() == c);
        if !value.chars().all(valid) {
            return Err(ConfigError::InvalidStatusLetters(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn contains(&self, status: ProcessStatus) -> bool {
        self.0.contains(status.letter())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StatusLetters {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StatusLetters> for String {
    fn from(letters: StatusLetters) -> Self {
        letters.0
    }
}

/// Validated set of thread wait-state letters (`l` = uwrlck, `w` = uwait).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThreadStateLetters(String);

impl ThreadStateLetters {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        if value.len() > MAX_STATUS_LEN {
            return Err(ConfigError::TooLong {
                field: "thread state",
                len: value.len(),
                max: MAX_STATUS_LEN,
            });
        }
        let valid = |c: char| THREAD_STATE_TOKENS.iter().any(|(l, _)| *l == c);
        if !value.chars().all(valid) {
            return Err(ConfigError::InvalidThreadStateLetters(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// True if the wait channel maps to a letter contained in this set.
    pub fn contains(&self, wait_state: Option<&str>) -> bool {
        wait_state
            .and_then(thread_state_letter)
            .is_some_and(|letter| self.0.contains(letter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ThreadStateLetters {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ThreadStateLetters> for String {
    fn from(letters: ThreadStateLetters) -> Self {
        letters.0
    }
}

/// Maps a wait channel token to its thread-state letter by prefix.
pub fn thread_state_letter(wait_state: &str) -> Option<char> {
    THREAD_STATE_TOKENS
        .iter()
        .find(|(_, token)| wait_state.starts_with(token))
        .map(|(letter, _)| *letter)
}

/// Identifies one filter of a [`FilterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    CommandEquals,
    ArgumentContains,
    StatusIn,
    StatusNotIn,
    ThreadStatusIn,
    ThreadStatusNotIn,
    PidEquals,
    UserEquals,
}

impl FilterKind {
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::CommandEquals => "command",
            FilterKind::ArgumentContains => "args_like",
            FilterKind::StatusIn => "status",
            FilterKind::StatusNotIn => "not_status",
            FilterKind::ThreadStatusIn => "thread_status",
            FilterKind::ThreadStatusNotIn => "not_thread_status",
            FilterKind::PidEquals => "pid",
            FilterKind::UserEquals => "user",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of checking a single enabled filter against a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCheck {
    pub kind: FilterKind,
    pub satisfied: bool,
}

/// Operator-selected filters. `None` means the filter is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_in: Option<StatusLetters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_not_in: Option<StatusLetters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_status_in: Option<ThreadStateLetters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_status_not_in: Option<ThreadStateLetters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl FilterSet {
    /// Checks the free-text filters against their length limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_len("command", self.command.as_deref(), MAX_PATTERN_LEN)?;
        check_len("argument", self.argument.as_deref(), MAX_PATTERN_LEN)?;
        check_len("user", self.user.as_deref(), MAX_USERNAME_LEN)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }

    /// Enabled filters with a printable form of their configured value.
    pub fn enabled(&self) -> Vec<(FilterKind, String)> {
        let mut out = Vec::new();
        if let Some(v) = &self.command {
            out.push((FilterKind::CommandEquals, v.clone()));
        }
        if let Some(v) = &self.argument {
            out.push((FilterKind::ArgumentContains, v.clone()));
        }
        if let Some(v) = &self.pid {
            out.push((FilterKind::PidEquals, v.to_string()));
        }
        if let Some(v) = &self.status_in {
            out.push((FilterKind::StatusIn, v.as_str().to_string()));
        }
        if let Some(v) = &self.status_not_in {
            out.push((FilterKind::StatusNotIn, v.as_str().to_string()));
        }
        if let Some(v) = &self.thread_status_in {
            out.push((FilterKind::ThreadStatusIn, v.as_str().to_string()));
        }
        if let Some(v) = &self.thread_status_not_in {
            out.push((FilterKind::ThreadStatusNotIn, v.as_str().to_string()));
        }
        if let Some(v) = &self.user {
            out.push((FilterKind::UserEquals, v.clone()));
        }
        out
    }

    /// Evaluates every enabled filter against the record.
    pub fn check(&self, record: &ProcessRecord) -> Vec<FilterCheck> {
        let mut checks = Vec::with_capacity(8);
        let mut push = |kind, satisfied| checks.push(FilterCheck { kind, satisfied });

        if let Some(command) = &self.command {
            push(FilterKind::CommandEquals, record.command_name == *command);
        }
        if let Some(needle) = &self.argument {
            let found = record
                .trailing_arguments()
                .iter()
                .any(|arg| arg.contains(needle.as_str()));
            push(FilterKind::ArgumentContains, found);
        }
        if let Some(letters) = &self.status_in {
            push(FilterKind::StatusIn, letters.contains(record.status));
        }
        if let Some(letters) = &self.status_not_in {
            push(FilterKind::StatusNotIn, !letters.contains(record.status));
        }
        let wait_state = record.thread_wait_state.as_deref();
        if let Some(letters) = &self.thread_status_in {
            push(FilterKind::ThreadStatusIn, letters.contains(wait_state));
        }
        if let Some(letters) = &self.thread_status_not_in {
            push(FilterKind::ThreadStatusNotIn, !letters.contains(wait_state));
        }
        if let Some(pid) = self.pid {
            push(FilterKind::PidEquals, record.pid == pid);
        }
        if let Some(user) = &self.user {
            push(FilterKind::UserEquals, record.owner == *user);
        }
        checks
    }

    /// True if the record satisfies every enabled filter.
    pub fn matches(&self, record: &ProcessRecord) -> bool {
        self.check(record).iter().all(|c| c.satisfied)
    }
}

/// Free-function form of [`FilterSet::matches`].
pub fn matches(record: &ProcessRecord, filters: &FilterSet) -> bool {
    filters.matches(record)
}

fn check_len(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ConfigError> {
    match value {
        Some(v) if v.len() > max => Err(ConfigError::TooLong {
            field,
            len: v.len(),
            max,
        }),
        _ => Ok(()),
    }
}
