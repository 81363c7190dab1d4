//! Status line and machine-readable report for a finished check.

use crate::evaluation::{CheckConfig, CheckOutcome};
use crate::filter::FilterSet;
use crate::threshold::{Severity, ThresholdBand};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::{Display, Write};

/// Exit code for configuration and snapshot failures.
pub const UNKNOWN_EXIT_CODE: i32 = 3;

const DAY_SECONDS: i64 = 24 * 3600;
const WEEK_SECONDS: i64 = 7 * DAY_SECONDS;

/// Renders how recently a process started, `ps` style.
///
/// Under 24 hours the time of day, under a week the weekday and hour,
/// otherwise the date.
pub fn format_recency<Tz>(start: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let age = now.clone().signed_duration_since(start.clone()).num_seconds();
    if age < DAY_SECONDS {
        start.format("%H:%M").to_string()
    } else if age < WEEK_SECONDS {
        start.format("%a %H").to_string()
    } else {
        start.format("%-d %b %y").to_string()
    }
}

/// One-line plugin output, e.g. `PROCS OK: 2 processes with command 'sshd'; last started 14:03`.
pub fn status_line<Tz>(outcome: &CheckOutcome, filters: &FilterSet, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut line = format!("PROCS {}: {} processes", outcome.severity, outcome.passing);

    let enabled = filters.enabled();
    if !enabled.is_empty() {
        let parts: Vec<String> = enabled
            .iter()
            .map(|(kind, value)| format!("{} '{}'", kind, value))
            .collect();
        let _ = write!(line, " with {}", parts.join(", "));
    }

    if outcome.passing > 0 {
        if let Some(start) = outcome.last_start {
            let start = start.with_timezone(&now.timezone());
            let _ = write!(line, "; last started {}", format_recency(&start, now));
        }
    }
    line
}

/// Output line for a check that could not run.
pub fn unknown_line(reason: impl Display) -> String {
    format!("PROCS UNKNOWN: {}", reason)
}

/// JSON form of a finished check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub severity: Severity,
    pub exit_code: i32,
    pub passing: usize,
    pub examined: usize,
    pub thread_mode: bool,
    pub filters: FilterSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ThresholdBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<ThresholdBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_start: Option<DateTime<Utc>>,
    pub message: String,
}

impl CheckReport {
    pub fn new<Tz>(outcome: &CheckOutcome, config: &CheckConfig, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            severity: outcome.severity,
            exit_code: outcome.severity.exit_code(),
            passing: outcome.passing,
            examined: outcome.examined,
            thread_mode: config.thread_mode,
            filters: config.filters.clone(),
            warning: config.thresholds.warning().copied(),
            critical: config.thresholds.critical().copied(),
            last_start: outcome.last_start,
            message: status_line(outcome, &config.filters, now),
        }
    }
}
