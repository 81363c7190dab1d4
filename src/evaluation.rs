//! Single-pass evaluation of a snapshot against a check configuration.

use crate::dedup::ThreadDeduplicator;
use crate::filter::FilterSet;
use crate::record::ProcessRecord;
use crate::threshold::{Severity, Thresholds};
use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

/// Immutable configuration for one check run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckConfig {
    pub filters: FilterSet,
    pub thresholds: Thresholds,
    /// Records are threads; deduplicate them per process.
    pub thread_mode: bool,
    /// Pid of the running check, excluded from the count.
    #[serde(skip)]
    pub self_pid: Option<u32>,
}

/// Final state of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    /// Distinct processes passing the filter set.
    pub passing: usize,
    /// Records fed into the filter (self excluded).
    pub examined: usize,
    pub severity: Severity,
    /// Most recent start time among the processes that pass.
    pub last_start: Option<DateTime<Utc>>,
}

/// Runs the filter over every record, deduplicates and classifies the count.
pub fn evaluate_snapshot<'a, I>(records: I, config: &CheckConfig) -> CheckOutcome
where
    I: IntoIterator<Item = &'a ProcessRecord>,
{
    let mut dedup = ThreadDeduplicator::new(config.thread_mode);
    let mut examined = 0;
    // Newest start time seen on a passing record, per pid
    let mut starts: HashMap<u32, DateTime<Utc>> = HashMap::new();

    for record in records {
        if config.self_pid == Some(record.pid) {
            trace!("Skipping own pid {}", record.pid);
            continue;
        }
        examined += 1;

        let passed = config.filters.matches(record);
        debug!(
            "pid {} ({}) {}",
            record.pid,
            record.command_name,
            if passed { "matches" } else { "does not match" }
        );
        dedup.observe(record.pid, passed);
        if let (true, Some(start)) = (passed, record.start_time) {
            let newest = starts.entry(record.pid).or_insert(start);
            if start > *newest {
                *newest = start;
            }
        }
    }

    // Vetoed processes do not contribute a start time
    let last_start = starts
        .into_iter()
        .filter(|(pid, _)| dedup.is_counted(*pid))
        .map(|(_, start)| start)
        .max();
    let passing = dedup.finish();
    let severity = config.thresholds.evaluate(passing);
    debug!(
        "Evaluated {} records: {} passing processes, severity {}",
        examined, passing, severity
    );

    CheckOutcome {
        passing,
        examined,
        severity,
        last_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StatusLetters;
    use crate::record::ProcessStatus;
    use crate::threshold::ThresholdBand;
    use chrono::TimeZone;

    fn record(pid: u32, name: &str, status: ProcessStatus) -> ProcessRecord {
        ProcessRecord::new(pid, name, status)
    }

    #[test]
    fn test_empty_snapshot() {
        let outcome = evaluate_snapshot(std::iter::empty(), &CheckConfig::default());
        assert_eq!(outcome.passing, 0);
        assert_eq!(outcome.examined, 0);
        assert_eq!(outcome.severity, Severity::Ok);
        assert!(outcome.last_start.is_none());
    }

    #[test]
    fn test_self_pid_is_excluded() {
        let records = vec![
            record(100, "check", ProcessStatus::Running),
            record(101, "bash", ProcessStatus::Sleeping),
        ];
        let config = CheckConfig {
            self_pid: Some(100),
            ..Default::default()
        };
        let outcome = evaluate_snapshot(&records, &config);
        assert_eq!(outcome.passing, 1);
        assert_eq!(outcome.examined, 1);
    }

    #[test]
    fn test_last_start_is_newest_passing_start() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        // Newest process first: snapshot order must not decide
        let records = vec![
            record(2, "nginx", ProcessStatus::Sleeping).with_start_time(late),
            record(1, "nginx", ProcessStatus::Sleeping).with_start_time(early),
            record(3, "cron", ProcessStatus::Sleeping)
                .with_start_time(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
        ];
        let config = CheckConfig {
            filters: FilterSet {
                command: Some("nginx".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let outcome = evaluate_snapshot(&records, &config);
        assert_eq!(outcome.passing, 2);
        assert_eq!(outcome.last_start, Some(late));
    }

    #[test]
    fn test_vetoed_process_gives_no_start_time() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let records = vec![
            record(1, "worker", ProcessStatus::Running).with_start_time(jan),
            record(2, "worker", ProcessStatus::Running).with_start_time(mar),
            record(2, "worker", ProcessStatus::Stopped).with_start_time(mar),
        ];
        let config = CheckConfig {
            filters: FilterSet {
                status_in: Some(StatusLetters::parse("R").unwrap()),
                ..Default::default()
            },
            thread_mode: true,
            ..Default::default()
        };
        let outcome = evaluate_snapshot(&records, &config);
        assert_eq!(outcome.passing, 1);
        assert_eq!(outcome.last_start, Some(jan));
    }

    #[test]
    fn test_thread_mode_veto_flows_into_severity() {
        let records = vec![
            record(10, "worker", ProcessStatus::Running),
            record(10, "worker", ProcessStatus::Stopped),
            record(11, "worker", ProcessStatus::Running),
        ];
        let config = CheckConfig {
            filters: FilterSet {
                status_in: Some(StatusLetters::parse("R").unwrap()),
                ..Default::default()
            },
            thresholds: Thresholds::new(None, Some(ThresholdBand::new(None, Some(1)))).unwrap(),
            thread_mode: true,
            self_pid: None,
        };
        let outcome = evaluate_snapshot(&records, &config);
        assert_eq!(outcome.passing, 1);
        assert_eq!(outcome.examined, 3);
        assert_eq!(outcome.severity, Severity::Critical);
    }
}
