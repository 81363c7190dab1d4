//! Integration tests for the check evaluation.
//!
//! These tests drive `evaluate_snapshot()` end to end with realistic
//! snapshots and verify the passing count, severity and exit code.

use chrono::{TimeZone, Utc};
use herakles_check_procs::{
    evaluate_snapshot, CheckConfig, FilterSet, ProcessRecord, ProcessStatus, Severity,
    StatusLetters, ThresholdBand, Thresholds,
};

/// Helper function to build a validated threshold pair.
fn thresholds(warn: (usize, usize), crit: (usize, usize)) -> Thresholds {
    Thresholds::new(
        Some(ThresholdBand::new(Some(warn.0), Some(warn.1))),
        Some(ThresholdBand::new(Some(crit.0), Some(crit.1))),
    )
    .expect("valid thresholds")
}

/// Helper function to create `n` sleeping processes with the given command.
fn processes(first_pid: u32, n: u32, command: &str) -> Vec<ProcessRecord> {
    (first_pid..first_pid + n)
        .map(|pid| {
            ProcessRecord::new(pid, command, ProcessStatus::Sleeping)
                .with_arguments([format!("/usr/sbin/{command}")])
                .with_owner("root")
        })
        .collect()
}

fn command_filter(command: &str) -> FilterSet {
    FilterSet {
        command: Some(command.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_scenario_a_two_sshd_is_ok() {
    let mut records = processes(100, 2, "sshd");
    records.extend(processes(200, 3, "cron"));
    assert_eq!(records.len(), 5);

    let config = CheckConfig {
        filters: command_filter("sshd"),
        thresholds: thresholds((3, 0), (5, 0)),
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 2);
    assert_eq!(outcome.severity, Severity::Ok);
    assert_eq!(outcome.severity.exit_code(), 0);
}

#[test]
fn test_scenario_b_six_is_warning() {
    let records = processes(100, 6, "httpd");
    let config = CheckConfig {
        filters: command_filter("httpd"),
        thresholds: thresholds((5, 0), (8, 0)),
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 6);
    assert_eq!(outcome.severity, Severity::Warning);
    assert_eq!(outcome.severity.exit_code(), 1);
}

#[test]
fn test_scenario_c_nine_is_critical() {
    let records = processes(100, 9, "httpd");
    let config = CheckConfig {
        filters: command_filter("httpd"),
        thresholds: thresholds((5, 0), (8, 0)),
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 9);
    assert_eq!(outcome.severity, Severity::Critical);
    assert_eq!(outcome.severity.exit_code(), 2);
}

#[test]
fn test_scenario_d_one_failing_thread_vetoes_process() {
    let running = |pid| ProcessRecord::new(pid, "java", ProcessStatus::Running);
    let stopped = |pid| ProcessRecord::new(pid, "java", ProcessStatus::Stopped);

    let config = CheckConfig {
        filters: FilterSet {
            status_in: Some(StatusLetters::parse("R").expect("valid letters")),
            ..Default::default()
        },
        thread_mode: true,
        ..Default::default()
    };

    // The failing thread in every position
    let orders = [
        vec![stopped(42), running(42), running(42)],
        vec![running(42), stopped(42), running(42)],
        vec![running(42), running(42), stopped(42)],
    ];
    for records in &orders {
        let outcome = evaluate_snapshot(records, &config);
        assert_eq!(outcome.passing, 0, "order {:?}", records);
        assert_eq!(outcome.examined, 3);
    }
}

#[test]
fn test_zero_matches_trigger_lower_bound() {
    let records = processes(100, 4, "cron");
    let config = CheckConfig {
        filters: command_filter("sshd"),
        thresholds: thresholds((10, 1), (20, 0)),
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 0);
    assert_eq!(outcome.severity, Severity::Critical);
}

#[test]
fn test_check_never_counts_itself() {
    let records = processes(100, 3, "check-procs");
    let config = CheckConfig {
        filters: command_filter("check-procs"),
        self_pid: Some(101),
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 2);
}

#[test]
fn test_filter_and_semantics_across_snapshot() {
    let records = vec![
        ProcessRecord::new(1, "postgres", ProcessStatus::Sleeping).with_owner("postgres"),
        ProcessRecord::new(2, "postgres", ProcessStatus::Sleeping).with_owner("root"),
        ProcessRecord::new(3, "postgres", ProcessStatus::Zombie).with_owner("postgres"),
    ];
    let config = CheckConfig {
        filters: FilterSet {
            command: Some("postgres".into()),
            user: Some("postgres".into()),
            status_not_in: Some(StatusLetters::parse("Z").expect("valid letters")),
            ..Default::default()
        },
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 1);
}

#[test]
fn test_recency_uses_newest_start_regardless_of_order() {
    let newer = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let records = vec![
        ProcessRecord::new(5, "nginx", ProcessStatus::Sleeping).with_start_time(newer),
        ProcessRecord::new(9, "nginx", ProcessStatus::Sleeping).with_start_time(older),
    ];
    let config = CheckConfig {
        filters: command_filter("nginx"),
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 2);
    assert_eq!(outcome.last_start, Some(newer));
}

#[test]
fn test_recency_ignores_vetoed_process() {
    let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mar = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let records = vec![
        ProcessRecord::new(1, "java", ProcessStatus::Running).with_start_time(jan),
        ProcessRecord::new(2, "java", ProcessStatus::Running).with_start_time(mar),
        ProcessRecord::new(2, "java", ProcessStatus::Stopped).with_start_time(mar),
    ];
    let config = CheckConfig {
        filters: FilterSet {
            status_in: Some(StatusLetters::parse("R").expect("valid letters")),
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
fn test_no_recency_when_only_vetoed_processes_started() {
    let mar = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let records = vec![
        ProcessRecord::new(3, "java", ProcessStatus::Running).with_start_time(mar),
        ProcessRecord::new(3, "java", ProcessStatus::Zombie).with_start_time(mar),
    ];
    let config = CheckConfig {
        filters: FilterSet {
            status_not_in: Some(StatusLetters::parse("Z").expect("valid letters")),
            ..Default::default()
        },
        thread_mode: true,
        ..Default::default()
    };

    let outcome = evaluate_snapshot(&records, &config);
    assert_eq!(outcome.passing, 0);
    assert!(outcome.last_start.is_none());
}
