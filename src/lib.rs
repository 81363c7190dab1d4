//! Herakles Process Check Library
//!
//! This library provides the evaluation core of the `herakles-check-procs`
//! monitoring check. It is independent of how process snapshots are obtained,
//! so it can be driven from `/proc`, a recorded snapshot, or a test fixture.
//!
//! # Features
//!
//! - **Composable Filters**: command, argument substring, process status,
//!   thread wait state, pid and user, combined with logical AND
//! - **Thread Mode**: a process counts only if every one of its threads matches;
//!   one failing thread vetoes the whole process
//! - **Two-Sided Thresholds**: warning and critical bands that trigger on too
//!   many as well as too few matching processes
//!
//! # Usage
//!
//! ```rust
//! use herakles_check_procs::{
//!     evaluate_snapshot, CheckConfig, FilterSet, ProcessRecord, ProcessStatus, Severity,
//!     ThresholdBand, Thresholds,
//! };
//!
//! let records = vec![
//!     ProcessRecord::new(101, "sshd", ProcessStatus::Sleeping),
//!     ProcessRecord::new(102, "cron", ProcessStatus::Sleeping),
//! ];
//!
//! let config = CheckConfig {
//!     filters: FilterSet {
//!         command: Some("sshd".to_string()),
//!         ..Default::default()
//!     },
//!     thresholds: Thresholds::new(
//!         Some(ThresholdBand::new(Some(3), Some(0))),
//!         Some(ThresholdBand::new(Some(5), Some(0))),
//!     )
//!     .unwrap(),
//!     ..Default::default()
//! };
//!
//! let outcome = evaluate_snapshot(&records, &config);
//! assert_eq!(outcome.passing, 1);
//! assert_eq!(outcome.severity, Severity::Ok);
//! ```

pub mod dedup;
pub mod error;
pub mod evaluation;
pub mod filter;
pub mod record;
pub mod report;
pub mod threshold;

// Re-export main types for convenience
pub use dedup::{PidAggregate, PidState, ThreadDeduplicator};
pub use error::ConfigError;
pub use evaluation::{evaluate_snapshot, CheckConfig, CheckOutcome};
pub use filter::{matches, FilterCheck, FilterKind, FilterSet, StatusLetters, ThreadStateLetters};
pub use record::{ProcessRecord, ProcessStatus};
pub use report::{format_recency, status_line, unknown_line, CheckReport, UNKNOWN_EXIT_CODE};
pub use threshold::{evaluate, Severity, ThresholdBand, Thresholds};
