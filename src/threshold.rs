//! Two-sided warning/critical threshold classification.
//!
//! A band's `upper` and `lower` bounds are independent triggers, not a
//! tolerance interval: `upper` guards against too many matching processes,
//! `lower` against too few. Either side may be left disabled.
//!
//! # Usage
//!
//! ```rust
//! use herakles_check_procs::{Severity, ThresholdBand, Thresholds};
//!
//! let warn: ThresholdBand = "5:0".parse().unwrap();
//! let crit: ThresholdBand = "8:0".parse().unwrap();
//! let thresholds = Thresholds::new(Some(warn), Some(crit)).unwrap();
//!
//! assert_eq!(thresholds.evaluate(3), Severity::Ok);
//! assert_eq!(thresholds.evaluate(6), Severity::Warning);
//! assert_eq!(thresholds.evaluate(9), Severity::Critical);
//! ```

use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static BAND_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d*)\s*:\s*(\d*)\s*$").expect("valid band pattern"));

/// Check verdict, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl Severity {
    /// Monitoring plugin exit code.
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        })
    }
}

/// An `{upper, lower}` pair; each side triggers on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBand {
    #[serde(default)]
    pub upper: Option<usize>,
    #[serde(default)]
    pub lower: Option<usize>,
}

impl ThresholdBand {
    pub fn new(upper: Option<usize>, lower: Option<usize>) -> Self {
        Self { upper, lower }
    }

    /// True if `count` reaches the upper bound or falls to the lower bound.
    pub fn is_triggered(&self, count: usize) -> bool {
        self.upper.is_some_and(|upper| count >= upper)
            || self.lower.is_some_and(|lower| count <= lower)
    }

    /// Parses `upper:lower` for the named flag; either side may be empty.
    pub fn parse_for(flag: &'static str, value: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedBand {
            flag,
            value: value.to_string(),
        };
        let caps = BAND_PATTERN.captures(value).ok_or_else(malformed)?;
        let side = |idx: usize| -> Result<Option<usize>, ConfigError> {
            match caps.get(idx).map(|m| m.as_str()) {
                Some("") | None => Ok(None),
                Some(digits) => digits.parse().map(Some).map_err(|_| malformed()),
            }
        };
        let band = Self {
            upper: side(1)?,
            lower: side(2)?,
        };
        band.validate(flag)?;
        Ok(band)
    }

    fn validate(&self, flag: &'static str) -> Result<(), ConfigError> {
        if let (Some(upper), Some(lower)) = (self.upper, self.lower) {
            if upper < lower {
                return Err(ConfigError::InvertedBand { flag, upper, lower });
            }
        }
        Ok(())
    }
}

impl FromStr for ThresholdBand {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for("threshold", s)
    }
}

impl fmt::Display for ThresholdBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_default();
        write!(f, "{}:{}", side(self.upper), side(self.lower))
    }
}

/// Validated pair of optional warning and critical bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    warning: Option<ThresholdBand>,
    critical: Option<ThresholdBand>,
}

impl Thresholds {
    /// Validates band ordering and that the critical band encloses the warning band.
    pub fn new(
        warning: Option<ThresholdBand>,
        critical: Option<ThresholdBand>,
    ) -> Result<Self, ConfigError> {
        if let Some(w) = &warning {
            w.validate("warning")?;
        }
        if let Some(c) = &critical {
            c.validate("critical")?;
        }
        if let (Some(w), Some(c)) = (&warning, &critical) {
            if let (Some(warn), Some(critical)) = (w.upper, c.upper) {
                if warn > critical {
                    return Err(ConfigError::InconsistentBands {
                        side: "upper",
                        warn,
                        critical,
                    });
                }
            }
            if let (Some(warn), Some(critical)) = (w.lower, c.lower) {
                if warn < critical {
                    return Err(ConfigError::InconsistentBands {
                        side: "lower",
                        warn,
                        critical,
                    });
                }
            }
        }
        Ok(Self { warning, critical })
    }

    pub fn warning(&self) -> Option<&ThresholdBand> {
        self.warning.as_ref()
    }

    pub fn critical(&self) -> Option<&ThresholdBand> {
        self.critical.as_ref()
    }

    /// Classifies the passing count. Critical wins over warning on overlap.
    pub fn evaluate(&self, count: usize) -> Severity {
        if self.critical.is_some_and(|c| c.is_triggered(count)) {
            return Severity::Critical;
        }
        if self.warning.is_some_and(|w| w.is_triggered(count)) {
            return Severity::Warning;
        }
        Severity::Ok
    }
}

/// Free-function form of [`Thresholds::evaluate`].
pub fn evaluate(count: usize, thresholds: &Thresholds) -> Severity {
    thresholds.evaluate(count)
}
