//! Configuration errors.
//!
//! Every variant is fatal and detected before the first record is evaluated.
//! The evaluation core itself has no error path.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{flag} threshold '{value}' is not correct, expected [upper:lower]")]
    MalformedBand { flag: &'static str, value: String },

    #[error("{flag} threshold is not correct: upper value ({upper}) < lower value ({lower})")]
    InvertedBand {
        flag: &'static str,
        upper: usize,
        lower: usize,
    },

    #[error("{side} value for warning ({warn}) lies outside {side} value for critical ({critical})")]
    InconsistentBands {
        side: &'static str,
        warn: usize,
        critical: usize,
    },

    #[error("status argument '{0}' is not valid, it can only contain [F | R | D | T | Z | W | L]")]
    InvalidStatusLetters(String),

    #[error("thread state argument '{0}' is not valid, it can only contain [l | w]")]
    InvalidThreadStateLetters(String),

    #[error("{field} is too long ({len} > {max} characters)")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvertedBand {
            flag: "warning",
            upper: 1,
            lower: 5,
        };
        assert_eq!(
            err.to_string(),
            "warning threshold is not correct: upper value (1) < lower value (5)"
        );

        let err = ConfigError::TooLong {
            field: "user",
            len: 120,
            max: 100,
        };
        assert_eq!(err.to_string(), "user is too long (120 > 100 characters)");
    }
}
