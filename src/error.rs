// Copyright (c) 2024 Mike Tsao

//! The error type shared by every stage of the curve pipeline.

use thiserror::Error;

/// Everything that can go wrong while turning control points into a dense
/// curve. All of these are fatal: the run stops and nothing is written.
#[derive(Debug, Error)]
pub enum CurveError {
    /// A row is missing fields or has a non-numeric value or slope.
    #[error("line {line}: malformed row: {reason}")]
    RowFormat {
        /// 1-based line number, or 0 when the row wasn't read from a file.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// An interpolation mode or time signature that we don't recognize.
    #[error("unrecognized {what} \"{name}\"")]
    UnknownMode {
        /// The kind of name that failed to parse, such as "mode".
        what: &'static str,
        /// The offending text.
        name: String,
    },

    /// A segment doesn't have enough points (or slopes) for the mode.
    #[error("{mode} needs at least {required} points, but got {actual}")]
    InsufficientPoints {
        /// The mode that was asked to run.
        mode: String,
        /// How many qualifying points the mode needs.
        required: usize,
        /// How many it was given.
        actual: usize,
    },

    /// A position field that doesn't fit the timing grid.
    #[error("line {line}: malformed position \"{text}\": {reason}")]
    MalformedPosition {
        /// 1-based line number, or 0 when the row wasn't read from a file.
        line: usize,
        /// The position text as it appeared.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
impl CurveError {
    /// Returns the same error, tagged with the line it came from. Errors that
    /// don't carry a line number are returned unchanged.
    pub fn at_line(self, line_number: usize) -> Self {
        match self {
            CurveError::RowFormat { reason, .. } => CurveError::RowFormat {
                line: line_number,
                reason,
            },
            CurveError::MalformedPosition { text, reason, .. } => CurveError::MalformedPosition {
                line: line_number,
                text,
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn row_format(reason: impl Into<String>) -> Self {
        CurveError::RowFormat {
            line: 0,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_position(text: &str, reason: impl Into<String>) -> Self {
        CurveError::MalformedPosition {
            line: 0,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Shorthand for results in this crate.
pub type Result<T> = core::result::Result<T, CurveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_are_attached() {
        let e = CurveError::row_format("missing value").at_line(7);
        assert_eq!(e.to_string(), "line 7: malformed row: missing value");

        let e = CurveError::malformed_position("001,09,00", "beat out of range").at_line(2);
        assert!(matches!(e, CurveError::MalformedPosition { line: 2, .. }));
    }

    #[test]
    fn line_numbers_leave_other_errors_alone() {
        let e = CurveError::UnknownMode {
            what: "mode",
            name: "wobble".to_string(),
        }
        .at_line(3);
        assert_eq!(e.to_string(), "unrecognized mode \"wobble\"");
    }
}
