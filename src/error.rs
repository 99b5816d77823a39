//! Module defining the errors which are exposed to the users of the crate

use crate::domain::{Location, Money, RunStatistics};

/// Number of comma-separated fields every movement line must have.
pub const EXPECTED_FIELDS: usize = 3;

/// Reasons a single line is rejected. These never abort the file: they are counted and reported
/// to the caller's error callback while processing continues with the next line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LineError {
    /// Wrong number of comma-separated fields
    #[error("malformed line: expected {expected} fields, got {actual}")]
    Malformed { expected: usize, actual: usize },

    /// The owner reference (first field) is empty
    #[error("empty owner reference")]
    EmptyOwnerRef,

    /// The date field is not a `YYYY-MM-DD` calendar date
    #[error("invalid date: {raw:?}")]
    InvalidDate { raw: String },

    /// The amount field is not a base-10 decimal number
    #[error("invalid amount: {raw:?}")]
    InvalidAmount { raw: String },

    /// The raw bytes of the line are not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidEncoding,

    /// The record sink did not store the record
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] SinkError),
}

/// A rejected line together with its 1-based ordinal inside the file.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("line {ordinal}: {error}")]
pub struct LineFailure {
    pub ordinal: usize,
    pub error: LineError,
}

/// Failures of the content source. Fatal to the file being read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{location} not found")]
    NotFound { location: Location },

    #[error("access to {location} denied")]
    AccessDenied { location: Location },

    #[error("failed reading {location}: {source}")]
    Io {
        location: Location,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Classifies an I/O error raised while fetching or reading `location`.
    pub(crate) fn from_io(location: &Location, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound {
                location: location.clone(),
            },
            std::io::ErrorKind::PermissionDenied => SourceError::AccessDenied {
                location: location.clone(),
            },
            _ => SourceError::Io {
                location: location.clone(),
                source: err,
            },
        }
    }
}

/// Failures reported by a record sink for a single write.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("throttled: {0}")]
    Throttled(String),
}

/// Outcome of a file that could not be processed to the end.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Processing was cancelled by the host; the tally covers the lines handled before that
    #[error("cancelled after {} lines", .partial.total_lines)]
    Cancelled { partial: RunStatistics },
}

/// Failures while aggregating records into a summary.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SummaryError {
    /// A running sum left the range of `Money`
    #[error("{total} + {amount} exceeds the representable range")]
    Overflow { total: Money, amount: Money },
}

/// Invalid configuration values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

pub(crate) fn invalid_value(
    var: &'static str,
    value: impl Into<String>,
    reason: impl Into<String>,
) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.into(),
        reason: reason.into(),
    }
}
