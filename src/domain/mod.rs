//! Module for the types defining the movement domain.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

mod identity;
mod transaction;

pub use identity::{IdWidth, TxId, derive_id};
pub use transaction::{Processed, TransactionRecord};

pub type Money = Decimal;

/// Where a file lives inside the content source, e.g. a path or an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Location {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The files to process in one invocation, in the order they are to be processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub locations: Vec<Location>,
}

impl TriggerEvent {
    pub fn new(locations: impl IntoIterator<Item = impl Into<Location>>) -> Self {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Tally of one file-processing run.
///
/// Every raw line counts towards `total_lines` and towards exactly one of the other three
/// counters, so `success_count + error_count + skipped_count == total_lines` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub total_lines: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

impl RunStatistics {
    pub(crate) fn record_success(&mut self) {
        self.total_lines += 1;
        self.success_count += 1;
    }

    pub(crate) fn record_error(&mut self) {
        self.total_lines += 1;
        self.error_count += 1;
    }

    pub(crate) fn record_skip(&mut self) {
        self.total_lines += 1;
        self.skipped_count += 1;
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total lines: {}, success: {}, errors: {}, skipped: {}",
            self.total_lines, self.success_count, self.error_count, self.skipped_count
        )
    }
}
