//! Module defining the collaborators the engine reads files from and writes records to.

use std::io::Read;

use crate::domain::{Location, TransactionRecord};
use crate::error::{SinkError, SourceError};

mod fs;
mod memory;

pub use fs::FsContentSource;
pub use memory::{MemoryContentSource, MemoryRecordSink};

/// Supplies the raw bytes of a file given its location.
pub trait ContentSource {
    type Stream: Read;

    /// Opens the file at `location`. Errors raised while reading the returned stream are
    /// reported by the engine as [`SourceError`]s as well.
    fn fetch(&self, location: &Location) -> Result<Self::Stream, SourceError>;
}

/// Durably stores records keyed by their id.
///
/// Writing the same record twice must be a harmless overwrite, so that a file can be
/// re-processed after a partial failure.
pub trait RecordSink {
    fn put(&self, record: &TransactionRecord) -> Result<(), SinkError>;
}
