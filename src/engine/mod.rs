//! Module for the core logic of the engine: turning the lines of one file into persisted records

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, info_span, trace, warn};

use crate::{
    config::Config,
    domain::{IdWidth, Location, RunStatistics, TransactionRecord, TxId, derive_id},
    error::{FileError, LineError, LineFailure, SourceError},
    input::{self, ValidatedLine},
    ports::{ContentSource, RecordSink},
};

mod orchestration;


pub use orchestration::{FileOutcome, FileReport, process_event};

/// Flag through which the host asks a running invocation to stop.
///
/// It is checked before every line, so a record write is never interrupted halfway.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

///
/// Processes the file at `location`: every accepted line is written to `sink`, every rejected one is
/// counted and reported to `on_error`. Returns the tally of the run.
///
/// Only a failure of the content source aborts the file; it happens before any line is parsed.
///
pub fn process_file<S, K>(
    source: &S,
    sink: &K,
    location: &Location,
    config: &Config,
    cancel: &Cancellation,
    on_error: impl FnMut(LineFailure),
) -> Result<RunStatistics, FileError>
where
    S: ContentSource,
    K: RecordSink,
{
    let _span = info_span!("file", %location).entered();

    let result = fetch_content(source, location)
        .map_err(FileError::from)
        .and_then(|content| process_lines(&content, sink, config.id_width, cancel, on_error));

    match &result {
        Ok(stats) => info!(
            total_lines = stats.total_lines,
            success = stats.success_count,
            errors = stats.error_count,
            skipped = stats.skipped_count,
            "file processed"
        ),
        Err(FileError::Cancelled { partial }) => warn!(
            total_lines = partial.total_lines,
            success = partial.success_count,
            errors = partial.error_count,
            skipped = partial.skipped_count,
            "file processing cancelled"
        ),
        Err(err) => {
            let partial = RunStatistics::default();
            error!(
                error = %err,
                total_lines = partial.total_lines,
                success = partial.success_count,
                errors = partial.error_count,
                skipped = partial.skipped_count,
                "file aborted before any line was processed"
            )
        }
    }

    result
}

/// Reads the whole file, so that a read failure is detected before the first line is handled.
fn fetch_content<S: ContentSource>(
    source: &S,
    location: &Location,
) -> Result<Vec<u8>, SourceError> {
    let mut stream = source.fetch(location)?;
    let mut content = Vec::new();
    stream
        .read_to_end(&mut content)
        .map_err(|err| SourceError::from_io(location, err))?;
    debug!(bytes = content.len(), "content fetched");
    Ok(content)
}

fn process_lines(
    content: &[u8],
    sink: &impl RecordSink,
    id_width: IdWidth,
    cancel: &Cancellation,
    mut on_error: impl FnMut(LineFailure),
) -> Result<RunStatistics, FileError> {
    let mut stats = RunStatistics::default();

    for (ordinal, raw) in input::split_lines(content) {
        if cancel.is_cancelled() {
            return Err(FileError::Cancelled { partial: stats });
        }

        match process_line(raw, ordinal, sink, id_width) {
            Ok(Some(id)) => {
                trace!(ordinal, %id, "record persisted");
                stats.record_success();
            }
            Ok(None) => {
                trace!(ordinal, "blank line skipped");
                stats.record_skip();
            }
            Err(error) => {
                stats.record_error();
                on_error(LineFailure { ordinal, error });
            }
        }
    }

    Ok(stats)
}

/// Runs one line through parsing, identity derivation, record assembly and the sink.
/// Returns `Ok(None)` for a blank line.
fn process_line(
    raw: &[u8],
    ordinal: usize,
    sink: &impl RecordSink,
    id_width: IdWidth,
) -> Result<Option<TxId>, LineError> {
    let line = input::decode_line(raw)?;
    trace!(ordinal, line, "processing line");

    let Some(ValidatedLine {
        fields,
        date,
        amount,
    }) = input::parse_line(line)?
    else {
        return Ok(None);
    };

    let id = derive_id(fields.date_text, fields.amount_text, ordinal, id_width);
    let record = TransactionRecord::build(id, fields.owner_ref, date, amount);
    sink.put(&record)?;

    Ok(Some(record.id().clone()))
}
