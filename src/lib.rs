mod config;
mod domain;
mod engine;
mod error;
mod input;
mod output;
mod ports;
mod summary;
mod telemetry;

pub use config::Config;
pub use domain::{
    IdWidth, Location, Money, Processed, RunStatistics, TransactionRecord, TriggerEvent, TxId,
    derive_id,
};
pub use engine::{Cancellation, FileOutcome, FileReport, process_event, process_file};
pub use error::{
    ConfigError, FileError, LineError, LineFailure, SinkError, SourceError, SummaryError,
};
pub use input::{ParsedFields, ValidatedLine, parse_line, split_fields, split_lines};
pub use output::{AttributeValue, CsvRecordSink, Item, to_item};
pub use ports::{
    ContentSource, FsContentSource, MemoryContentSource, MemoryRecordSink, RecordSink,
};
pub use summary::{MovementSummary, SummaryFilter};
pub use telemetry::{LogFormat, setup_logging};

/// Ingests movement files into a record sink.
///
/// Every file is a list of `owner,YYYY-MM-DD,amount` lines. Each accepted line becomes a
/// [`TransactionRecord`] whose id is derived from its date, amount and line number, so
/// re-processing an unchanged file rewrites the same keys.
///
/// # Error handling
///
/// Not every line in a file may be valid. Instead of aborting on the first bad line, each
/// rejected line (and each record the sink refuses) is reported to the caller-supplied
/// `on_error` callback and processing continues. Only a file whose content cannot be read is
/// aborted as a whole.
///
/// Use [`process_event`] to be able to cancel the run, or [`process_file`] for a single file.
///
/// # Example
///
/// ```no_run
/// use movement_ingest::{Config, CsvRecordSink, FsContentSource, TriggerEvent, ingest};
///
/// let source = FsContentSource::new("incoming");
/// let sink = CsvRecordSink::new(std::io::stdout());
/// let event = TriggerEvent::new(["movements.csv"]);
///
/// let reports = ingest(&source, &sink, &event, &Config::default(), |location, failure| {
///     eprintln!("{location}: {failure}")
/// });
/// for report in reports {
///     println!("{}: {:?}", report.location, report.outcome);
/// }
/// ```
pub fn ingest<S, K>(
    source: &S,
    sink: &K,
    event: &TriggerEvent,
    config: &Config,
    on_error: impl Fn(&Location, LineFailure) + Sync,
) -> Vec<FileReport>
where
    S: ContentSource + Sync,
    K: RecordSink + Sync,
{
    process_event(source, sink, event, config, &Cancellation::new(), on_error)
}
