//! Module converting persisted records into the formats written at the sink boundary.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::domain::TransactionRecord;
use crate::error::SinkError;
use crate::ports::RecordSink;


/// Typed attribute of a schema-less key-value item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String attribute
    S(String),
    /// Number attribute, carried as decimal text
    N(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(value) | AttributeValue::N(value) => f.write_str(value),
        }
    }
}

/// A record flattened into attribute name / value pairs.
pub type Item = BTreeMap<&'static str, AttributeValue>;

/// Flattens a record into a key-value item, keyed by `id`.
pub fn to_item(record: &TransactionRecord) -> Item {
    BTreeMap::from([
        ("id", AttributeValue::S(record.id().to_string())),
        ("owner_ref", AttributeValue::S(record.owner_ref().to_string())),
        (
            "date",
            AttributeValue::S(record.date().format("%Y-%m-%d").to_string()),
        ),
        ("amount", AttributeValue::N(record.amount().to_string())),
        (
            "processed",
            AttributeValue::S(record.processed().as_str().to_string()),
        ),
    ])
}

/// Record sink writing one CSV row per record, with a header before the first one.
///
/// Every row is flushed before `put` returns, so a failed write is reported for the record that
/// caused it.
#[derive(Debug)]
pub struct CsvRecordSink<W: Write> {
    writer: Mutex<csv::Writer<W>>,
}

impl<W: Write> CsvRecordSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(csv::Writer::from_writer(writer)),
        }
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_inner()
            .map_err(|err| SinkError::Io(err.error().to_string()))
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn put(&self, record: &TransactionRecord) -> Result<(), SinkError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Io("CSV writer poisoned by an earlier panic".to_string()))?;
        writer
            .serialize(record)
            .map_err(|err| SinkError::Io(err.to_string()))?;
        writer.flush().map_err(|err| SinkError::Io(err.to_string()))
    }
}
