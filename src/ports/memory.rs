use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{Location, TransactionRecord, TxId};
use crate::error::{SinkError, SourceError};
use crate::output::{Item, to_item};
use crate::ports::{ContentSource, RecordSink};

/// Content source serving files held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentSource {
    files: HashMap<Location, Vec<u8>>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<Location>, content: impl Into<Vec<u8>>) {
        self.files.insert(location.into(), content.into());
    }

    pub fn with_file(mut self, location: impl Into<Location>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(location, content);
        self
    }
}

impl ContentSource for MemoryContentSource {
    type Stream = Cursor<Vec<u8>>;

    fn fetch(&self, location: &Location) -> Result<Self::Stream, SourceError> {
        self.files
            .get(location)
            .map(|content| Cursor::new(content.clone()))
            .ok_or_else(|| SourceError::NotFound {
                location: location.clone(),
            })
    }
}

/// Key-value record sink held in memory. Writes with an existing id overwrite the stored record.
#[derive(Debug, Default)]
pub struct MemoryRecordSink {
    records: Mutex<BTreeMap<TxId, TransactionRecord>>,
    writes: AtomicUsize,
}

impl MemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct records stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of successful writes, overwrites included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn get(&self, id: &TxId) -> Option<TransactionRecord> {
        self.lock().get(id).cloned()
    }

    /// The stored record in its key-value item form.
    pub fn item(&self, id: &TxId) -> Option<Item> {
        self.lock().get(id).map(to_item)
    }

    /// All stored records, ordered by id.
    pub fn records(&self) -> Vec<TransactionRecord> {
        self.lock().values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<TxId, TransactionRecord>> {
        // a panic while holding the lock cannot leave a half-written map entry
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordSink for MemoryRecordSink {
    fn put(&self, record: &TransactionRecord) -> Result<(), SinkError> {
        self.lock().insert(record.id().clone(), record.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
