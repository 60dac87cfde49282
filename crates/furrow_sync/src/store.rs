//! The client-side log store boundary.

use parking_lot::RwLock;

use furrow_record::LogRecord;

use crate::error::{SyncError, SyncResult};

/// The in-memory store of log records the engine reconciles against.
///
/// Records are addressed by position; positions are stable across
/// [`LogStore::replace_at`] and only grow through [`LogStore::append`].
pub trait LogStore: Send + Sync {
    /// A copy of every record, in position order.
    fn snapshot(&self) -> Vec<LogRecord>;

    /// A copy of the record at one position.
    fn log_at(&self, index: usize) -> Option<LogRecord>;

    /// Number of records held.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a record and returns its position.
    fn append(&self, record: LogRecord) -> usize;

    /// Rewrites the records at the given positions through a mapper.
    ///
    /// Every position is validated before any record changes; an
    /// unknown position leaves the store untouched.
    fn replace_at(
        &self,
        indices: &[usize],
        mapper: &dyn Fn(LogRecord) -> LogRecord,
    ) -> SyncResult<()>;
}

/// Plain vector-backed store.
#[derive(Default)]
pub struct MemoryLogStore {
    records: RwLock<Vec<LogRecord>>,
}

impl MemoryLogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with records.
    pub fn with_records(records: Vec<LogRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl LogStore for MemoryLogStore {
    fn snapshot(&self) -> Vec<LogRecord> {
        self.records.read().clone()
    }

    fn log_at(&self, index: usize) -> Option<LogRecord> {
        self.records.read().get(index).cloned()
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }

    fn append(&self, record: LogRecord) -> usize {
        let mut records = self.records.write();
        records.push(record);
        records.len() - 1
    }

    fn replace_at(
        &self,
        indices: &[usize],
        mapper: &dyn Fn(LogRecord) -> LogRecord,
    ) -> SyncResult<()> {
        let mut records = self.records.write();
        if let Some(&index) = indices.iter().find(|&&i| i >= records.len()) {
            return Err(SyncError::UnknownIndex { index });
        }
        for &index in indices {
            let replaced = mapper(records[index].clone());
            records[index] = replaced;
        }
        Ok(())
    }
}
