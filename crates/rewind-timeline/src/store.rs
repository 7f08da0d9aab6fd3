//! Bounded, append-only record store with compaction

use crate::category::CategoryMap;
use crate::checkpoint::Checkpoint;
use crate::error::{Error, Result};
use crate::record::{Entry, Record, RecordMeta};
use rewind_core::Value;

/// The ordered record list of one session
///
/// `records[0]` is always a full record. Each record has a parallel slot of
/// prior values (empty for full records).
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    priors: Vec<CategoryMap<Entry>>,
    max_records: usize,
}

impl RecordStore {
    /// Start a history from the opening capture of every category
    pub fn new(meta: RecordMeta, values: CategoryMap<Value>, max_records: usize) -> Self {
        Self {
            records: vec![Record::full(meta, values)],
            priors: vec![CategoryMap::new()],
            max_records: max_records.max(1),
        }
    }

    /// Rebuild a store from persisted parts
    ///
    /// Enforces the capacity bound immediately, so a history saved under a
    /// larger bound is compacted down.
    pub fn from_parts(
        records: Vec<Record>,
        priors: Vec<CategoryMap<Entry>>,
        max_records: usize,
    ) -> Result<Self> {
        match records.first() {
            None => return Err(Error::CorruptHistory("history holds no records".into())),
            Some(first) if !first.is_full() => {
                return Err(Error::CorruptHistory(
                    "first record is not a full record".into(),
                ))
            }
            Some(_) => {}
        }
        if priors.len() != records.len() {
            return Err(Error::CorruptHistory(format!(
                "{} prior slots for {} records",
                priors.len(),
                records.len()
            )));
        }

        let mut store = Self {
            records,
            priors,
            max_records: max_records.max(1),
        };
        store.enforce_capacity();
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: a store holds at least its full record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest_index(&self) -> usize {
        self.records.len() - 1
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Values overwritten by the record at `index`
    pub fn priors(&self, index: usize) -> Option<&CategoryMap<Entry>> {
        self.priors.get(index)
    }

    pub fn prior_slots(&self) -> &[CategoryMap<Entry>] {
        &self.priors
    }

    /// Append a record; returns how many compactions ran
    pub fn push(&mut self, record: Record, priors: CategoryMap<Entry>) -> usize {
        self.records.push(record);
        self.priors.push(priors);
        self.enforce_capacity()
    }

    /// Materialize the state as of `index`
    pub fn checkpoint_at(&self, index: usize) -> Result<Checkpoint> {
        if index >= self.records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(Checkpoint::replay(&self.records[..=index]))
    }

    /// Drop every record after `index`
    pub fn truncate(&mut self, index: usize) {
        self.records.truncate(index + 1);
        self.priors.truncate(index + 1);
    }

    fn enforce_capacity(&mut self) -> usize {
        let mut runs = 0;
        while self.records.len() > self.max_records {
            self.compact();
            runs += 1;
        }
        runs
    }

    /// Fold the two oldest records into one full record
    ///
    /// The replacement holds the state as of the second-oldest record but
    /// keeps the display metadata of the oldest, so the head of the visible
    /// history keeps its label. The state at every later index, and so the
    /// live state, is unchanged.
    pub fn compact(&mut self) {
        if self.records.len() < 2 {
            return;
        }
        let merged = Checkpoint::replay(&self.records[..2]);
        let oldest = self.records.remove(0);
        self.priors.remove(0);

        self.records[0] = Record::full(oldest.meta, merged.into_values());
        self.priors[0] = CategoryMap::new();
        tracing::info!(records = self.records.len(), "Compacted oldest records");
    }
}
