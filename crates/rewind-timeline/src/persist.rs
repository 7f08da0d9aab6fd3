//! Persisted form of a session history
//!
//! A history is saved as one text blob holding the encoded record list, plus
//! one auxiliary blob per category that keeps prior values. Each auxiliary
//! blob is an array with one slot per record: `null` where the record
//! overwrote nothing in that category, otherwise the encoded prior entry.
//! The differencer baseline is never saved; it is rebuilt by replay.

use crate::category::{Category, CategoryMap};
use crate::checkpoint::Checkpoint;
use crate::error::{Error, Result};
use crate::record::{Entry, Record};
use crate::store::RecordStore;
use rewind_core::{codec, IndexMap, Value};
use serde::{Deserialize, Serialize};

/// Everything a save file needs to bring a timeline back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryBlobs {
    /// Encoded `Array<Record>`
    pub records: String,
    /// Encoded prior-value arrays, keyed by category key
    #[serde(default)]
    pub priors: IndexMap<String, String>,
    /// The external rewind budget at save time
    #[serde(default)]
    pub remaining: u32,
}

impl HistoryBlobs {
    /// Encode a record store
    pub fn from_store(store: &RecordStore, remaining: u32) -> Self {
        let records = Value::Array(store.records().iter().map(Record::to_value).collect());
        let priors = Category::ALL
            .into_iter()
            .filter(|c| c.keeps_prior_values())
            .map(|c| (c.key().to_string(), encode_priors(store.prior_slots(), c)))
            .collect();
        Self {
            records: codec::encode(&records),
            priors,
            remaining,
        }
    }

    /// Decode the record list and its prior values
    ///
    /// The record list must be valid. Prior-value blobs that are missing or
    /// do not line up with the records are rebuilt from the records.
    pub fn decode(&self) -> Result<(Vec<Record>, Vec<CategoryMap<Entry>>)> {
        let records = decode_records(&self.records)?;

        let mut slots = vec![CategoryMap::new(); records.len()];
        let mut derived: Option<Vec<CategoryMap<Entry>>> = None;
        for category in Category::ALL.into_iter().filter(|c| c.keeps_prior_values()) {
            let decoded = self
                .priors
                .get(category.key())
                .ok_or_else(|| Error::CorruptHistory(format!("no `{category}` prior values")))
                .and_then(|text| decode_priors(text, category, &records));
            let column = match decoded {
                Ok(column) => column,
                Err(e) => {
                    tracing::debug!(%category, error = %e, "Rebuilding prior values");
                    let derived = derived.get_or_insert_with(|| derive_priors(&records));
                    derived.iter().map(|slot| slot.get(category).cloned()).collect()
                }
            };
            for (slot, prior) in slots.iter_mut().zip(column) {
                if let Some(prior) = prior {
                    slot.insert(category, prior);
                }
            }
        }
        Ok((records, slots))
    }

    /// Write the blobs as RON, for hosts that keep their save files in RON
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

/// Decode and validate an encoded record list
pub fn decode_records(text: &str) -> Result<Vec<Record>> {
    let value = codec::decode(text)?;
    let items = value
        .as_array()
        .ok_or_else(|| Error::CorruptHistory("record list is not an array".into()))?;
    let records = items
        .iter()
        .map(Record::from_value)
        .collect::<Result<Vec<_>>>()?;
    match records.first() {
        Some(first) if first.is_full() => {}
        Some(_) => {
            return Err(Error::CorruptHistory(
                "first record is not a full record".into(),
            ))
        }
        None => return Err(Error::CorruptHistory("history holds no records".into())),
    }

    let mut checkpoint = Checkpoint::new();
    for (index, record) in records.iter().enumerate() {
        for (category, entry) in record.entries.iter() {
            if !entry.grows_within(checkpoint.get(category)) {
                return Err(Error::CorruptHistory(format!(
                    "`{category}` entry at {index} grows past the elements it lists"
                )));
            }
            checkpoint.apply_entry(category, entry);
        }
    }
    Ok(records)
}

fn encode_priors(slots: &[CategoryMap<Entry>], category: Category) -> String {
    let column = slots
        .iter()
        .map(|slot| slot.get(category).map_or(Value::Null, Entry::to_value))
        .collect();
    codec::encode(&Value::Array(column))
}

/// One prior-value column; must have a slot per record, filled exactly where
/// the record has an entry for `category`
fn decode_priors(
    text: &str,
    category: Category,
    records: &[Record],
) -> Result<Vec<Option<Entry>>> {
    let value = codec::decode(text)?;
    let items = value
        .as_array()
        .filter(|items| items.len() == records.len())
        .ok_or_else(|| Error::CorruptHistory(format!("`{category}` prior values misaligned")))?;

    // a prior is applied to the state after its record, so bound it there
    let mut checkpoint = Checkpoint::new();
    let mut column = Vec::with_capacity(items.len());
    for (index, (item, record)) in items.iter().zip(records).enumerate() {
        checkpoint.apply(record);
        let changed = index > 0 && record.entries.contains(category);
        let prior = match (item.is_null(), changed) {
            (true, false) => None,
            (false, true) => {
                let prior = Entry::from_value(item)?;
                if !prior.grows_within(checkpoint.get(category)) {
                    return Err(Error::CorruptHistory(format!(
                        "`{category}` prior value at {index} grows past the elements it lists"
                    )));
                }
                Some(prior)
            }
            _ => {
                return Err(Error::CorruptHistory(format!(
                    "`{category}` prior value at {index} does not match its record"
                )))
            }
        };
        column.push(prior);
    }
    Ok(column)
}

/// Recompute prior values by walking the records from the first
pub fn derive_priors(records: &[Record]) -> Vec<CategoryMap<Entry>> {
    let mut checkpoint = Checkpoint::new();
    let mut slots = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let mut slot = CategoryMap::new();
        for (category, entry) in record.entries.iter() {
            if index > 0 && category.keeps_prior_values() {
                slot.insert(category, entry.prior(checkpoint.get(category)));
            }
            checkpoint.apply_entry(category, entry);
        }
        slots.push(slot);
    }
    slots
}
