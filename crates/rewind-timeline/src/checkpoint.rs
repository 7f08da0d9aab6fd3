//! Materialized per-category state at one point in history

use crate::category::{Category, CategoryMap};
use crate::record::{Entry, Record};
use rewind_core::Value;

/// The value of every category as of some record
///
/// Built by merging records oldest-first; later entries overwrite earlier
/// ones. The differencer's baseline is also a checkpoint: the state as of
/// the newest record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    values: CategoryMap<Value>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay a prefix of history from its leading full record
    pub fn replay<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut checkpoint = Self::new();
        for record in records {
            checkpoint.apply(record);
        }
        checkpoint
    }

    /// Merge one record's entries
    pub fn apply(&mut self, record: &Record) {
        for (category, entry) in record.entries.iter() {
            self.apply_entry(category, entry);
        }
    }

    pub fn apply_entry(&mut self, category: Category, entry: &Entry) {
        match self.values.get_mut(category) {
            Some(value) => entry.apply_to(value),
            None => {
                let mut value = Value::Undefined;
                entry.apply_to(&mut value);
                self.values.insert(category, value);
            }
        }
    }

    pub fn get(&self, category: Category) -> Option<&Value> {
        self.values.get(category)
    }

    pub fn set(&mut self, category: Category, value: Value) {
        self.values.insert(category, value);
    }

    pub fn values(&self) -> &CategoryMap<Value> {
        &self.values
    }

    pub fn into_values(self) -> CategoryMap<Value> {
        self.values
    }
}

impl From<CategoryMap<Value>> for Checkpoint {
    fn from(values: CategoryMap<Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EventKind, RecordMeta};

    fn gold_record(gold: i64, full: bool) -> Record {
        let mut values = CategoryMap::new();
        values.insert(Category::Gold, Value::from(gold));
        let meta = RecordMeta::new(EventKind::UnitAction);
        if full {
            Record::full(meta, values)
        } else {
            Record::delta(
                meta,
                values.into_iter().map(|(c, v)| (c, Entry::Whole(v))).collect(),
            )
        }
    }

    #[test]
    fn test_later_entries_overwrite() {
        let records = [gold_record(0, true), gold_record(10, false), gold_record(25, false)];
        let checkpoint = Checkpoint::replay(&records);
        assert_eq!(checkpoint.get(Category::Gold), Some(&Value::from(25)));

        let earlier = Checkpoint::replay(&records[..2]);
        assert_eq!(earlier.get(Category::Gold), Some(&Value::from(10)));
    }

    #[test]
    fn test_omitted_category_keeps_value() {
        let mut first = gold_record(5, true);
        first
            .entries
            .insert(Category::Cursor, Entry::Whole(Value::from(vec![1, 1])));
        let records = [first, gold_record(6, false)];
        let checkpoint = Checkpoint::replay(&records);
        assert_eq!(checkpoint.get(Category::Cursor), Some(&Value::from(vec![1, 1])));
    }

    #[test]
    fn test_explicit_undefined_is_kept() {
        let mut second = gold_record(0, false);
        second.entries.insert(Category::Gold, Entry::Whole(Value::Undefined));
        let checkpoint = Checkpoint::replay(&[gold_record(3, true), second]);
        assert_eq!(checkpoint.get(Category::Gold), Some(&Value::Undefined));
    }
}
