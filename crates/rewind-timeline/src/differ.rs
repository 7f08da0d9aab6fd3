//! Differencer: turns live captures into minimal record entries

use crate::category::{Category, CategoryMap, Shape};
use crate::checkpoint::Checkpoint;
use crate::provider::ProviderRegistry;
use crate::record::Entry;
use rewind_core::Value;

/// Entries produced by one capture pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capture {
    /// Changed categories (every registered one on a first capture)
    pub entries: CategoryMap<Entry>,
    /// Overwritten values, for categories that keep them
    pub priors: CategoryMap<Entry>,
}

/// Compares fresh captures against the last captured value per category
#[derive(Debug, Clone, Default)]
pub struct Differ {
    baseline: Checkpoint,
}

impl Differ {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume diffing from a known state, e.g. after a load or a commit
    pub fn from_baseline(baseline: Checkpoint) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &Checkpoint {
        &self.baseline
    }

    /// Capture every registered category and diff it against the baseline
    ///
    /// With `first` set, every category is recorded whole and the baseline
    /// is reset. Otherwise only changed categories are recorded, and only
    /// those update the baseline.
    pub fn build<S>(&mut self, registry: &ProviderRegistry<S>, state: &S, first: bool) -> Capture {
        let captured = registry.capture_all(state);
        if first {
            self.baseline = Checkpoint::from(captured.clone());
            return Capture {
                entries: captured
                    .into_iter()
                    .map(|(c, v)| (c, Entry::Whole(v)))
                    .collect(),
                priors: CategoryMap::new(),
            };
        }

        let mut capture = Capture::default();
        for (category, value) in captured {
            let old = self.baseline.get(category);
            if old.is_some_and(|old| old.is_equal(&value)) {
                continue;
            }
            let entry = diff(category, old, &value);
            if category.keeps_prior_values() {
                capture.priors.insert(category, entry.prior(old));
            }
            capture.entries.insert(category, entry);
            self.baseline.set(category, value);
        }
        capture
    }
}

/// Entry describing the change from `old` to `new`; they are known to differ.
fn diff(category: Category, old: Option<&Value>, new: &Value) -> Entry {
    match (category.shape(), old, new) {
        (Shape::Indexed, Some(Value::Array(old)), Value::Array(new)) => Entry::Elements {
            len: new.len(),
            set: new
                .iter()
                .enumerate()
                .filter(|(i, v)| old.get(*i).map_or(true, |o| !o.is_equal(v)))
                .map(|(i, v)| (i, v.clone()))
                .collect(),
        },
        _ => Entry::Whole(new.clone()),
    }
}
