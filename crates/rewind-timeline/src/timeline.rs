//! The rewind engine: one session's history and its restore operations

use crate::category::Category;
use crate::checkpoint::Checkpoint;
use crate::config::TimelineConfig;
use crate::differ::Differ;
use crate::error::{Error, Result};
use crate::label::describe_meta;
use crate::persist::HistoryBlobs;
use crate::provider::ProviderRegistry;
use crate::record::{Entry, EventKind, Record, RecordMeta};
use crate::store::RecordStore;
use rewind_core::Value;

/// Which categories a rewind writes back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestoreScope {
    /// Every registered category
    Full,
    /// Only positional and visual categories, safe to show while scrubbing
    Preview,
}

impl RestoreScope {
    fn includes(self, category: Category) -> bool {
        match self {
            RestoreScope::Full => true,
            RestoreScope::Preview => category.preview_safe(),
        }
    }

    /// The scope covering both `self` and `other`
    fn widen(self, other: RestoreScope) -> RestoreScope {
        match (self, other) {
            (RestoreScope::Preview, RestoreScope::Preview) => RestoreScope::Preview,
            _ => RestoreScope::Full,
        }
    }
}

/// A non-committed restore that the live state is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scrub {
    index: usize,
    scope: RestoreScope,
}

/// One line of the player-facing history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub index: usize,
    pub kind: EventKind,
    pub label: String,
    pub is_latest: bool,
}

/// A single before/after pair within one record
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Element position for collection categories
    pub position: Option<usize>,
    pub before: Value,
    pub after: Value,
}

/// History of one session
///
/// Owns the capture providers, the record store and the differencer
/// baseline. The live state `S` stays with the caller and is passed into
/// every operation that reads or writes it.
///
/// # Example
///
/// ```
/// use rewind_core::Value;
/// use rewind_timeline::{Category, EventKind, ProviderRegistry, RestoreScope, Timeline, TimelineConfig};
///
/// struct Camp {
///     gold: i64,
/// }
///
/// let mut registry = ProviderRegistry::new();
/// registry.register_fn(
///     Category::Gold,
///     |c: &Camp| Value::from(c.gold),
///     |c: &mut Camp, v: &Value| c.gold = v.as_i64().unwrap_or(0),
/// );
///
/// let mut camp = Camp { gold: 0 };
/// let mut timeline = Timeline::start(TimelineConfig::default(), registry, &camp);
///
/// camp.gold = 40;
/// timeline.notify_event(&camp, EventKind::UnitAction, Some("Alm")).unwrap();
///
/// timeline.rewind(&mut camp, 0, RestoreScope::Full, true).unwrap();
/// assert_eq!(camp.gold, 0);
/// assert_eq!(timeline.len(), 1);
/// ```
pub struct Timeline<S> {
    config: TimelineConfig,
    registry: ProviderRegistry<S>,
    store: RecordStore,
    differ: Differ,
    remaining: u32,
    scrub: Option<Scrub>,
}

impl<S> Timeline<S> {
    /// Begin a session with one full record of the current state
    pub fn start(config: TimelineConfig, registry: ProviderRegistry<S>, state: &S) -> Self {
        let mut differ = Differ::new();
        let capture = differ.build(&registry, state, true);
        let values = differ.baseline().values().clone();
        tracing::debug!(categories = capture.entries.len(), "Timeline started");

        Self {
            store: RecordStore::new(
                RecordMeta::new(EventKind::SessionStart),
                values,
                config.max_records(),
            ),
            remaining: config.rewind_uses,
            config,
            registry,
            differ,
            scrub: None,
        }
    }

    /// Bring back a saved session
    ///
    /// A history that fails to decode or validate is logged and replaced by
    /// a fresh single full record of `state`, so the rest of the save still
    /// loads. The saved budget is kept either way.
    pub fn load(
        config: TimelineConfig,
        registry: ProviderRegistry<S>,
        state: &S,
        blobs: &HistoryBlobs,
    ) -> Self {
        let restored = blobs.decode().and_then(|(records, priors)| {
            RecordStore::from_parts(records, priors, config.max_records())
        });
        match restored {
            Ok(store) => {
                let baseline = Checkpoint::replay(store.records());
                tracing::debug!(records = store.len(), "Timeline loaded");
                Self {
                    store,
                    differ: Differ::from_baseline(baseline),
                    remaining: blobs.remaining,
                    config,
                    registry,
                    scrub: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved history unusable, starting a fresh one");
                let mut timeline = Self::start(config, registry, state);
                timeline.remaining = blobs.remaining;
                timeline
            }
        }
    }

    /// Persisted form of this history
    pub fn save(&self) -> HistoryBlobs {
        HistoryBlobs::from_store(&self.store, self.remaining)
    }

    /// Record the changes since the last record
    ///
    /// Returns the index of the new record. Fails while a non-committed
    /// restore is live, since that state is not where play continues from.
    pub fn append(&mut self, state: &S, meta: RecordMeta) -> Result<usize> {
        if let Some(scrub) = self.scrub {
            return Err(Error::PreviewActive { index: scrub.index });
        }

        let capture = self.differ.build(&self.registry, state, false);
        let changed = capture.entries.len();
        let kind = meta.kind;
        let compactions = self
            .store
            .push(Record::delta(meta, capture.entries), capture.priors);

        let index = self.store.latest_index();
        tracing::debug!(index, ?kind, changed, compactions, "Appended record");
        Ok(index)
    }

    /// Entry point for gameplay triggers
    pub fn notify_event(&mut self, state: &S, kind: EventKind, actor: Option<&str>) -> Result<usize> {
        let mut meta = RecordMeta::new(kind);
        meta.actor = actor.map(str::to_string);
        self.append(state, meta)
    }

    /// Restore the state as of record `index`
    ///
    /// `Full` writes every registered category, `Preview` only the
    /// preview-safe ones. With `commit`, records after `index` are discarded
    /// and play continues from there; a preview cannot commit. Without it
    /// the history is untouched and `rewind(latest, _, false)` returns to
    /// the tip, writing back only what earlier restores changed.
    pub fn rewind(
        &mut self,
        state: &mut S,
        index: usize,
        scope: RestoreScope,
        commit: bool,
    ) -> Result<()> {
        if index >= self.store.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.store.len(),
            });
        }
        if commit && scope == RestoreScope::Preview {
            return Err(Error::PreviewCommit);
        }

        if index == self.store.latest_index() {
            if let Some(scrub) = self.scrub.take() {
                self.restore(state, self.differ.baseline(), scrub.scope);
                tracing::debug!(from = scrub.index, "Returned to latest record");
            }
            return Ok(());
        }

        let checkpoint = self.store.checkpoint_at(index)?;
        self.restore(state, &checkpoint, scope);

        if commit {
            let discarded = self.store.latest_index() - index;
            self.store.truncate(index);
            self.differ = Differ::from_baseline(checkpoint);
            self.scrub = None;
            tracing::info!(index, discarded, "Committed rewind");
        } else {
            let scope = match self.scrub {
                Some(prev) => prev.scope.widen(scope),
                None => scope,
            };
            self.scrub = Some(Scrub { index, scope });
        }
        Ok(())
    }

    fn restore(&self, state: &mut S, checkpoint: &Checkpoint, scope: RestoreScope) {
        for (category, value) in checkpoint.values().iter() {
            if scope.includes(category) {
                self.registry.restore(category, state, value);
            }
        }
    }

    /// The history list as the UI shows it
    pub fn list_entries(&self) -> Vec<EntryView> {
        let latest = self.store.latest_index();
        self.store
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| EntryView {
                index,
                kind: record.meta.kind,
                label: describe_meta(&record.meta),
                is_latest: index == latest,
            })
            .collect()
    }

    /// What record `index` changed in one category
    ///
    /// Categories that keep prior values answer from the saved priors;
    /// others replay the history up to the previous record.
    pub fn changes_at(&self, index: usize, category: Category) -> Result<Vec<Change>> {
        let record = self.store.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.store.len(),
        })?;
        let Some(entry) = record.entries.get(category) else {
            return Ok(Vec::new());
        };

        let before = self.value_before(index, category)?;
        let changes = match entry {
            Entry::Whole(after) => vec![Change {
                position: None,
                before,
                after: after.clone(),
            }],
            Entry::Elements { len, set } => {
                let old = before.as_array().unwrap_or_default();
                let mut changes: Vec<Change> = set
                    .iter()
                    .map(|(i, after)| Change {
                        position: Some(*i),
                        before: old.get(*i).cloned().unwrap_or(Value::Undefined),
                        after: after.clone(),
                    })
                    .collect();
                changes.extend(old.iter().enumerate().skip(*len).map(|(i, v)| Change {
                    position: Some(i),
                    before: v.clone(),
                    after: Value::Undefined,
                }));
                changes
            }
        };
        Ok(changes)
    }

    fn value_before(&self, index: usize, category: Category) -> Result<Value> {
        if index == 0 {
            return Ok(Value::Undefined);
        }
        let prior = self.store.priors(index).and_then(|p| p.get(category));
        let value = match prior {
            Some(prior) => {
                let mut value = self
                    .store
                    .checkpoint_at(index)?
                    .get(category)
                    .cloned()
                    .unwrap_or(Value::Undefined);
                prior.apply_to(&mut value);
                value
            }
            None => self
                .store
                .checkpoint_at(index - 1)?
                .get(category)
                .cloned()
                .unwrap_or(Value::Undefined),
        };
        Ok(value)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining;
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Always false: a timeline holds at least its opening record
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn latest_index(&self) -> usize {
        self.store.latest_index()
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    /// Index shown by a non-committed restore, if one is live
    pub fn preview_index(&self) -> Option<usize> {
        self.scrub.map(|s| s.index)
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry<S> {
        &self.registry
    }
}
