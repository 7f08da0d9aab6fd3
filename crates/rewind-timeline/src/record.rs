//! History records and their structured-value form

use crate::category::{Category, CategoryMap};
use crate::error::{Error, Result};
use rewind_core::{Value, ValueMap};
use serde::{Deserialize, Serialize};

/// The game event that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The session's opening capture
    SessionStart,
    /// A new turn began
    TurnStart,
    /// Control passed to another side
    PhaseChange,
    /// A unit finished its action
    UnitAction,
    /// A unit triggered a place event (village, chest, door)
    PlaceEvent,
    /// A unit used a talk command
    TalkEvent,
    /// Defeat conditions were evaluated
    DefeatCheck,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::SessionStart,
        EventKind::TurnStart,
        EventKind::PhaseChange,
        EventKind::UnitAction,
        EventKind::PlaceEvent,
        EventKind::TalkEvent,
        EventKind::DefeatCheck,
    ];

    /// Stable key used in persisted history
    pub fn key(self) -> &'static str {
        match self {
            EventKind::SessionStart => "session_start",
            EventKind::TurnStart => "turn_start",
            EventKind::PhaseChange => "phase_change",
            EventKind::UnitAction => "unit_action",
            EventKind::PlaceEvent => "place_event",
            EventKind::TalkEvent => "talk_event",
            EventKind::DefeatCheck => "defeat_check",
        }
    }

    pub fn from_key(key: &str) -> Option<EventKind> {
        EventKind::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// Display metadata carried by every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub kind: EventKind,
    /// Name of the acting unit or side
    pub actor: Option<String>,
    /// Place, talk-command or turn label
    pub detail: Option<String>,
}

impl RecordMeta {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            actor: None,
            detail: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Whether a record holds every category or only the changed ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Full,
    Delta,
}

/// What a record holds for one category
///
/// An absent entry means "unchanged". `Whole(Value::Undefined)` means the
/// category changed to absent; the two are never conflated.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// The complete new value
    Whole(Value),
    /// Positional element changes to an array value
    Elements {
        /// Array length after the change
        len: usize,
        /// Replaced elements by position, ascending
        set: Vec<(usize, Value)>,
    },
}

impl Entry {
    /// Merge this entry into an accumulated value
    pub fn apply_to(&self, target: &mut Value) {
        match self {
            Entry::Whole(value) => *target = value.clone(),
            Entry::Elements { len, set } => {
                if !matches!(target, Value::Array(_)) {
                    *target = Value::Array(Vec::new());
                }
                if let Value::Array(items) = target {
                    items.resize(*len, Value::Undefined);
                    for (i, value) in set {
                        if let Some(slot) = items.get_mut(*i) {
                            *slot = value.clone();
                        }
                    }
                }
            }
        }
    }

    /// The entry that undoes this one, given the value it overwrote
    ///
    /// Applying the result to the value after this entry yields `before`
    /// again (positions past the new length are re-created).
    pub fn prior(&self, before: Option<&Value>) -> Entry {
        match (self, before) {
            (Entry::Elements { len, set }, Some(Value::Array(old))) => {
                let mut prior: Vec<(usize, Value)> = set
                    .iter()
                    .filter_map(|(i, _)| old.get(*i).map(|v| (*i, v.clone())))
                    .collect();
                prior.extend(old.iter().enumerate().skip(*len).map(|(i, v)| (i, v.clone())));
                Entry::Elements {
                    len: old.len(),
                    set: prior,
                }
            }
            (_, before) => Entry::Whole(before.cloned().unwrap_or(Value::Undefined)),
        }
    }

    /// Whether applying this entry to `target` only creates positions it lists
    ///
    /// Every entry the differencer builds satisfies this. Decoded history
    /// that does not is corrupt, and applying it could allocate without bound.
    pub fn grows_within(&self, target: Option<&Value>) -> bool {
        match self {
            Entry::Whole(_) => true,
            Entry::Elements { len, set } => {
                let current = target.and_then(Value::as_array).map_or(0, <[Value]>::len);
                *len <= current.saturating_add(set.len())
            }
        }
    }

    pub fn is_whole(&self) -> bool {
        matches!(self, Entry::Whole(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Entry::Whole(value) => [("whole", value.clone())].into_iter().collect(),
            Entry::Elements { len, set } => {
                let pairs: Vec<Value> = set
                    .iter()
                    .map(|(i, v)| Value::Array(vec![Value::from(*i), v.clone()]))
                    .collect();
                [("len", Value::from(*len)), ("set", Value::Array(pairs))]
                    .into_iter()
                    .collect()
            }
        }
    }

    pub fn from_value(value: &Value) -> Result<Entry> {
        if let Some(whole) = value.get("whole") {
            return Ok(Entry::Whole(whole.clone()));
        }
        let len = value
            .get("len")
            .and_then(as_index)
            .ok_or_else(|| corrupt("entry without `whole` or `len`"))?;
        let pairs = value
            .get("set")
            .and_then(Value::as_array)
            .ok_or_else(|| corrupt("element entry without `set`"))?;
        let set = pairs
            .iter()
            .map(|pair| match pair.as_array() {
                Some([i, v]) => as_index(i)
                    .filter(|i| *i < len)
                    .map(|i| (i, v.clone()))
                    .ok_or_else(|| corrupt("element position out of range")),
                _ => Err(corrupt("element pair is not [position, value]")),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Entry::Elements { len, set })
    }
}

/// One point in the session history
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub meta: RecordMeta,
    pub scope: Scope,
    pub entries: CategoryMap<Entry>,
}

impl Record {
    /// A record holding every category whole
    pub fn full(meta: RecordMeta, values: CategoryMap<Value>) -> Self {
        Self {
            meta,
            scope: Scope::Full,
            entries: values
                .into_iter()
                .map(|(c, v)| (c, Entry::Whole(v)))
                .collect(),
        }
    }

    /// A record holding only changed categories
    pub fn delta(meta: RecordMeta, entries: CategoryMap<Entry>) -> Self {
        Self {
            meta,
            scope: Scope::Delta,
            entries,
        }
    }

    pub fn is_full(&self) -> bool {
        self.scope == Scope::Full
    }

    pub fn to_value(&self) -> Value {
        let mut map = ValueMap::new();
        map.insert("kind".into(), Value::from(self.meta.kind.key()));
        map.insert("actor".into(), Value::from(self.meta.actor.clone()));
        map.insert("detail".into(), Value::from(self.meta.detail.clone()));
        map.insert("full".into(), Value::Bool(self.is_full()));
        map.insert(
            "entries".into(),
            self.entries
                .iter()
                .map(|(c, e)| (c.key(), e.to_value()))
                .collect(),
        );
        Value::Object(map)
    }

    pub fn from_value(value: &Value) -> Result<Record> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .and_then(EventKind::from_key)
            .ok_or_else(|| corrupt("record without a known `kind`"))?;
        let scope = match value.get("full").and_then(Value::as_bool) {
            Some(true) => Scope::Full,
            Some(false) => Scope::Delta,
            None => return Err(corrupt("record without `full` flag")),
        };
        let raw = value
            .get("entries")
            .and_then(Value::as_object)
            .ok_or_else(|| corrupt("record without `entries`"))?;

        let mut entries = CategoryMap::new();
        for (key, raw_entry) in raw {
            let category = Category::from_key(key)
                .ok_or_else(|| corrupt(format!("unknown category `{key}`")))?;
            let entry = Entry::from_value(raw_entry)?;
            if scope == Scope::Full && !entry.is_whole() {
                return Err(corrupt(format!("full record holds a partial `{key}`")));
            }
            entries.insert(category, entry);
        }

        Ok(Record {
            meta: RecordMeta {
                kind,
                actor: optional_string(value.get("actor")),
                detail: optional_string(value.get("detail")),
            },
            scope,
            entries,
        })
    }
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn as_index(value: &Value) -> Option<usize> {
    value
        .as_i64()
        .and_then(|i| usize::try_from(i).ok())
}

fn corrupt(msg: impl Into<String>) -> Error {
    Error::CorruptHistory(msg.into())
}
