//! Player-facing labels for history entries

use crate::record::{EventKind, RecordMeta};

/// Render the label shown for a history entry
pub fn describe(kind: EventKind, actor: Option<&str>, detail: Option<&str>) -> String {
    match kind {
        EventKind::SessionStart => match detail {
            Some(map) => format!("Start: {map}"),
            None => "Start of battle".to_string(),
        },
        EventKind::TurnStart => match detail {
            Some(turn) => format!("Turn {turn}"),
            None => "Turn start".to_string(),
        },
        EventKind::PhaseChange => format!("{} phase", detail.or(actor).unwrap_or("Next")),
        EventKind::UnitAction => match (actor, detail) {
            (Some(unit), Some(action)) => format!("{unit}: {action}"),
            (Some(unit), None) => format!("{unit} acted"),
            (None, Some(action)) => action.to_string(),
            (None, None) => "Unit action".to_string(),
        },
        EventKind::PlaceEvent => format!(
            "{} visited {}",
            actor.unwrap_or("A unit"),
            detail.unwrap_or("a location")
        ),
        EventKind::TalkEvent => format!(
            "{} talked to {}",
            actor.unwrap_or("A unit"),
            detail.unwrap_or("someone")
        ),
        EventKind::DefeatCheck => "Defeat check".to_string(),
    }
}

/// Label for a record's metadata
pub fn describe_meta(meta: &RecordMeta) -> String {
    describe(meta.kind, meta.actor.as_deref(), meta.detail.as_deref())
}
