use rewind_core::{codec, Value};
use rewind_timeline::{
    Category, Entry, Error, EventKind, HistoryBlobs, ProviderRegistry, RestoreScope, Timeline,
    TimelineConfig,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Camp {
    gold: i64,
    tiles: Vec<String>,
    cursor: i64,
}

fn registry() -> ProviderRegistry<Camp> {
    let mut registry = ProviderRegistry::new();
    registry.register_fn(
        Category::Gold,
        |c: &Camp| Value::from(c.gold),
        |c: &mut Camp, v: &Value| c.gold = v.as_i64().unwrap_or(0),
    );
    registry.register_fn(
        Category::TileGraphics,
        |c: &Camp| Value::from(c.tiles.clone()),
        |c: &mut Camp, v: &Value| {
            c.tiles = v
                .as_array()
                .unwrap_or_default()
                .iter()
                .map(|t| t.as_str().unwrap_or_default().to_string())
                .collect()
        },
    );
    registry.register_fn(
        Category::Cursor,
        |c: &Camp| Value::from(c.cursor),
        |c: &mut Camp, v: &Value| c.cursor = v.as_i64().unwrap_or(0),
    );
    registry
}

#[test]
fn gold_history_compacts_at_capacity_two() {
    let mut camp = Camp::default();
    let mut timeline = Timeline::start(TimelineConfig::with_max_records(2), registry(), &camp);

    camp.gold = 10;
    timeline.notify_event(&camp, EventKind::TurnStart, None).unwrap();
    camp.gold = 25;
    timeline.notify_event(&camp, EventKind::UnitAction, Some("Alm")).unwrap();

    assert_eq!(timeline.len(), 2);
    let records = timeline.records();
    assert!(records[0].is_full());
    assert_eq!(records[0].meta.kind, EventKind::SessionStart);
    assert_eq!(
        records[0].entries.get(Category::Gold),
        Some(&Entry::Whole(Value::from(10)))
    );
    assert_eq!(
        records[1].entries.get(Category::Gold),
        Some(&Entry::Whole(Value::from(25)))
    );

    timeline.rewind(&mut camp, 1, RestoreScope::Full, true).unwrap();
    assert_eq!(camp.gold, 25);

    timeline.rewind(&mut camp, 0, RestoreScope::Full, true).unwrap();
    assert_eq!(camp.gold, 10);
}

#[test]
fn mixed_array_survives_the_codec() {
    let text = codec::encode(&codec::decode(r#"{"a":[1,"x",null,undefined,true]}"#).unwrap());
    let value = codec::decode(&text).unwrap();
    let items = value.get("a").and_then(Value::as_array).unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].as_f64(), Some(1.0));
    assert_eq!(items[1].as_str(), Some("x"));
    assert!(items[2].is_null());
    assert!(items[3].is_undefined());
    assert_eq!(items[4].as_bool(), Some(true));
}

#[test]
fn preview_scrub_leaves_gold_alone() {
    let mut camp = Camp {
        tiles: vec!["grass".into(), "grass".into()],
        ..Default::default()
    };
    let mut timeline = Timeline::start(TimelineConfig::default(), registry(), &camp);

    camp.tiles[1] = "fort".into();
    camp.gold = 50;
    camp.cursor = 3;
    timeline.notify_event(&camp, EventKind::PlaceEvent, Some("Gray")).unwrap();

    timeline.rewind(&mut camp, 0, RestoreScope::Preview, false).unwrap();
    assert_eq!(camp.tiles, vec!["grass", "grass"]);
    assert_eq!(camp.cursor, 0);
    assert_eq!(camp.gold, 50);

    assert!(matches!(
        timeline.rewind(&mut camp, 0, RestoreScope::Preview, true),
        Err(Error::PreviewCommit)
    ));

    timeline.rewind(&mut camp, 1, RestoreScope::Full, false).unwrap();
    assert_eq!(camp.tiles, vec!["grass", "fort"]);
    assert_eq!(camp.cursor, 3);
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.preview_index(), None);
}

#[test]
fn save_load_through_ron() {
    let mut camp = Camp {
        tiles: vec!["sea".into()],
        ..Default::default()
    };
    let mut timeline = Timeline::start(TimelineConfig::default(), registry(), &camp);
    camp.tiles.push("sand".into());
    timeline.notify_event(&camp, EventKind::TurnStart, None).unwrap();
    camp.tiles[0] = "bridge".into();
    timeline.notify_event(&camp, EventKind::UnitAction, Some("Saber")).unwrap();
    timeline.set_remaining(2);

    let text = timeline.save().to_ron().unwrap();
    let blobs = HistoryBlobs::from_ron(&text).unwrap();
    let mut loaded = Timeline::load(TimelineConfig::default(), registry(), &camp, &blobs);

    assert_eq!(loaded.records(), timeline.records());
    assert_eq!(loaded.remaining(), 2);
    assert_eq!(
        loaded.changes_at(2, Category::TileGraphics).unwrap(),
        timeline.changes_at(2, Category::TileGraphics).unwrap()
    );

    loaded.rewind(&mut camp, 1, RestoreScope::Full, true).unwrap();
    assert_eq!(camp.tiles, vec!["sea", "sand"]);
}

#[test]
fn corrupt_history_degrades_to_single_record() {
    let camp = Camp {
        gold: 7,
        ..Default::default()
    };
    let blobs = HistoryBlobs {
        records: r#"[{"kind":"turn_start","full":false,"entries":{}}]"#.into(),
        remaining: 1,
        ..Default::default()
    };
    let timeline = Timeline::load(TimelineConfig::default(), registry(), &camp, &blobs);
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.remaining(), 1);
    assert_eq!(
        timeline.records()[0].entries.get(Category::Gold),
        Some(&Entry::Whole(Value::from(7)))
    );
}

#[test]
fn oversized_element_entry_degrades_instead_of_allocating() {
    let camp = Camp {
        gold: 4,
        ..Default::default()
    };
    let blobs = HistoryBlobs {
        records: concat!(
            r#"[{"kind":"session_start","full":true,"entries":{"tile_graphics":{"whole":["sea"]}}},"#,
            r#"{"kind":"turn_start","full":false,"entries":{"tile_graphics":{"len":9000000000000000000,"set":[]}}}]"#
        )
        .into(),
        ..Default::default()
    };
    let timeline = Timeline::load(TimelineConfig::default(), registry(), &camp, &blobs);
    assert_eq!(timeline.len(), 1);
    assert_eq!(
        timeline.records()[0].entries.get(Category::Gold),
        Some(&Entry::Whole(Value::from(4)))
    );
}

#[test]
fn deeply_nested_history_degrades_instead_of_overflowing() {
    let camp = Camp::default();
    let blobs = HistoryBlobs {
        records: format!("{}{}", "[".repeat(200_000), "]".repeat(200_000)),
        ..Default::default()
    };
    let timeline = Timeline::load(TimelineConfig::default(), registry(), &camp, &blobs);
    assert_eq!(timeline.len(), 1);
    assert!(timeline.records()[0].is_full());
}

#[test]
fn loading_under_smaller_capacity_compacts() {
    let mut camp = Camp::default();
    let mut timeline = Timeline::start(TimelineConfig::with_max_records(10), registry(), &camp);
    for gold in 1..=6 {
        camp.gold = gold;
        timeline.notify_event(&camp, EventKind::UnitAction, None).unwrap();
    }

    let mut loaded = Timeline::load(
        TimelineConfig::with_max_records(3),
        registry(),
        &camp,
        &timeline.save(),
    );
    assert_eq!(loaded.len(), 3);
    loaded.rewind(&mut camp, 0, RestoreScope::Full, true).unwrap();
    assert_eq!(camp.gold, 4);
}
