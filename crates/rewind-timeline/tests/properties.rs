use proptest::prelude::*;
use rewind_core::Value;
use rewind_timeline::{
    Category, Checkpoint, EventKind, ProviderRegistry, RestoreScope, Timeline, TimelineConfig,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Board {
    gold: Option<i64>,
    switches: Vec<bool>,
    tiles: Vec<i64>,
    cursor: i64,
}

#[derive(Debug, Clone)]
enum Op {
    Gold(i64),
    ClearGold,
    Toggle(usize),
    Tile(usize, i64),
    Grow,
    Shrink,
    Cursor(i64),
    Idle,
}

fn apply(board: &mut Board, op: &Op) {
    match op {
        Op::Gold(n) => board.gold = Some(*n),
        Op::ClearGold => board.gold = None,
        Op::Toggle(i) => {
            if let Some(s) = board.switches.get_mut(*i) {
                *s = !*s;
            }
        }
        Op::Tile(i, t) => {
            if let Some(tile) = board.tiles.get_mut(*i) {
                *tile = *t;
            }
        }
        Op::Grow => board.tiles.push(0),
        Op::Shrink => {
            board.tiles.pop();
        }
        Op::Cursor(c) => board.cursor = *c,
        Op::Idle => {}
    }
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50i64..50).prop_map(Op::Gold),
        Just(Op::ClearGold),
        (0usize..6).prop_map(Op::Toggle),
        (0usize..6, 0i64..4).prop_map(|(i, t)| Op::Tile(i, t)),
        Just(Op::Grow),
        Just(Op::Shrink),
        (0i64..20).prop_map(Op::Cursor),
        Just(Op::Idle),
    ]
}

fn registry() -> ProviderRegistry<Board> {
    let mut registry = ProviderRegistry::new();
    registry.register_fn(
        Category::Gold,
        // no purse captures as undefined
        |b: &Board| Value::from(b.gold),
        |b: &mut Board, v: &Value| b.gold = v.as_i64(),
    );
    registry.register_fn(
        Category::Switches,
        |b: &Board| Value::from(b.switches.clone()),
        |b: &mut Board, v: &Value| {
            b.switches = v
                .as_array()
                .unwrap_or_default()
                .iter()
                .map(|s| s.as_bool().unwrap_or(false))
                .collect()
        },
    );
    registry.register_fn(
        Category::MapTiles,
        |b: &Board| Value::from(b.tiles.clone()),
        |b: &mut Board, v: &Value| {
            b.tiles = v
                .as_array()
                .unwrap_or_default()
                .iter()
                .map(|t| t.as_i64().unwrap_or(0))
                .collect()
        },
    );
    registry.register_fn(
        Category::Cursor,
        |b: &Board| Value::from(b.cursor),
        |b: &mut Board, v: &Value| b.cursor = v.as_i64().unwrap_or(0),
    );
    registry
}

fn opening() -> Board {
    Board {
        gold: Some(0),
        switches: vec![false; 6],
        tiles: vec![1, 2, 3],
        ..Default::default()
    }
}

/// Play `ops`, appending after each; returns the board after every record
fn play(timeline: &mut Timeline<Board>, board: &mut Board, ops: &[Op]) -> Vec<Board> {
    let mut states = vec![board.clone()];
    for op in ops {
        apply(board, op);
        timeline
            .notify_event(board, EventKind::UnitAction, None)
            .unwrap();
        states.push(board.clone());
    }
    states
}

proptest! {
    #[test]
    fn rewind_reproduces_captured_state(
        ops in prop::collection::vec(arb_op(), 1..24),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut board = opening();
        let mut timeline = Timeline::start(TimelineConfig::with_max_records(64), registry(), &board);
        let states = play(&mut timeline, &mut board, &ops);

        let target = pick.index(timeline.len());
        timeline.rewind(&mut board, target, RestoreScope::Full, true).unwrap();
        prop_assert_eq!(&board, &states[target]);
        prop_assert_eq!(timeline.len(), target + 1);

        // a second identical rewind changes nothing
        timeline.rewind(&mut board, target, RestoreScope::Full, true).unwrap();
        prop_assert_eq!(&board, &states[target]);
    }

    #[test]
    fn compaction_keeps_live_state_and_tail(
        ops in prop::collection::vec(arb_op(), 1..30),
        max_records in 1usize..6,
    ) {
        let mut board = opening();
        let mut timeline =
            Timeline::start(TimelineConfig::with_max_records(max_records), registry(), &board);
        let states = play(&mut timeline, &mut board, &ops);
        prop_assert!(timeline.len() <= max_records);
        prop_assert!(timeline.records()[0].is_full());

        let tip = Checkpoint::replay(timeline.records());
        prop_assert_eq!(tip.values(), &timeline.registry().capture_all(&board));

        let dropped = states.len() - timeline.len();
        for index in (0..timeline.len()).rev() {
            let mut scratch = board.clone();
            timeline.rewind(&mut scratch, index, RestoreScope::Full, false).unwrap();
            prop_assert_eq!(&scratch, &states[index + dropped]);
            let latest = timeline.latest_index();
            timeline.rewind(&mut scratch, latest, RestoreScope::Full, false).unwrap();
            prop_assert_eq!(&scratch, &board);
        }
    }

    #[test]
    fn unchanged_state_records_nothing(
        ops in prop::collection::vec(arb_op(), 0..12),
    ) {
        let mut board = opening();
        let mut timeline = Timeline::start(TimelineConfig::default(), registry(), &board);
        play(&mut timeline, &mut board, &ops);

        let index = timeline.notify_event(&board, EventKind::DefeatCheck, None).unwrap();
        prop_assert!(timeline.records()[index].entries.is_empty());
    }

    #[test]
    fn saved_history_reloads_identically(
        ops in prop::collection::vec(arb_op(), 0..16),
    ) {
        let mut board = opening();
        let mut timeline = Timeline::start(TimelineConfig::default(), registry(), &board);
        play(&mut timeline, &mut board, &ops);

        let loaded = Timeline::load(TimelineConfig::default(), registry(), &board, &timeline.save());
        prop_assert_eq!(loaded.records(), timeline.records());
        for index in 0..timeline.len() {
            prop_assert_eq!(
                loaded.changes_at(index, Category::MapTiles).unwrap(),
                timeline.changes_at(index, Category::MapTiles).unwrap()
            );
        }
    }
}
