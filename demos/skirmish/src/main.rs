//! Skirmish Demo
//!
//! A two-unit tactics session that records every action, scrubs back
//! through the history with a preview, commits a rewind, and finally saves
//! and reloads the timeline.
//!
//! Run with `RUST_LOG=debug` to see every record the timeline writes.

use rewind_core::{SessionRng, Value};
use rewind_timeline::{
    Category, EventKind, ProviderRegistry, RecordMeta, RestoreScope, Timeline, TimelineConfig,
};

#[derive(Debug, Clone)]
struct Unit {
    name: String,
    hp: i64,
    pos: (i64, i64),
}

#[derive(Debug)]
struct Skirmish {
    units: Vec<Unit>,
    tiles: Vec<String>,
    switches: Vec<bool>,
    gold: i64,
    turn: i64,
    cursor: (i64, i64),
    rng: SessionRng,
}

impl Skirmish {
    fn new(seed: u64) -> Self {
        Self {
            units: vec![
                Unit {
                    name: "Alm".into(),
                    hp: 20,
                    pos: (0, 0),
                },
                Unit {
                    name: "Brigand".into(),
                    hp: 18,
                    pos: (3, 1),
                },
            ],
            tiles: vec!["plain".into(), "plain".into(), "village".into(), "fort".into()],
            switches: vec![false; 4],
            gold: 100,
            turn: 1,
            cursor: (0, 0),
            rng: SessionRng::new(seed),
        }
    }

    fn attack(&mut self, attacker: usize, defender: usize) -> i64 {
        let damage = self.rng.range_i64(3, 8);
        if let Some(unit) = self.units.get_mut(defender) {
            unit.hp = (unit.hp - damage).max(0);
        }
        if let Some(unit) = self.units.get(attacker) {
            self.cursor = unit.pos;
        }
        damage
    }

    fn summary(&self) -> String {
        let units: Vec<String> = self
            .units
            .iter()
            .map(|u| format!("{} {}hp @{:?}", u.name, u.hp, u.pos))
            .collect();
        format!(
            "turn {} | {} gold | {} | tiles {:?}",
            self.turn,
            self.gold,
            units.join(", "),
            self.tiles
        )
    }
}

fn pair(xy: (i64, i64)) -> Value {
    Value::from(vec![xy.0, xy.1])
}

fn unpair(value: &Value) -> (i64, i64) {
    let xy = value.as_array().unwrap_or_default();
    (
        xy.first().and_then(Value::as_i64).unwrap_or(0),
        xy.get(1).and_then(Value::as_i64).unwrap_or(0),
    )
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap_or_default()
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect()
}

fn providers() -> ProviderRegistry<Skirmish> {
    let mut registry = ProviderRegistry::new();

    registry.register_fn(
        Category::Roster,
        |s: &Skirmish| {
            Value::Array(
                s.units
                    .iter()
                    .map(|u| {
                        [("name", Value::from(u.name.as_str())), ("hp", Value::from(u.hp))]
                            .into_iter()
                            .collect()
                    })
                    .collect(),
            )
        },
        |s: &mut Skirmish, v: &Value| {
            let roster = v.as_array().unwrap_or_default();
            s.units.truncate(roster.len());
            for (i, entry) in roster.iter().enumerate() {
                let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
                let hp = entry.get("hp").and_then(Value::as_i64).unwrap_or(0);
                match s.units.get_mut(i) {
                    Some(unit) => {
                        unit.name = name.to_string();
                        unit.hp = hp;
                    }
                    None => s.units.push(Unit {
                        name: name.to_string(),
                        hp,
                        pos: (0, 0),
                    }),
                }
            }
        },
    );
    // roster restores first, so every placed unit already exists
    registry.register_fn(
        Category::UnitPlacement,
        |s: &Skirmish| Value::Array(s.units.iter().map(|u| pair(u.pos)).collect()),
        |s: &mut Skirmish, v: &Value| {
            for (unit, pos) in s.units.iter_mut().zip(v.as_array().unwrap_or_default()) {
                unit.pos = unpair(pos);
            }
        },
    );
    registry.register_fn(
        Category::TileGraphics,
        |s: &Skirmish| Value::from(s.tiles.clone()),
        |s: &mut Skirmish, v: &Value| s.tiles = strings(v),
    );
    registry.register_fn(
        Category::Switches,
        |s: &Skirmish| Value::from(s.switches.clone()),
        |s: &mut Skirmish, v: &Value| {
            s.switches = v
                .as_array()
                .unwrap_or_default()
                .iter()
                .map(|b| b.as_bool().unwrap_or(false))
                .collect()
        },
    );
    registry.register_fn(
        Category::Gold,
        |s: &Skirmish| Value::from(s.gold),
        |s: &mut Skirmish, v: &Value| s.gold = v.as_i64().unwrap_or(0),
    );
    registry.register_fn(
        Category::TurnState,
        |s: &Skirmish| Value::from(s.turn),
        |s: &mut Skirmish, v: &Value| s.turn = v.as_i64().unwrap_or(1),
    );
    registry.register_fn(
        Category::RngSeed,
        |s: &Skirmish| s.rng.to_value(),
        |s: &mut Skirmish, v: &Value| s.rng = SessionRng::from_value_or_fresh(v),
    );
    registry.register_fn(
        Category::Cursor,
        |s: &Skirmish| pair(s.cursor),
        |s: &mut Skirmish, v: &Value| s.cursor = unpair(v),
    );

    registry
}

fn print_history(timeline: &Timeline<Skirmish>) {
    for entry in timeline.list_entries() {
        let marker = if entry.is_latest { ">" } else { " " };
        println!("  {} [{}] {}", marker, entry.index, entry.label);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== Skirmish Rewind Demo ===\n");

    let config = match TimelineConfig::from_ron("(max_records: 6, rewind_uses: 2)") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bad config: {e}");
            return;
        }
    };

    let mut game = Skirmish::new(42);
    let mut timeline = Timeline::start(config.clone(), providers(), &game);
    println!("Start: {}", game.summary());

    // Play two turns, recording after every event
    for _ in 0..2 {
        let damage = game.attack(0, 1);
        game.units[0].pos.0 += 1;
        let meta = RecordMeta::new(EventKind::UnitAction)
            .with_actor("Alm")
            .with_detail(format!("Attack ({damage})"));
        record(&mut timeline, &game, meta);

        game.units[1].pos.1 += 1;
        let meta = RecordMeta::new(EventKind::PhaseChange).with_detail("Enemy");
        record(&mut timeline, &game, meta);

        if game.units[0].pos.0 == 2 {
            game.tiles[2] = "ruins".into();
            game.switches[0] = true;
            game.gold += 50;
            let meta = RecordMeta::new(EventKind::PlaceEvent)
                .with_actor("Alm")
                .with_detail("the village");
            record(&mut timeline, &game, meta);
        }

        game.turn += 1;
        let turn = game.turn.to_string();
        record(&mut timeline, &game, RecordMeta::new(EventKind::TurnStart).with_detail(turn));
        println!("Now:   {}", game.summary());
    }

    println!("\nHistory ({} of at most {} records):", timeline.len(), config.max_records());
    print_history(&timeline);

    let before_last = timeline.latest_index().saturating_sub(1);
    if let Ok(changes) = timeline.changes_at(before_last, Category::TileGraphics) {
        for change in changes {
            println!("  tile {:?}: {} -> {}", change.position, change.before, change.after);
        }
    }

    // Scrub back with a preview, then cancel it
    println!("\nPreviewing record 1...");
    if let Err(e) = timeline.rewind(&mut game, 1, RestoreScope::Preview, false) {
        eprintln!("preview failed: {e}");
    }
    println!("Preview: {}", game.summary());
    let latest = timeline.latest_index();
    if let Err(e) = timeline.rewind(&mut game, latest, RestoreScope::Preview, false) {
        eprintln!("cancel failed: {e}");
    }
    println!("Back:    {}", game.summary());

    // Spend a rewind and commit to record 2
    if timeline.remaining() > 0 {
        println!("\nRewinding to record 2 ({} uses left)...", timeline.remaining());
        match timeline.rewind(&mut game, 2, RestoreScope::Full, true) {
            Ok(()) => timeline.set_remaining(timeline.remaining() - 1),
            Err(e) => eprintln!("rewind failed: {e}"),
        }
        println!("Now:     {}", game.summary());
        let damage = game.attack(0, 1);
        let meta = RecordMeta::new(EventKind::UnitAction)
            .with_actor("Alm")
            .with_detail(format!("Attack ({damage})"));
        record(&mut timeline, &game, meta);
        print_history(&timeline);
    }

    // Save and reload
    let saved = timeline.save();
    println!("\nSaved {} bytes of history", saved.records.len());
    let reloaded = Timeline::load(config, providers(), &game, &saved);
    println!(
        "Reloaded {} records, {} rewinds left",
        reloaded.len(),
        reloaded.remaining()
    );

    println!("\n=== Demo Complete ===");
}

fn record(timeline: &mut Timeline<Skirmish>, game: &Skirmish, meta: RecordMeta) {
    if let Err(e) = timeline.append(game, meta) {
        eprintln!("could not record: {e}");
    }
}
