//! Battle integration tests
//!
//! Drive whole battles through the engine facade: damage, terrain, reach,
//! turn order, deaths and victory.

use grid_tactics::battle::{
    build_state, check_victory, movable_area, BattleEngine, BattleEvent, BattleState,
    ScenarioPayload, VictoryReason,
};
use grid_tactics::command::{ActionReport, Command};
use grid_tactics::core::{GridCoord, PlayerId, RulesConfig, ScriptedRng, UnitId};

fn state_from(json: &str) -> BattleState {
    let payload = ScenarioPayload::from_json_str(json).unwrap();
    build_state(&payload, &RulesConfig::default()).unwrap()
}

fn engine_from(json: &str) -> BattleEngine {
    BattleEngine::new(
        state_from(json),
        RulesConfig::default(),
        Box::new(ScriptedRng::never()),
    )
}

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

fn uid(id: &str) -> UnitId {
    UnitId::new(id)
}

const DUEL: &str = r#"{
    "version": 1,
    "width": 6,
    "height": 3,
    "tiles": [{"x": 3, "y": 1, "terrain": "MOUNTAIN"}],
    "units": [
        {"id": "soldier", "type": "soldier", "ownerId": "blue", "x": 1, "y": 1},
        {"id": "archer", "type": "archer", "ownerId": "red", "x": 2, "y": 1},
        {"id": "knight", "type": "knight", "ownerId": "red", "x": 3, "y": 1}
    ],
    "players": [
        {"id": "blue", "name": "Blue", "team": "blue"},
        {"id": "red", "name": "Red", "team": "red"}
    ]
}"#;

#[test]
fn test_soldier_hits_archer_for_44() {
    let mut engine = engine_from(DUEL);
    let report = engine
        .execute(&Command::attack(
            "c1",
            pid("blue"),
            uid("soldier"),
            uid("archer"),
            GridCoord::new(1, 1),
            GridCoord::new(2, 1),
        ))
        .unwrap();

    let archer = engine.state().unit(&uid("archer")).unwrap();
    assert_eq!(archer.stats.hp, 80 - 44);
    match report.action {
        ActionReport::Combat(combat) => {
            assert_eq!(combat.defender_damage, 44);
            assert!(!combat.is_critical);
            assert!(!combat.defender_died);
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn test_mountain_and_defense_boost_multiply() {
    let mut engine = engine_from(DUEL);
    // Move the soldier next to the knight on the mountain
    engine
        .execute(&Command::move_unit(
            "c1",
            pid("blue"),
            uid("soldier"),
            GridCoord::new(1, 1),
            GridCoord::new(3, 0),
        ))
        .unwrap();
    let report = engine
        .execute(&Command::attack(
            "c2",
            pid("blue"),
            uid("soldier"),
            uid("knight"),
            GridCoord::new(3, 0),
            GridCoord::new(3, 1),
        ))
        .unwrap();

    let defense = 15.0f32 * 1.2 * 1.4;
    let expected = (50.0 - defense).floor().max(1.0) as u32;
    assert_eq!(expected, 24);
    match report.action {
        ActionReport::Combat(combat) => assert_eq!(combat.defender_damage, expected),
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn test_water_border_confines_movement() {
    let mut tiles = Vec::new();
    for i in 0..8 {
        for (x, y) in [(i, 0), (i, 7), (0, i), (7, i)] {
            tiles.push(format!(r#"{{"x": {x}, "y": {y}, "terrain": "WATER"}}"#));
        }
    }
    tiles.sort();
    tiles.dedup();
    let json = format!(
        r#"{{
            "version": 1, "width": 8, "height": 8,
            "tiles": [{}],
            "units": [
                {{"id": "walker", "type": "soldier", "ownerId": "a", "x": 4, "y": 4}},
                {{"id": "idle", "type": "soldier", "ownerId": "b", "x": 1, "y": 1}}
            ],
            "players": [
                {{"id": "a", "name": "A", "team": "a"}},
                {{"id": "b", "name": "B", "team": "b"}}
            ]
        }}"#,
        tiles.join(",")
    );
    let state = state_from(&json);
    let area = movable_area(&state, &uid("walker"));

    assert!(!area.is_empty());
    assert!(area.contains(&GridCoord::new(4, 1)));
    for coord in &area {
        assert!((1..=6).contains(&coord.x) && (1..=6).contains(&coord.y), "{coord} is water");
    }
    assert!(!area.contains(&GridCoord::new(4, 4)));
}

const THREE_PLAYERS: &str = r#"{
    "version": 1,
    "width": 5,
    "height": 5,
    "units": [
        {"id": "a1", "type": "soldier", "ownerId": "a", "x": 0, "y": 0},
        {"id": "b1", "type": "soldier", "ownerId": "b", "x": 4, "y": 0},
        {"id": "c1", "type": "soldier", "ownerId": "c", "x": 4, "y": 4}
    ],
    "players": [
        {"id": "a", "name": "A", "team": "a"},
        {"id": "b", "name": "B", "team": "b"},
        {"id": "c", "name": "C", "team": "c", "aiControlled": true}
    ]
}"#;

#[test]
fn test_turn_wraps_after_last_player() {
    let mut engine = engine_from(THREE_PLAYERS);
    assert_eq!(engine.state().turn, 1);

    assert!(engine.submit(&Command::end_turn("e1", pid("a"))).success);
    assert!(engine.submit(&Command::end_turn("e2", pid("b"))).success);
    assert_eq!(engine.state().current_player_index, 2);
    assert_eq!(engine.state().turn, 1);

    let report = engine.execute(&Command::end_turn("e3", pid("c"))).unwrap();
    assert_eq!(engine.state().current_player_index, 0);
    assert_eq!(engine.state().turn, 2);
    assert_eq!(
        report.events,
        vec![BattleEvent::TurnEnded {
            turn: 2,
            current_player_id: pid("a"),
        }]
    );
}

#[test]
fn test_end_turn_by_inactive_player_fails() {
    let mut engine = engine_from(THREE_PLAYERS);
    let before = engine.state().clone();
    let outcome = engine.submit(&Command::end_turn("e1", pid("b")));
    assert!(!outcome.success);
    assert!(outcome.message.is_some());
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_units_only_act_on_their_turn() {
    let mut engine = engine_from(THREE_PLAYERS);
    let early = engine.submit(&Command::move_unit(
        "m1",
        pid("b"),
        uid("b1"),
        GridCoord::new(4, 0),
        GridCoord::new(3, 0),
    ));
    assert!(!early.success);

    engine.execute(&Command::end_turn("e1", pid("a"))).unwrap();
    let on_turn = engine.submit(&Command::move_unit(
        "m2",
        pid("b"),
        uid("b1"),
        GridCoord::new(4, 0),
        GridCoord::new(3, 0),
    ));
    assert!(on_turn.success);
}

#[test]
fn test_death_is_reported_once_and_unit_leaves_the_grid() {
    let mut engine = engine_from(DUEL);
    let strike = |id: &str| {
        Command::attack(
            id,
            pid("blue"),
            uid("soldier"),
            uid("archer"),
            GridCoord::new(1, 1),
            GridCoord::new(2, 1),
        )
    };
    let mut all_events = Vec::new();
    all_events.extend(engine.execute(&strike("c1")).unwrap().events);
    for (n, player) in ["blue", "red"].iter().enumerate() {
        all_events.extend(
            engine
                .execute(&Command::end_turn(format!("e{n}"), pid(player)))
                .unwrap()
                .events,
        );
    }
    all_events.extend(engine.execute(&strike("c2")).unwrap().events);

    let archer = engine.state().unit(&uid("archer")).unwrap();
    assert!(!archer.alive);
    assert_eq!(archer.stats.hp, 0);
    assert!(engine.state().unit_at(GridCoord::new(2, 1)).is_none());

    let deaths = all_events
        .iter()
        .filter(|e| matches!(e, BattleEvent::UnitDied { unit_id, .. } if unit_id == &uid("archer")))
        .count();
    assert_eq!(deaths, 1);

    // Dead units can neither act nor be targeted
    let again = engine.submit(&strike("c3"));
    assert!(!again.success);
}

#[test]
fn test_victory_detection() {
    let mut state = state_from(DUEL);
    assert!(!check_victory(&state).is_game_over);

    state.units[1].take_damage(1_000);
    assert!(!check_victory(&state).is_game_over);

    state.units[2].take_damage(1_000);
    let status = check_victory(&state);
    assert!(status.is_game_over);
    assert_eq!(status.winner, Some(pid("blue")));
    assert_eq!(status.reason, Some(VictoryReason::Elimination));

    state.units[0].take_damage(1_000);
    let status = check_victory(&state);
    assert!(status.is_game_over);
    assert_eq!(status.winner, None);
    assert_eq!(status.reason, Some(VictoryReason::Draw));
}

#[test]
fn test_engine_stops_after_elimination() {
    let json = r#"{
        "version": 1, "width": 3, "height": 1,
        "units": [
            {"id": "s", "type": "soldier", "ownerId": "a", "x": 0, "y": 0},
            {"id": "h", "type": "healer", "ownerId": "b", "x": 1, "y": 0}
        ],
        "players": [
            {"id": "a", "name": "A", "team": "a"},
            {"id": "b", "name": "B", "team": "b"}
        ]
    }"#;
    let mut engine = engine_from(json);
    let strike = |id: &str| {
        let (from, to) = (GridCoord::new(0, 0), GridCoord::new(1, 0));
        Command::attack(id, pid("a"), uid("s"), uid("h"), from, to)
    };
    // 50 - 8 = 42 per hit against 75 hp
    engine.execute(&strike("c1")).unwrap();
    engine.execute(&Command::end_turn("e1", pid("a"))).unwrap();
    engine.execute(&Command::end_turn("e2", pid("b"))).unwrap();
    let report = engine.execute(&strike("c2")).unwrap();

    assert!(engine.is_over());
    let ended: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::BattleEnded { .. }))
        .collect();
    assert_eq!(ended.len(), 1);

    let late = engine.submit(&Command::end_turn("e3", pid("a")));
    assert!(!late.success);
}

#[test]
fn test_experience_and_level_up_through_combat() {
    let json = r#"{
        "version": 1, "width": 3, "height": 1,
        "units": [
            {"id": "s", "type": "soldier", "ownerId": "a", "x": 0, "y": 0},
            {"id": "m", "type": "mage", "ownerId": "b", "x": 1, "y": 0, "level": 3},
            {"id": "far", "type": "soldier", "ownerId": "b", "x": 2, "y": 0}
        ],
        "players": [
            {"id": "a", "name": "A", "team": "a"},
            {"id": "b", "name": "B", "team": "b"}
        ]
    }"#;
    let mut engine = engine_from(json);
    // mage at level 3: 74 hp, 7 defense; each hit deals 43
    let strike = |id: &str| {
        let (from, to) = (GridCoord::new(0, 0), GridCoord::new(1, 0));
        Command::attack(id, pid("a"), uid("s"), uid("m"), from, to)
    };
    engine.execute(&strike("c1")).unwrap();
    engine.execute(&Command::end_turn("e1", pid("a"))).unwrap();
    engine.execute(&Command::end_turn("e2", pid("b"))).unwrap();
    let report = engine.execute(&strike("c2")).unwrap();

    // 21 damage exp, then 70 kill exp (two levels above) + 21 crosses 100
    assert!(report.events.contains(&BattleEvent::UnitLevelUp {
        unit_id: uid("s"),
        level: 2
    }));
    let soldier = engine.state().unit(&uid("s")).unwrap();
    assert_eq!(soldier.level_info.level, 2);
    assert_eq!(soldier.level_info.exp, 12);
    assert_eq!(soldier.level_info.exp_to_next, 150);
    assert_eq!(soldier.stats.attack, 53);
}
