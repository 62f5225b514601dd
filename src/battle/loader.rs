//! Build a battle from a scenario payload (JSON or TOML)
//!
//! The payload lists only non-plain tiles; every other coordinate is Plain.
//! Units are created from the unit type catalog and promoted to their
//! starting level.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::leveling::{exp_to_next, promote_to_level};
use crate::battle::state::{BattleState, Player};
use crate::battle::terrain::{Terrain, TerrainType};
use crate::battle::unit_types::UnitType;
use crate::battle::units::{ActionState, Unit};
use crate::core::config::RulesConfig;
use crate::core::error::ScenarioError;
use crate::core::types::{GridCoord, PlayerId, UnitId};

/// Payload version this loader understands
pub const SCENARIO_VERSION: u32 = 1;

/// Largest grid a payload may describe, in tiles
pub const MAX_GRID_TILES: u32 = 1 << 20;

/// Tile terrain as written in a payload: a bare kind such as `"FOREST"`, or a
/// full `{terrainType, moveCost, defenseBonus}` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileTerrain {
    Kind(TerrainType),
    Detailed(Terrain),
}

impl From<TerrainType> for TileTerrain {
    fn from(kind: TerrainType) -> Self {
        TileTerrain::Kind(kind)
    }
}

/// One non-plain tile. Costs default to the terrain catalog; the flat
/// `moveCost`/`defenseBonus` fields override either terrain form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilePayload {
    pub x: i32,
    pub y: i32,
    pub terrain: TileTerrain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_bonus: Option<f32>,
}

impl TilePayload {
    fn to_terrain(&self) -> Terrain {
        let mut terrain = match self.terrain {
            TileTerrain::Kind(kind) => kind.terrain(),
            TileTerrain::Detailed(terrain) => terrain,
        };
        if let Some(cost) = self.move_cost {
            terrain.move_cost = cost;
        }
        if let Some(bonus) = self.defense_bonus {
            terrain.defense_bonus = bonus;
        }
        terrain
    }
}

fn default_level() -> u32 {
    1
}

/// A unit to place at battle start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPlacement {
    pub id: UnitId,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub owner_id: PlayerId,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Display name override; defaults to the unit type's name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub ai_controlled: bool,
}

/// Level/config payload a battle is created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPayload {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub tiles: Vec<TilePayload>,
    pub units: Vec<UnitPlacement>,
    pub players: Vec<PlayerPayload>,
}

impl ScenarioPayload {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a payload from disk, choosing the format by file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            Some("toml") => Self::from_toml_str(&contents),
            other => Err(ScenarioError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn invalid(message: impl Into<String>) -> ScenarioError {
    ScenarioError::Invalid(message.into())
}

/// Validate a payload and build the initial battle state.
/// The first listed player moves first.
pub fn build_state(
    payload: &ScenarioPayload,
    rules: &RulesConfig,
) -> Result<BattleState, ScenarioError> {
    if payload.version != SCENARIO_VERSION {
        return Err(ScenarioError::UnsupportedVersion {
            found: payload.version,
            expected: SCENARIO_VERSION,
        });
    }
    if payload.width == 0 || payload.height == 0 {
        return Err(invalid("grid dimensions must be positive"));
    }
    let cells = payload
        .width
        .checked_mul(payload.height)
        .filter(|&cells| cells <= MAX_GRID_TILES)
        .ok_or_else(|| {
            invalid(format!(
                "grid {}x{} exceeds {MAX_GRID_TILES} tiles",
                payload.width, payload.height
            ))
        })?;
    let in_bounds = |x: i32, y: i32| {
        x >= 0 && y >= 0 && (x as u32) < payload.width && (y as u32) < payload.height
    };

    let players = build_players(payload)?;

    let mut tiles = vec![Terrain::default(); cells as usize];
    let mut seen_tiles = HashSet::new();
    for tile in &payload.tiles {
        let coord = GridCoord::new(tile.x, tile.y);
        if !in_bounds(tile.x, tile.y) {
            return Err(invalid(format!("tile {coord} is out of bounds")));
        }
        if !seen_tiles.insert(coord) {
            return Err(invalid(format!("tile {coord} is listed twice")));
        }
        let terrain = tile.to_terrain();
        if terrain.move_cost == 0 {
            return Err(invalid(format!("tile {coord} has a zero move cost")));
        }
        tiles[(tile.y as u32 * payload.width + tile.x as u32) as usize] = terrain;
    }

    let first_player = players.first().map(|p| p.id.clone());
    let mut seen_ids = HashSet::new();
    let mut seen_positions = HashSet::new();
    let mut units = Vec::with_capacity(payload.units.len());
    for placement in &payload.units {
        let coord = GridCoord::new(placement.x, placement.y);
        if !seen_ids.insert(placement.id.clone()) {
            return Err(invalid(format!("duplicate unit id {}", placement.id)));
        }
        if !in_bounds(placement.x, placement.y) {
            return Err(invalid(format!("unit {} is out of bounds at {coord}", placement.id)));
        }
        if !seen_positions.insert(coord) {
            return Err(invalid(format!("two units share {coord}")));
        }
        if !players.iter().any(|p| p.id == placement.owner_id) {
            return Err(invalid(format!(
                "unit {} belongs to unknown player {}",
                placement.id, placement.owner_id
            )));
        }
        if placement.level == 0 || placement.level > rules.max_level {
            return Err(invalid(format!(
                "unit {} has level {} outside 1..={}",
                placement.id, placement.level, rules.max_level
            )));
        }

        let mut unit = Unit::from_template(
            placement.id.clone(),
            placement.owner_id.clone(),
            placement.unit_type,
            coord,
            exp_to_next(1, rules),
            rules.max_level,
        );
        if let Some(name) = &placement.name {
            unit.name = name.clone();
        }
        promote_to_level(&mut unit, placement.level, rules);
        if first_player.as_ref() != Some(&unit.owner_id) {
            unit.action_state = ActionState::exhausted();
        }
        units.push(unit);
    }

    tracing::info!(
        width = payload.width,
        height = payload.height,
        units = units.len(),
        players = players.len(),
        "scenario loaded"
    );
    Ok(BattleState::new(payload.width, payload.height, tiles, units, players))
}

fn build_players(payload: &ScenarioPayload) -> Result<Vec<Player>, ScenarioError> {
    if payload.players.is_empty() {
        return Err(invalid("at least one player is required"));
    }
    let mut seen = HashSet::new();
    payload
        .players
        .iter()
        .map(|p| {
            if !seen.insert(p.id.clone()) {
                return Err(invalid(format!("duplicate player id {}", p.id)));
            }
            Ok(Player {
                id: p.id.clone(),
                name: p.name.clone(),
                team: p.team.clone(),
                ai_controlled: p.ai_controlled,
                is_active: false,
            })
        })
        .collect()
}

/// Parse and build in one step
pub fn load_scenario(
    path: impl AsRef<Path>,
    rules: &RulesConfig,
) -> Result<BattleState, ScenarioError> {
    let payload = ScenarioPayload::load(path)?;
    build_state(&payload, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIRMISH: &str = r#"{
        "version": 1,
        "width": 5,
        "height": 4,
        "tiles": [
            {"x": 2, "y": 1, "terrain": "FOREST"},
            {"x": 2, "y": 2, "terrain": "WATER"},
            {"x": 4, "y": 3, "terrain": "CASTLE", "defenseBonus": 0.5},
            {
                "x": 1,
                "y": 3,
                "terrain": {"terrainType": "MOUNTAIN", "moveCost": 4, "defenseBonus": 0.25}
            }
        ],
        "units": [
            {"id": "k1", "type": "knight", "ownerId": "blue", "x": 0, "y": 0},
            {"id": "m1", "type": "mage", "ownerId": "red", "x": 4, "y": 3, "level": 3}
        ],
        "players": [
            {"id": "blue", "name": "Blue", "team": "blue"},
            {"id": "red", "name": "Red", "team": "red", "aiControlled": true}
        ]
    }"#;

    fn payload() -> ScenarioPayload {
        ScenarioPayload::from_json_str(SKIRMISH).unwrap()
    }

    #[test]
    fn test_build_from_json() {
        let rules = RulesConfig::default();
        let state = build_state(&payload(), &rules).unwrap();
        assert_eq!(state.width, 5);
        assert_eq!(state.tiles().len(), 20);
        assert_eq!(
            state.terrain_at(GridCoord::new(2, 1)).unwrap().terrain_type,
            TerrainType::Forest
        );
        assert!(state.terrain_at(GridCoord::new(2, 2)).unwrap().is_impassable());
        assert_eq!(state.defense_bonus_at(GridCoord::new(4, 3)), 0.5);
        assert_eq!(
            state.terrain_at(GridCoord::new(0, 3)).unwrap().terrain_type,
            TerrainType::Plain
        );
        assert!(state.players[0].is_active);
        assert!(state.players[1].ai_controlled);
    }

    #[test]
    fn test_nested_terrain_object() {
        let state = build_state(&payload(), &RulesConfig::default()).unwrap();
        let terrain = state.terrain_at(GridCoord::new(1, 3)).unwrap();
        assert_eq!(terrain.terrain_type, TerrainType::Mountain);
        assert_eq!(terrain.move_cost, 4);
        assert_eq!(terrain.defense_bonus, 0.25);

        let tile: TilePayload = serde_json::from_str(
            r#"{
                "x": 0,
                "y": 0,
                "terrain": {"terrainType": "FOREST", "moveCost": 3, "defenseBonus": 0.1},
                "moveCost": 5
            }"#,
        )
        .unwrap();
        assert_eq!(tile.to_terrain().move_cost, 5);
        assert_eq!(tile.to_terrain().defense_bonus, 0.1);
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let rules = RulesConfig::default();
        let mut huge = payload();
        huge.width = 70_000;
        huge.height = 70_000;
        assert!(matches!(build_state(&huge, &rules), Err(ScenarioError::Invalid(_))));

        let mut wide = payload();
        wide.width = MAX_GRID_TILES + 1;
        wide.height = 1;
        assert!(matches!(build_state(&wide, &rules), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn test_only_first_player_can_act() {
        let state = build_state(&payload(), &RulesConfig::default()).unwrap();
        assert_eq!(state.units[0].action_state, ActionState::ready());
        assert_eq!(state.units[1].action_state, ActionState::exhausted());
    }

    #[test]
    fn test_starting_level_applies_growth() {
        let rules = RulesConfig::default();
        let state = build_state(&payload(), &rules).unwrap();
        let mage = &state.units[1];
        assert_eq!(mage.level_info.level, 3);
        assert_eq!(mage.level_info.exp, 0);
        assert_eq!(mage.level_info.exp_to_next, 225);
        // two growth steps of +2 hp / +5 attack / +1 defense
        assert_eq!(mage.stats.max_hp, 74);
        assert_eq!(mage.stats.hp, 74);
        assert_eq!(mage.stats.attack, 70);
        assert_eq!(mage.stats.defense, 7);
    }

    #[test]
    fn test_rejects_bad_version() {
        let mut payload = payload();
        payload.version = 2;
        assert!(matches!(
            build_state(&payload, &RulesConfig::default()),
            Err(ScenarioError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_rejects_structural_problems() {
        let rules = RulesConfig::default();

        let mut dup_tile = payload();
        dup_tile.tiles.push(dup_tile.tiles[0].clone());
        assert!(build_state(&dup_tile, &rules).is_err());

        let mut stacked = payload();
        stacked.units[1].x = 0;
        stacked.units[1].y = 0;
        assert!(build_state(&stacked, &rules).is_err());

        let mut orphan = payload();
        orphan.units[0].owner_id = PlayerId::new("green");
        assert!(build_state(&orphan, &rules).is_err());

        let mut outside = payload();
        outside.units[0].x = 5;
        assert!(build_state(&outside, &rules).is_err());

        let mut too_high = payload();
        too_high.units[0].level = 21;
        assert!(build_state(&too_high, &rules).is_err());

        let mut free_move = payload();
        free_move.tiles[0].move_cost = Some(0);
        assert!(build_state(&free_move, &rules).is_err());

        let mut nobody = payload();
        nobody.players.clear();
        nobody.units.clear();
        assert!(build_state(&nobody, &rules).is_err());
    }

    #[test]
    fn test_toml_payload() {
        let toml = r#"
            version = 1
            width = 3
            height = 3

            [[units]]
            id = "s1"
            type = "soldier"
            ownerId = "a"
            x = 0
            y = 0

            [[units]]
            id = "s2"
            type = "archer"
            ownerId = "b"
            x = 2
            y = 2

            [[players]]
            id = "a"
            name = "A"
            team = "a"

            [[players]]
            id = "b"
            name = "B"
            team = "b"
        "#;
        let payload = ScenarioPayload::from_toml_str(toml).unwrap();
        let state = build_state(&payload, &RulesConfig::default()).unwrap();
        assert_eq!(state.units.len(), 2);
        assert_eq!(state.units[1].unit_type, UnitType::Archer);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            ScenarioPayload::from_json_str("{\"version\": 1"),
            Err(ScenarioError::SerdeError(_))
        ));
    }
}
