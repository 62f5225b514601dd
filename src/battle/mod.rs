//! Battle system - grid tactics on a single shared battle state
//!
//! Units move over weighted terrain, trade blows and cast skills, one
//! player turn at a time. All randomness comes from an injected roll source.

pub mod context;
pub mod engine;
pub mod events;
pub mod leveling;
pub mod loader;
pub mod pathfinding;
pub mod state;
pub mod terrain;
pub mod turns;
pub mod unit_types;
pub mod units;
pub mod victory;

// Re-exports for convenient access
pub use context::Resolution;
pub use engine::{BattleEngine, EventSubscriber};
pub use events::{BattleEvent, DeathCause, EventLog};
pub use leveling::{
    add_exp, can_level_up, damage_exp, exp_to_next, kill_exp, level_progress, promote_to_level,
};
pub use loader::{
    build_state, load_scenario, PlayerPayload, ScenarioPayload, TilePayload, TileTerrain,
    UnitPlacement, MAX_GRID_TILES, SCENARIO_VERSION,
};
pub use pathfinding::{attackable_area, find_path, movable_area, path_cost};
pub use state::{BattleState, Player};
pub use terrain::{Terrain, TerrainType, IMPASSABLE_COST};
pub use turns::{end_turn, TurnReport};
pub use unit_types::{BaseStats, Characteristics, GrowthRates, UnitTemplate, UnitType};
pub use units::{ActionState, ActiveEffect, LevelInfo, Unit, UnitStats};
pub use victory::{check_victory, VictoryReason, VictoryStatus};
