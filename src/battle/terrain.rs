//! Battle terrain types and their effects
//!
//! Terrain slows movement and hardens defense. Water cannot be crossed on foot.

use serde::{Deserialize, Serialize};

/// Movement cost treated as impassable for any realistic move budget
pub const IMPASSABLE_COST: u32 = 999;

/// Terrain kind of a grid tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerrainType {
    #[default]
    Plain,    // No penalty, no cover
    Forest,   // Slow, light cover
    Mountain, // Very slow, good cover
    Water,    // Impassable without flight
    Castle,   // Open ground, best cover
}

impl TerrainType {
    /// Movement cost to enter a tile of this kind
    pub fn move_cost(&self) -> u32 {
        match self {
            TerrainType::Plain => 1,
            TerrainType::Forest => 2,
            TerrainType::Mountain => 3,
            TerrainType::Water => IMPASSABLE_COST,
            TerrainType::Castle => 1,
        }
    }

    /// Fractional defense bonus (0.2 = +20% defense)
    pub fn defense_bonus(&self) -> f32 {
        match self {
            TerrainType::Plain => 0.0,
            TerrainType::Forest => 0.1,
            TerrainType::Mountain => 0.2,
            TerrainType::Water => 0.0,
            TerrainType::Castle => 0.3,
        }
    }

    /// Catalog terrain for this kind
    pub fn terrain(self) -> Terrain {
        Terrain {
            terrain_type: self,
            move_cost: self.move_cost(),
            defense_bonus: self.defense_bonus(),
        }
    }

    pub fn all() -> [TerrainType; 5] {
        [
            TerrainType::Plain,
            TerrainType::Forest,
            TerrainType::Mountain,
            TerrainType::Water,
            TerrainType::Castle,
        ]
    }
}

/// Terrain of one tile. Payloads may override the catalog costs per tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terrain {
    pub terrain_type: TerrainType,
    pub move_cost: u32,
    pub defense_bonus: f32,
}

impl Terrain {
    pub fn is_impassable(&self) -> bool {
        self.move_cost >= IMPASSABLE_COST
    }
}

impl Default for Terrain {
    fn default() -> Self {
        TerrainType::Plain.terrain()
    }
}
