//! Unit type catalog
//!
//! Maps a unit type to its level-1 stats, growth per level, starting
//! skills and movement traits.

use serde::{Deserialize, Serialize};

/// Kind of unit a scenario can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Soldier,
    Archer,
    Knight,
    Cavalry,
    Mage,
    Flyer,
    Healer,
}

/// Level-1 stat line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub movement: u32,
    pub range: u32,
    pub mana: Option<u32>,
}

/// Per-level stat increases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrowthRates {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
}

/// Innate movement and support traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Characteristics {
    pub can_fly: bool,
    pub ignores_terrain: bool,
    pub can_heal: bool,
}

/// Everything the catalog knows about a unit type
#[derive(Debug, Clone, Copy)]
pub struct UnitTemplate {
    pub name: &'static str,
    pub stats: BaseStats,
    pub growth: GrowthRates,
    pub skill_ids: &'static [&'static str],
    pub characteristics: Characteristics,
}

impl UnitType {
    pub fn template(&self) -> UnitTemplate {
        match self {
            UnitType::Soldier => UnitTemplate {
                name: "Soldier",
                stats: stats(100, 50, 10, 4, 1, None),
                growth: growth(5, 3, 2),
                skill_ids: &["critical_strike", "power_strike"],
                characteristics: Characteristics::default(),
            },
            UnitType::Archer => UnitTemplate {
                name: "Archer",
                stats: stats(80, 40, 6, 3, 2, None),
                growth: growth(3, 4, 1),
                skill_ids: &["critical_strike", "swift"],
                characteristics: Characteristics::default(),
            },
            UnitType::Knight => UnitTemplate {
                name: "Knight",
                stats: stats(120, 45, 15, 5, 1, None),
                growth: growth(6, 3, 3),
                skill_ids: &["iron_wall", "counter", "shield_bash"],
                characteristics: Characteristics::default(),
            },
            UnitType::Cavalry => UnitTemplate {
                name: "Cavalry",
                stats: stats(110, 55, 8, 6, 1, None),
                growth: growth(5, 4, 1),
                skill_ids: &["swift", "berserker"],
                characteristics: Characteristics {
                    ignores_terrain: true,
                    ..Characteristics::default()
                },
            },
            UnitType::Mage => UnitTemplate {
                name: "Mage",
                stats: stats(70, 60, 5, 3, 3, Some(50)),
                growth: growth(2, 5, 1),
                skill_ids: &["chain_lightning", "fire_storm"],
                characteristics: Characteristics::default(),
            },
            UnitType::Flyer => UnitTemplate {
                name: "Flyer",
                stats: stats(90, 35, 7, 5, 1, None),
                growth: growth(4, 3, 1),
                skill_ids: &["terrain_adapt"],
                characteristics: Characteristics {
                    can_fly: true,
                    ..Characteristics::default()
                },
            },
            UnitType::Healer => UnitTemplate {
                name: "Healer",
                stats: stats(75, 20, 8, 3, 1, Some(40)),
                growth: growth(3, 1, 2),
                skill_ids: &["heal", "group_heal", "regeneration"],
                characteristics: Characteristics {
                    can_heal: true,
                    ..Characteristics::default()
                },
            },
        }
    }

    pub fn all() -> [UnitType; 7] {
        [
            UnitType::Soldier,
            UnitType::Archer,
            UnitType::Knight,
            UnitType::Cavalry,
            UnitType::Mage,
            UnitType::Flyer,
            UnitType::Healer,
        ]
    }
}

const fn stats(
    hp: u32,
    attack: u32,
    defense: u32,
    movement: u32,
    range: u32,
    mana: Option<u32>,
) -> BaseStats {
    BaseStats {
        hp,
        attack,
        defense,
        movement,
        range,
        mana,
    }
}

const fn growth(hp: u32, attack: u32, defense: u32) -> GrowthRates {
    GrowthRates { hp, attack, defense }
}
