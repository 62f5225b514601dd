//! Battle units: stats, progression, owned skills and temporary effects

use serde::{Deserialize, Serialize};

use crate::battle::unit_types::{Characteristics, GrowthRates, UnitType};
use crate::core::types::{GridCoord, PlayerId, UnitId};
use crate::skills::definitions::{EffectType, Skill};
use crate::skills::library::skills_for;

/// Current combat stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_hp: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub movement: u32,
    pub range: u32,
    pub mana: Option<u32>,
    pub max_mana: Option<u32>,
}

/// Level and experience progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub max_level: u32,
}

/// Remaining capabilities for the current turn (true = still available)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    pub can_move: bool,
    pub can_attack: bool,
    pub is_stunned: bool,
}

impl ActionState {
    pub fn ready() -> Self {
        Self {
            can_move: true,
            can_attack: true,
            is_stunned: false,
        }
    }

    pub fn exhausted() -> Self {
        Self {
            can_move: false,
            can_attack: false,
            is_stunned: false,
        }
    }
}

/// A timed buff or debuff currently on a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect_type: EffectType,
    pub value: f32,
    /// Turns left; ticks down at the owner's turn start
    pub duration: u32,
    pub source_skill_id: String,
    /// Attribution only
    pub source_unit_id: UnitId,
}

/// A unit on the battlefield. Dead units stay in the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner_id: PlayerId,
    pub name: String,
    pub unit_type: UnitType,
    pub position: GridCoord,
    pub stats: UnitStats,
    pub level_info: LevelInfo,
    pub growth_rates: GrowthRates,
    pub skills: Vec<Skill>,
    pub active_effects: Vec<ActiveEffect>,
    pub alive: bool,
    pub action_state: ActionState,
    pub characteristics: Characteristics,
}

impl Unit {
    /// Build a level-1 unit from the unit type catalog
    pub fn from_template(
        id: UnitId,
        owner_id: PlayerId,
        unit_type: UnitType,
        position: GridCoord,
        exp_to_next: u32,
        max_level: u32,
    ) -> Self {
        let template = unit_type.template();
        let base = template.stats;
        Self {
            id,
            owner_id,
            name: template.name.to_string(),
            unit_type,
            position,
            stats: UnitStats {
                max_hp: base.hp,
                hp: base.hp,
                attack: base.attack,
                defense: base.defense,
                movement: base.movement,
                range: base.range,
                mana: base.mana,
                max_mana: base.mana,
            },
            level_info: LevelInfo {
                level: 1,
                exp: 0,
                exp_to_next,
                max_level,
            },
            growth_rates: template.growth,
            skills: skills_for(template.skill_ids),
            active_effects: Vec::new(),
            alive: true,
            action_state: ActionState::ready(),
            characteristics: template.characteristics,
        }
    }

    pub fn is_injured(&self) -> bool {
        self.stats.hp < self.stats.max_hp
    }

    /// HP as a fraction of max HP
    pub fn hp_fraction(&self) -> f32 {
        if self.stats.max_hp == 0 {
            return 0.0;
        }
        self.stats.hp as f32 / self.stats.max_hp as f32
    }

    /// Lose HP, floored at 0. Returns true only on the hit that kills.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.stats.hp = self.stats.hp.saturating_sub(amount);
        if self.stats.hp == 0 {
            self.alive = false;
            self.action_state = ActionState::exhausted();
            return true;
        }
        false
    }

    /// Gain HP capped at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let restored = amount.min(self.stats.max_hp - self.stats.hp);
        self.stats.hp += restored;
        restored
    }

    /// Apply one level of growth: max HP, HP (capped), attack, defense
    pub fn apply_growth(&mut self) {
        let growth = self.growth_rates;
        self.stats.max_hp += growth.hp;
        self.stats.hp = (self.stats.hp + growth.hp).min(self.stats.max_hp);
        self.stats.attack += growth.attack;
        self.stats.defense += growth.defense;
    }

    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == skill_id)
    }

    pub fn skill_index(&self, skill_id: &str) -> Option<usize> {
        self.skills.iter().position(|s| s.id == skill_id)
    }

    pub fn has_active_effect(&self, effect_type: EffectType) -> bool {
        self.active_effects
            .iter()
            .any(|e| e.effect_type == effect_type)
    }
}
