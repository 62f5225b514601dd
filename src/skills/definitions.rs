//! Skill definition types
//!
//! A skill is plain data: a trigger, a list of effects and, for active
//! skills, a cooldown and mana cost. Units own clones of catalog skills.

use serde::{Deserialize, Serialize};

use crate::battle::terrain::TerrainType;
use crate::battle::unit_types::UnitType;

/// Whether the skill is cast by command or read continuously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillType {
    Passive,
    Active,
}

/// When a skill's effects are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerTiming {
    Always,
    OnAttack,
    OnDefend,
    OnKill,
    OnDamaged,
    OnTurnStart,
    OnTurnEnd,
    OnMove,
    OnHpLow,
    Manual,
}

/// Closed set of effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    // Attribute modifiers
    AttackBoost,
    DefenseBoost,
    HpBoost,
    MoveBoost,
    RangeBoost,

    // Combat
    CriticalHit,
    CounterAttack,
    FirstStrike,
    DoubleAttack,
    LifeSteal,
    ArmorPierce,

    // Terrain and movement
    TerrainMaster,
    IgnoreTerrain,
    Fly,
    TeleportAbility,

    // Support
    Heal,
    Regeneration,
    BuffAttack,
    BuffDefense,
    BuffMove,
    Cleanse,

    // Area and status
    AreaAttack,
    SplashDamage,
    ChainAttack,
    Stun,
    Slow,
    Poison,
    Burn,

    // Protection
    Shield,
    DamageReduction,
    Evasion,
    Immunity,
    ReflectDamage,

    // Special
    Summon,
    Sacrifice,
    Transform,
    Resurrect,
}

impl EffectType {
    /// Negative statuses removed by CLEANSE and blocked by IMMUNITY
    pub fn is_debuff(&self) -> bool {
        matches!(
            self,
            EffectType::Slow | EffectType::Stun | EffectType::Poison | EffectType::Burn
        )
    }

    /// Damage applied at the start of the afflicted unit's turn
    pub fn is_damage_over_time(&self) -> bool {
        matches!(self, EffectType::Poison | EffectType::Burn)
    }

    /// Flags read directly by the combat ordering rather than summed
    pub fn is_combat_flag(&self) -> bool {
        matches!(
            self,
            EffectType::CriticalHit
                | EffectType::CounterAttack
                | EffectType::FirstStrike
                | EffectType::DoubleAttack
        )
    }

    /// Stat effects that a combat hook turns into an engagement modifier
    pub fn is_engagement_modifier(&self) -> bool {
        matches!(
            self,
            EffectType::AttackBoost
                | EffectType::DefenseBoost
                | EffectType::LifeSteal
                | EffectType::ArmorPierce
                | EffectType::DamageReduction
                | EffectType::Evasion
                | EffectType::ReflectDamage
        )
    }

    /// Direct damage scaled off the caster's attack
    pub fn is_direct_damage(&self) -> bool {
        matches!(
            self,
            EffectType::AreaAttack | EffectType::SplashDamage | EffectType::ChainAttack
        )
    }
}

/// Scope an effect applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    #[serde(rename = "SELF")]
    SelfUnit,
    Ally,
    AllyAll,
    Enemy,
    EnemyAll,
    Any,
    Area,
    Tile,
}

impl TargetType {
    /// Target types that resolve against a chosen grid position
    pub fn needs_position(&self) -> bool {
        matches!(
            self,
            TargetType::Ally
                | TargetType::Enemy
                | TargetType::Any
                | TargetType::Area
                | TargetType::Tile
        )
    }
}

/// Gate evaluated against each target before an effect applies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCondition {
    pub min_hp_percent: Option<f32>,
    pub max_hp_percent: Option<f32>,
    pub min_level: Option<u32>,
    #[serde(default)]
    pub required_terrain: Vec<TerrainType>,
    #[serde(default)]
    pub required_unit_type: Vec<UnitType>,
}

/// One effect of a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub effect_type: EffectType,
    pub value: f32,
    pub duration: Option<u32>,
    /// Trigger probability in 0..=1; `None` always fires
    pub chance: Option<f32>,
    pub target_type: TargetType,
    pub condition: Option<SkillCondition>,
}

impl SkillEffect {
    pub fn new(effect_type: EffectType, value: f32, target_type: TargetType) -> Self {
        Self {
            effect_type,
            value,
            duration: None,
            chance: None,
            target_type,
            condition: None,
        }
    }

    pub fn with_duration(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self
    }

    pub fn with_chance(mut self, chance: f32) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn with_condition(mut self, condition: SkillCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A skill instance owned by one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub skill_type: SkillType,
    pub trigger: TriggerTiming,
    pub effects: Vec<SkillEffect>,
    pub range: u32,
    pub cooldown: u32,
    pub current_cooldown: u32,
    pub mana_cost: u32,
}

impl Skill {
    pub fn is_active(&self) -> bool {
        self.skill_type == SkillType::Active
    }

    /// Passive skills summed continuously into stat calculations
    pub fn is_always_on(&self) -> bool {
        self.skill_type == SkillType::Passive && self.trigger == TriggerTiming::Always
    }

    /// The effect that decides how a cast resolves its targets: the first
    /// one reaching beyond the caster, else the first effect.
    pub fn primary_effect(&self) -> Option<&SkillEffect> {
        self.effects
            .iter()
            .find(|e| e.target_type != TargetType::SelfUnit)
            .or_else(|| self.effects.first())
    }
}
