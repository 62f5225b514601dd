//! Effect queries and timed-effect bookkeeping
//!
//! Combat and pathfinding read a unit's modifiers through these functions
//! rather than inspecting skills directly.

use crate::battle::terrain::TerrainType;
use crate::battle::units::{ActiveEffect, Unit};
use crate::core::types::UnitId;
use crate::skills::definitions::{EffectType, SkillCondition, SkillEffect};

/// Always-on passive skill values plus matching active effects
pub fn passive_effect(unit: &Unit, effect_type: EffectType) -> f32 {
    let from_skills: f32 = unit
        .skills
        .iter()
        .filter(|s| s.is_always_on())
        .flat_map(|s| s.effects.iter())
        .filter(|e| e.effect_type == effect_type)
        .map(|e| e.value)
        .sum();
    let from_active: f32 = unit
        .active_effects
        .iter()
        .filter(|e| e.effect_type == effect_type)
        .map(|e| e.value)
        .sum();
    from_skills + from_active
}

/// Does any skill the unit owns declare this effect type
pub fn has_effect(unit: &Unit, effect_type: EffectType) -> bool {
    unit.skills
        .iter()
        .flat_map(|s| s.effects.iter())
        .any(|e| e.effect_type == effect_type)
}

/// Fractional attack modifier: permanent boosts plus attack buffs
pub fn attack_boost(unit: &Unit) -> f32 {
    passive_effect(unit, EffectType::AttackBoost) + passive_effect(unit, EffectType::BuffAttack)
}

/// Fractional defense modifier: permanent boosts plus defense buffs
pub fn defense_boost(unit: &Unit) -> f32 {
    passive_effect(unit, EffectType::DefenseBoost) + passive_effect(unit, EffectType::BuffDefense)
}

/// Move budget after boosts and slows, floored at 0
pub fn effective_move(unit: &Unit) -> u32 {
    let modifier = passive_effect(unit, EffectType::MoveBoost)
        + passive_effect(unit, EffectType::BuffMove)
        - passive_effect(unit, EffectType::Slow);
    (unit.stats.movement as f32 + modifier).floor().max(0.0) as u32
}

/// Attack range after boosts, floored at 0
pub fn effective_range(unit: &Unit) -> u32 {
    let modifier = passive_effect(unit, EffectType::RangeBoost);
    (unit.stats.range as f32 + modifier).floor().max(0.0) as u32
}

pub fn can_fly(unit: &Unit) -> bool {
    unit.characteristics.can_fly || has_effect(unit, EffectType::Fly)
}

pub fn ignores_terrain(unit: &Unit) -> bool {
    unit.characteristics.ignores_terrain || has_effect(unit, EffectType::IgnoreTerrain)
}

pub fn is_terrain_master(unit: &Unit) -> bool {
    has_effect(unit, EffectType::TerrainMaster)
}

pub fn is_immune(unit: &Unit) -> bool {
    has_effect(unit, EffectType::Immunity) || unit.has_active_effect(EffectType::Immunity)
}

/// Attach a timed effect. Debuffs bounce off immune units.
pub fn add_active_effect(
    unit: &mut Unit,
    effect: &SkillEffect,
    source_skill_id: &str,
    source_unit_id: &UnitId,
) -> bool {
    if effect.effect_type.is_debuff() && is_immune(unit) {
        return false;
    }
    unit.active_effects.push(ActiveEffect {
        effect_type: effect.effect_type,
        value: effect.value,
        duration: effect.duration.unwrap_or(1),
        source_skill_id: source_skill_id.to_string(),
        source_unit_id: source_unit_id.clone(),
    });
    true
}

/// Remove every debuff, returning how many were removed
pub fn cleanse(unit: &mut Unit) -> usize {
    let before = unit.active_effects.len();
    unit.active_effects.retain(|e| !e.effect_type.is_debuff());
    before - unit.active_effects.len()
}

/// Count down every active effect once, dropping expired ones
pub fn tick_durations(unit: &mut Unit) {
    for effect in &mut unit.active_effects {
        effect.duration = effect.duration.saturating_sub(1);
    }
    unit.active_effects.retain(|e| e.duration > 0);
}

/// Evaluate a condition against a unit standing on `terrain`
pub fn condition_met(unit: &Unit, condition: &SkillCondition, terrain: TerrainType) -> bool {
    let hp_percent = unit.hp_fraction() * 100.0;
    if condition.min_hp_percent.is_some_and(|min| hp_percent < min) {
        return false;
    }
    if condition.max_hp_percent.is_some_and(|max| hp_percent > max) {
        return false;
    }
    if condition
        .min_level
        .is_some_and(|min| unit.level_info.level < min)
    {
        return false;
    }
    if !condition.required_terrain.is_empty() && !condition.required_terrain.contains(&terrain) {
        return false;
    }
    if !condition.required_unit_type.is_empty()
        && !condition.required_unit_type.contains(&unit.unit_type)
    {
        return false;
    }
    true
}
