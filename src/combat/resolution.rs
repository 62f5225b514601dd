//! Single-strike damage resolution
//!
//! Pipeline: evasion, attack (with critical roll), defense (terrain, boosts,
//! armor pierce), damage reduction, floor, life steal, reflect, HP loss.

use crate::battle::units::Unit;
use crate::core::config::RulesConfig;
use crate::core::rng::BattleRng;
use crate::skills::definitions::EffectType;
use crate::skills::effects::{attack_boost, defense_boost, effective_range, passive_effect};

/// Stat modifiers a combatant picked up from triggered hooks for one engagement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrikeModifiers {
    values: Vec<(EffectType, f32)>,
}

impl StrikeModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, effect_type: EffectType, value: f32) {
        match self.values.iter_mut().find(|(t, _)| *t == effect_type) {
            Some((_, total)) => *total += value,
            None => self.values.push((effect_type, value)),
        }
    }

    pub fn get(&self, effect_type: EffectType) -> f32 {
        self.values
            .iter()
            .find(|(t, _)| *t == effect_type)
            .map_or(0.0, |(_, v)| *v)
    }

    pub fn merge(&mut self, other: &StrikeModifiers) {
        for &(effect_type, value) in &other.values {
            self.add(effect_type, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Damage figure before it is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u32,
    pub is_critical: bool,
}

/// Result of one resolved strike
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    pub damage: u32,
    pub is_critical: bool,
    pub evaded: bool,
    pub life_steal: u32,
    pub reflect_damage: u32,
    pub target_died: bool,
    pub striker_died: bool,
}

/// Can `attacker` strike `defender` from where both stand
pub fn can_attack(attacker: &Unit, defender: &Unit) -> bool {
    if attacker.owner_id == defender.owner_id && !attacker.characteristics.can_heal {
        return false;
    }
    attacker.position.distance(&defender.position) <= effective_range(attacker)
}

/// Roll every CRITICAL_HIT effect in order; the first that lands sets the multiplier
pub fn roll_critical(
    attacker: &Unit,
    rng: &mut dyn BattleRng,
    rules: &RulesConfig,
) -> Option<f32> {
    for effect in attacker
        .skills
        .iter()
        .flat_map(|s| s.effects.iter())
        .filter(|e| e.effect_type == EffectType::CriticalHit)
    {
        if rng.chance(effect.chance.unwrap_or(1.0)) {
            let multiplier = if effect.value > 0.0 {
                effect.value
            } else {
                rules.default_crit_multiplier
            };
            return Some(multiplier);
        }
    }
    None
}

/// Attack after boosts and an optional critical multiplier
fn final_attack(attacker: &Unit, mods: &StrikeModifiers, crit_multiplier: f32) -> f32 {
    let boost = attack_boost(attacker) + mods.get(EffectType::AttackBoost);
    attacker.stats.attack as f32 * (1.0 + boost) * crit_multiplier
}

/// Defense after terrain, boosts and the attacker's armor pierce
fn final_defense(
    defender: &Unit,
    terrain_defense_bonus: f32,
    defender_mods: &StrikeModifiers,
    pierce: f32,
) -> f32 {
    let boost = defense_boost(defender) + defender_mods.get(EffectType::DefenseBoost);
    let defense =
        defender.stats.defense as f32 * (1.0 + terrain_defense_bonus) * (1.0 + boost);
    defense * (1.0 - pierce.clamp(0.0, 1.0))
}

/// A strike that connects always deals at least 1, whatever `min_damage` says
fn reduce_and_floor(
    raw: f32,
    defender: &Unit,
    defender_mods: &StrikeModifiers,
    rules: &RulesConfig,
) -> u32 {
    let reduction = (passive_effect(defender, EffectType::DamageReduction)
        + defender_mods.get(EffectType::DamageReduction))
    .clamp(0.0, 1.0);
    let damage = (raw * (1.0 - reduction)).floor();
    damage.max(rules.min_damage.max(1) as f32) as u32
}

/// Damage of one strike, rolling for a critical hit
pub fn calculate_damage(
    attacker: &Unit,
    defender: &Unit,
    terrain_defense_bonus: f32,
    attacker_mods: &StrikeModifiers,
    defender_mods: &StrikeModifiers,
    rng: &mut dyn BattleRng,
    rules: &RulesConfig,
) -> DamageRoll {
    let crit = roll_critical(attacker, rng, rules);
    let attack = final_attack(attacker, attacker_mods, crit.unwrap_or(1.0));
    let pierce = passive_effect(attacker, EffectType::ArmorPierce)
        + attacker_mods.get(EffectType::ArmorPierce);
    let defense = final_defense(defender, terrain_defense_bonus, defender_mods, pierce);
    DamageRoll {
        damage: reduce_and_floor(attack - defense, defender, defender_mods, rules),
        is_critical: crit.is_some(),
    }
}

/// Damage of a skill hit: caster attack scaled by `multiplier`, no critical,
/// evasion, life steal or reflect
pub fn area_damage(
    caster: &Unit,
    target: &Unit,
    terrain_defense_bonus: f32,
    multiplier: f32,
    rules: &RulesConfig,
) -> u32 {
    let none = StrikeModifiers::default();
    let attack = final_attack(caster, &none, 1.0) * multiplier;
    let pierce = passive_effect(caster, EffectType::ArmorPierce);
    let defense = final_defense(target, terrain_defense_bonus, &none, pierce);
    reduce_and_floor(attack - defense, target, &none, rules)
}

/// Resolve one strike and apply its HP changes to both units
pub fn resolve_attack(
    attacker: &mut Unit,
    defender: &mut Unit,
    terrain_defense_bonus: f32,
    attacker_mods: &StrikeModifiers,
    defender_mods: &StrikeModifiers,
    rng: &mut dyn BattleRng,
    rules: &RulesConfig,
) -> DamageOutcome {
    let evasion =
        passive_effect(defender, EffectType::Evasion) + defender_mods.get(EffectType::Evasion);
    if rng.chance(evasion) {
        return DamageOutcome {
            evaded: true,
            ..DamageOutcome::default()
        };
    }

    let roll = calculate_damage(
        attacker,
        defender,
        terrain_defense_bonus,
        attacker_mods,
        defender_mods,
        rng,
        rules,
    );
    let damage = roll.damage;

    let steal_rate = (passive_effect(attacker, EffectType::LifeSteal)
        + attacker_mods.get(EffectType::LifeSteal))
    .max(0.0);
    let life_steal = attacker.heal((damage as f32 * steal_rate).floor() as u32);

    let reflect_rate = (passive_effect(defender, EffectType::ReflectDamage)
        + defender_mods.get(EffectType::ReflectDamage))
    .max(0.0);
    let reflect_damage = (damage as f32 * reflect_rate).floor() as u32;
    let striker_died = reflect_damage > 0 && attacker.take_damage(reflect_damage);

    let target_died = defender.take_damage(damage);

    tracing::debug!(
        attacker = %attacker.id,
        defender = %defender.id,
        damage,
        critical = roll.is_critical,
        life_steal,
        reflect_damage,
        "strike resolved"
    );

    DamageOutcome {
        damage,
        is_critical: roll.is_critical,
        evaded: false,
        life_steal,
        reflect_damage,
        target_died,
        striker_died,
    }
}
