//! Skill resolution: readiness checks, casting and effect application

use serde::{Deserialize, Serialize};

use crate::battle::context::Resolution;
use crate::battle::events::BattleEvent;
use crate::battle::units::Unit;
use crate::combat::engagement::resolve_death;
use crate::combat::resolution::area_damage;
use crate::core::error::{CommandError, Result};
use crate::core::types::UnitId;
use crate::skills::definitions::{EffectType, Skill, SkillEffect};
use crate::skills::effects::{add_active_effect, cleanse, condition_met};
use crate::skills::targeting::filter_targets;

/// What a cast did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillReport {
    pub skill_id: String,
    pub caster_id: UnitId,
    pub target_ids: Vec<UnitId>,
    pub affected_unit_ids: Vec<UnitId>,
    pub total_damage: u32,
    pub total_healing: u32,
}

/// Totals from applying one effect
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectTally {
    pub affected: Vec<usize>,
    pub damage: u32,
    pub healing: u32,
}

/// Why a skill cannot be cast right now, if anything
pub fn skill_readiness(unit: &Unit, skill: &Skill) -> Result<()> {
    if !skill.is_active() {
        return Err(CommandError::NotActiveSkill(skill.id.clone()));
    }
    if skill.current_cooldown > 0 {
        return Err(CommandError::OnCooldown {
            skill: skill.id.clone(),
            remaining: skill.current_cooldown,
        });
    }
    if let Some(mana) = unit.stats.mana {
        if mana < skill.mana_cost {
            return Err(CommandError::InsufficientMana {
                required: skill.mana_cost,
                available: mana,
            });
        }
    }
    Ok(())
}

/// Active skills the unit could cast this moment
pub fn available_active_skills(unit: &Unit) -> Vec<&Skill> {
    unit.skills
        .iter()
        .filter(|s| skill_readiness(unit, s).is_ok())
        .collect()
}

/// Cast an active skill at pre-collected targets.
/// Fails without mutating anything when the skill is not ready.
pub fn use_skill(
    res: &mut Resolution<'_>,
    caster: usize,
    skill_id: &str,
    targets: &[usize],
) -> Result<SkillReport> {
    let unit = res
        .state
        .units
        .get(caster)
        .ok_or_else(|| CommandError::Malformed(format!("caster index {caster} out of range")))?;
    let skill_index = unit
        .skill_index(skill_id)
        .ok_or_else(|| CommandError::SkillNotFound(skill_id.to_string()))?;
    let skill = unit.skills[skill_index].clone();
    skill_readiness(unit, &skill)?;

    let caster_id = unit.id.clone();
    {
        let unit = &mut res.state.units[caster];
        if let Some(mana) = unit.stats.mana.as_mut() {
            *mana = mana.saturating_sub(skill.mana_cost);
        }
        unit.skills[skill_index].current_cooldown = skill.cooldown;
    }

    let target_ids: Vec<UnitId> = targets
        .iter()
        .filter_map(|&i| res.state.units.get(i).map(|u| u.id.clone()))
        .collect();
    res.emit(BattleEvent::SkillActivated {
        unit_id: caster_id.clone(),
        skill_id: skill.id.clone(),
        target_ids: target_ids.clone(),
    });
    tracing::debug!(caster = %caster_id, skill = %skill.id, targets = targets.len(), "skill cast");

    let mut report = SkillReport {
        skill_id: skill.id.clone(),
        caster_id,
        target_ids,
        ..SkillReport::default()
    };
    let mut affected: Vec<usize> = Vec::new();
    for effect in &skill.effects {
        let filtered = filter_targets(res.state, caster, effect.target_type, targets);
        let tally = apply_effect(res, caster, &skill.id, effect, &filtered);
        report.total_damage += tally.damage;
        report.total_healing += tally.healing;
        for index in tally.affected {
            if !affected.contains(&index) {
                affected.push(index);
            }
        }
    }
    report.affected_unit_ids = affected
        .into_iter()
        .map(|i| res.state.units[i].id.clone())
        .collect();
    Ok(report)
}

/// Apply one effect from `source` to each target that passes its chance
/// roll and condition
pub fn apply_effect(
    res: &mut Resolution<'_>,
    source: usize,
    skill_id: &str,
    effect: &SkillEffect,
    targets: &[usize],
) -> EffectTally {
    let mut tally = EffectTally::default();
    let Some(source_id) = res.state.units.get(source).map(|u| u.id.clone()) else {
        return tally;
    };

    for &target in targets {
        let Some(unit) = res.state.units.get(target) else {
            continue;
        };
        if !unit.alive {
            continue;
        }
        if !res.rng.chance(effect.chance.unwrap_or(1.0)) {
            continue;
        }
        if let Some(condition) = &effect.condition {
            let terrain = res
                .state
                .terrain_at(unit.position)
                .map(|t| t.terrain_type)
                .unwrap_or_default();
            if !condition_met(unit, condition, terrain) {
                continue;
            }
        }

        match effect.effect_type {
            EffectType::Heal | EffectType::Regeneration => {
                let unit = &mut res.state.units[target];
                let amount = if effect.effect_type == EffectType::Heal {
                    effect.value.floor().max(0.0) as u32
                } else {
                    (unit.stats.max_hp as f32 * effect.value).floor().max(0.0) as u32
                };
                let restored = unit.heal(amount);
                if restored > 0 {
                    let target_id = unit.id.clone();
                    res.emit(BattleEvent::UnitHealed {
                        target_id,
                        amount: restored,
                    });
                }
                tally.healing += restored;
            }
            EffectType::Cleanse => {
                cleanse(&mut res.state.units[target]);
            }
            kind if kind.is_direct_damage() => {
                let defense_bonus = res.state.defense_bonus_at(res.state.units[target].position);
                let damage = area_damage(
                    &res.state.units[source],
                    &res.state.units[target],
                    defense_bonus,
                    effect.value,
                    res.rules,
                );
                let unit = &mut res.state.units[target];
                let died = unit.take_damage(damage);
                let defender_id = unit.id.clone();
                res.emit(BattleEvent::UnitAttacked {
                    unit_id: source_id.clone(),
                    defender_id,
                    damage,
                    is_critical: false,
                    evaded: false,
                    reflect_damage: 0,
                    life_steal: 0,
                    is_counter_attack: false,
                    died,
                });
                if died {
                    resolve_death(res, target, Some(source));
                }
                tally.damage += damage;
            }
            kind if kind.is_combat_flag() => {
                tracing::debug!(skill = skill_id, effect = ?kind, "combat flag has no timed form");
                continue;
            }
            EffectType::Summon
            | EffectType::Sacrifice
            | EffectType::Transform
            | EffectType::Resurrect
            | EffectType::TeleportAbility => {
                tracing::debug!(
                    skill = skill_id,
                    effect = ?effect.effect_type,
                    "effect not supported"
                );
                continue;
            }
            _ => {
                if !add_active_effect(&mut res.state.units[target], effect, skill_id, &source_id) {
                    continue;
                }
            }
        }
        tally.affected.push(target);
    }
    tally
}
