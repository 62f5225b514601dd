//! Triggered passive skills
//!
//! Hooks fire at fixed points of combat, movement and the turn cycle.
//! Stat effects become engagement modifiers for the hook owner; everything
//! else is applied like a cast effect.

use crate::battle::context::Resolution;
use crate::combat::resolution::StrikeModifiers;
use crate::skills::definitions::{Skill, SkillType, TriggerTiming};
use crate::skills::effects::condition_met;
use crate::skills::resolution::apply_effect;
use crate::skills::targeting::filter_targets;

/// Fire every passive skill of `owner` bound to `timing`
pub fn fire_trigger(
    res: &mut Resolution<'_>,
    owner: usize,
    opponent: Option<usize>,
    timing: TriggerTiming,
) -> StrikeModifiers {
    let mut mods = StrikeModifiers::new();
    let Some(unit) = res.state.units.get(owner).filter(|u| u.alive) else {
        return mods;
    };
    let skills: Vec<Skill> = unit
        .skills
        .iter()
        .filter(|s| s.skill_type == SkillType::Passive && s.trigger == timing)
        .cloned()
        .collect();
    if skills.is_empty() {
        return mods;
    }

    let mut candidates = vec![owner];
    candidates.extend(opponent);

    for skill in &skills {
        tracing::trace!(
            unit = %res.state.units[owner].id,
            skill = %skill.id,
            ?timing,
            "hook fired"
        );
        for effect in &skill.effects {
            let kind = effect.effect_type;
            if kind.is_combat_flag() {
                continue;
            }
            if kind.is_engagement_modifier() {
                if !res.rng.chance(effect.chance.unwrap_or(1.0)) {
                    continue;
                }
                if let Some(condition) = &effect.condition {
                    let unit = &res.state.units[owner];
                    let terrain = res
                        .state
                        .terrain_at(unit.position)
                        .map(|t| t.terrain_type)
                        .unwrap_or_default();
                    if !condition_met(unit, condition, terrain) {
                        continue;
                    }
                }
                mods.add(kind, effect.value);
                continue;
            }
            let targets = filter_targets(res.state, owner, effect.target_type, &candidates);
            apply_effect(res, owner, &skill.id, effect, &targets);
        }
        if !res.state.units[owner].alive {
            break;
        }
    }
    mods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::events::{BattleEvent, EventLog};
    use crate::battle::state::{BattleState, Player};
    use crate::battle::terrain::Terrain;
    use crate::battle::unit_types::UnitType;
    use crate::battle::units::Unit;
    use crate::core::config::RulesConfig;
    use crate::core::rng::ScriptedRng;
    use crate::core::types::{GridCoord, PlayerId, UnitId};
    use crate::skills::definitions::{EffectType, SkillEffect, TargetType};
    use crate::skills::library::skill_definition;

    fn state(units: &[(&str, &str, UnitType)]) -> BattleState {
        let players = ["p1", "p2"]
            .iter()
            .map(|id| Player {
                id: PlayerId::new(*id),
                name: id.to_string(),
                team: id.to_string(),
                ai_controlled: false,
                is_active: false,
            })
            .collect();
        let units = units
            .iter()
            .enumerate()
            .map(|(x, (id, owner, unit_type))| {
                Unit::from_template(
                    UnitId::new(*id),
                    PlayerId::new(*owner),
                    *unit_type,
                    GridCoord::new(x as i32, 0),
                    100,
                    20,
                )
            })
            .collect();
        BattleState::new(4, 1, vec![Terrain::default(); 4], units, players)
    }

    #[test]
    fn test_regeneration_on_turn_start() {
        let mut state = state(&[("h", "p1", UnitType::Healer)]);
        state.units[0].take_damage(40);
        let rules = RulesConfig::default();
        let mut rng = ScriptedRng::never();
        let mut events = EventLog::new();
        let mut res = Resolution::new(&mut state, &mut rng, &rules, &mut events);
        fire_trigger(&mut res, 0, None, TriggerTiming::OnTurnStart);
        // 10% of 75
        assert_eq!(state.units[0].stats.hp, 35 + 7);
        assert_eq!(
            events.events,
            vec![BattleEvent::UnitHealed {
                target_id: UnitId::new("h"),
                amount: 7
            }]
        );
    }

    #[test]
    fn test_counter_grants_life_steal_modifier() {
        let mut state = state(&[("k", "p1", UnitType::Knight), ("s", "p2", UnitType::Soldier)]);
        let rules = RulesConfig::default();
        let mut rng = ScriptedRng::never();
        let mut events = EventLog::new();
        let mut res = Resolution::new(&mut state, &mut rng, &rules, &mut events);
        let mods = fire_trigger(&mut res, 0, Some(1), TriggerTiming::OnDefend);
        assert!((mods.get(EffectType::LifeSteal) - 0.2).abs() < 1e-6);
        assert_eq!(mods.get(EffectType::CounterAttack), 0.0);
    }

    #[test]
    fn test_chance_gated_modifier() {
        let mut state = state(&[("s", "p1", UnitType::Soldier), ("a", "p2", UnitType::Archer)]);
        let rules = RulesConfig::default();
        let mut events = EventLog::new();

        let mut miss = ScriptedRng::never();
        let mut res = Resolution::new(&mut state, &mut miss, &rules, &mut events);
        let mods = fire_trigger(&mut res, 0, Some(1), TriggerTiming::OnAttack);
        assert!(mods.is_empty());

        let mut hit = ScriptedRng::always();
        let mut res = Resolution::new(&mut state, &mut hit, &rules, &mut events);
        let mods = fire_trigger(&mut res, 0, Some(1), TriggerTiming::OnAttack);
        assert!((mods.get(EffectType::ArmorPierce) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_modifier_effects_apply_to_opponent() {
        let mut state = state(&[("s", "p1", UnitType::Soldier), ("a", "p2", UnitType::Archer)]);
        let mut venom = skill_definition("vampire").unwrap();
        venom.id = "venom".into();
        venom.effects =
            vec![SkillEffect::new(EffectType::Poison, 5.0, TargetType::Enemy).with_duration(2)];
        state.units[0].skills.push(venom);

        let rules = RulesConfig::default();
        let mut rng = ScriptedRng::never();
        let mut events = EventLog::new();
        let mut res = Resolution::new(&mut state, &mut rng, &rules, &mut events);
        fire_trigger(&mut res, 0, Some(1), TriggerTiming::OnAttack);
        assert!(state.units[1].has_active_effect(EffectType::Poison));
        assert!(!state.units[0].has_active_effect(EffectType::Poison));
    }
}
