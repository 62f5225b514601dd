//! Target collection and per-effect filtering for skills

use crate::battle::state::BattleState;
use crate::core::types::GridCoord;
use crate::skills::definitions::{Skill, TargetType};

/// Narrow a candidate list to the units an effect's target type covers.
/// Self always resolves to the caster, whatever the candidates are.
pub fn filter_targets(
    state: &BattleState,
    caster: usize,
    target_type: TargetType,
    candidates: &[usize],
) -> Vec<usize> {
    let Some(caster_unit) = state.units.get(caster) else {
        return Vec::new();
    };
    if target_type == TargetType::SelfUnit {
        return vec![caster];
    }
    let owner = &caster_unit.owner_id;
    candidates
        .iter()
        .copied()
        .filter(|&i| state.units.get(i).is_some_and(|u| u.alive))
        .filter(|&i| {
            let unit = &state.units[i];
            match target_type {
                TargetType::SelfUnit => i == caster,
                TargetType::Ally => &unit.owner_id == owner && i != caster,
                TargetType::AllyAll => &unit.owner_id == owner,
                TargetType::Enemy | TargetType::EnemyAll => &unit.owner_id != owner,
                TargetType::Any | TargetType::Area | TargetType::Tile => true,
            }
        })
        .collect()
}

/// Resolve a cast's targets from the skill's primary effect and the chosen tile
pub fn collect_targets(
    state: &BattleState,
    caster: usize,
    skill: &Skill,
    target_position: Option<GridCoord>,
) -> Vec<usize> {
    let Some(caster_unit) = state.units.get(caster) else {
        return Vec::new();
    };
    let owner = &caster_unit.owner_id;
    let scope = skill
        .primary_effect()
        .map_or(TargetType::SelfUnit, |e| e.target_type);

    let living = state
        .units
        .iter()
        .enumerate()
        .filter(|(_, u)| u.alive);

    match scope {
        TargetType::SelfUnit => vec![caster],
        TargetType::AllyAll => living
            .filter(|(_, u)| &u.owner_id == owner)
            .map(|(i, _)| i)
            .collect(),
        TargetType::EnemyAll => living
            .filter(|(_, u)| &u.owner_id != owner)
            .map(|(i, _)| i)
            .collect(),
        TargetType::Area => {
            let Some(center) = target_position else {
                return Vec::new();
            };
            living
                .filter(|(_, u)| u.position.distance(&center) <= skill.range)
                .map(|(i, _)| i)
                .collect()
        }
        TargetType::Ally | TargetType::Enemy | TargetType::Any | TargetType::Tile => {
            let Some(index) = target_position.and_then(|pos| state.unit_index_at(pos)) else {
                return Vec::new();
            };
            let unit = &state.units[index];
            let keep = match scope {
                TargetType::Ally => &unit.owner_id == owner && index != caster,
                TargetType::Enemy => &unit.owner_id != owner,
                _ => true,
            };
            if keep {
                vec![index]
            } else {
                Vec::new()
            }
        }
    }
}
