//! Experience and level progression

use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::units::Unit;
use crate::core::config::RulesConfig;

/// Experience needed to leave `level`; 0 at the cap
pub fn exp_to_next(level: u32, rules: &RulesConfig) -> u32 {
    if level >= rules.max_level {
        return 0;
    }
    let exponent = level.saturating_sub(1) as i32;
    (rules.base_exp_to_next as f64 * (rules.exp_multiplier as f64).powi(exponent)).floor() as u32
}

/// Grant experience, levelling up as many times as it covers.
/// Returns the number of levels gained.
pub fn add_exp(unit: &mut Unit, amount: u32, rules: &RulesConfig, events: &mut EventLog) -> u32 {
    let info = &mut unit.level_info;
    if amount == 0 || info.level >= info.max_level {
        return 0;
    }
    info.exp += amount;

    let mut gained = 0;
    while unit.level_info.level < unit.level_info.max_level
        && unit.level_info.exp >= unit.level_info.exp_to_next
    {
        let info = &mut unit.level_info;
        info.exp -= info.exp_to_next;
        info.level += 1;
        info.exp_to_next = exp_to_next(info.level, rules);
        unit.apply_growth();
        gained += 1;

        tracing::info!(unit = %unit.id, level = unit.level_info.level, "unit levelled up");
        events.push(BattleEvent::UnitLevelUp {
            unit_id: unit.id.clone(),
            level: unit.level_info.level,
        });
    }
    if unit.level_info.level >= unit.level_info.max_level {
        unit.level_info.exp = 0;
    }
    gained
}

/// Raise a freshly built unit to its starting level without events
pub fn promote_to_level(unit: &mut Unit, level: u32, rules: &RulesConfig) {
    let target = level.clamp(1, rules.max_level);
    while unit.level_info.level < target {
        unit.level_info.level += 1;
        unit.apply_growth();
    }
    unit.level_info.exp = 0;
    unit.level_info.exp_to_next = exp_to_next(unit.level_info.level, rules);
}

/// Kill experience scaled by how the target's level compares to the killer's
pub fn kill_exp(killer_level: u32, target_level: u32, rules: &RulesConfig) -> u32 {
    let base = rules.kill_exp;
    if target_level > killer_level {
        base + (target_level - killer_level) * rules.kill_exp_level_bonus
    } else if target_level < killer_level {
        let penalty = (killer_level - target_level) * rules.kill_exp_level_penalty;
        base.saturating_sub(penalty).max(rules.min_kill_exp)
    } else {
        base
    }
}

/// Experience for damage exchanged
pub fn damage_exp(damage: u32, rules: &RulesConfig) -> u32 {
    (damage as f32 * rules.damage_exp_rate).floor() as u32
}

/// Progress towards the next level in `[0, 1]`; 1 at the cap
pub fn level_progress(unit: &Unit) -> f32 {
    let info = &unit.level_info;
    if info.level >= info.max_level || info.exp_to_next == 0 {
        return 1.0;
    }
    (info.exp as f32 / info.exp_to_next as f32).min(1.0)
}

pub fn can_level_up(unit: &Unit) -> bool {
    let info = &unit.level_info;
    info.level < info.max_level && info.exp >= info.exp_to_next
}
