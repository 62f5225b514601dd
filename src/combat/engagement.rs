//! Full attack exchange: strike ordering, counters, double attacks,
//! combat hooks, deaths and experience

use serde::{Deserialize, Serialize};

use crate::battle::context::Resolution;
use crate::battle::events::{BattleEvent, DeathCause};
use crate::battle::leveling::{add_exp, damage_exp, kill_exp};
use crate::combat::resolution::{resolve_attack, DamageOutcome, StrikeModifiers};
use crate::skills::definitions::{EffectType, TriggerTiming};
use crate::skills::effects::has_effect;
use crate::skills::triggers::fire_trigger;

const ATTACKER: usize = 0;
const DEFENDER: usize = 1;

/// Summary of one engagement, from the attacker's point of view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatReport {
    /// Damage the attacker received (counters and reflect)
    pub attacker_damage: u32,
    /// Damage the defender received
    pub defender_damage: u32,
    pub attacker_life_steal: u32,
    pub defender_life_steal: u32,
    pub attacker_died: bool,
    pub defender_died: bool,
    pub is_critical: bool,
    pub is_counter_attack: bool,
    /// The attacker's opening strike was evaded
    pub evaded: bool,
    pub reflect_damage: u32,
    pub exp_gained: u32,
}

#[derive(Debug, Clone, Copy)]
struct Strike {
    striker: usize, // ATTACKER or DEFENDER
    is_counter: bool,
}

/// Range within which the defender's counter skill reaches
fn counter_range(res: &Resolution<'_>, defender: usize) -> u32 {
    res.state.units[defender]
        .skills
        .iter()
        .find(|s| {
            s.effects
                .iter()
                .any(|e| e.effect_type == EffectType::CounterAttack)
        })
        .map(|s| s.range)
        .filter(|&r| r > 0)
        .unwrap_or(res.rules.default_counter_range)
}

/// Strike order for an engagement
fn plan_strikes(res: &Resolution<'_>, attacker: usize, defender: usize) -> Vec<Strike> {
    let a = &res.state.units[attacker];
    let d = &res.state.units[defender];
    let distance = a.position.distance(&d.position);

    let can_counter = has_effect(d, EffectType::CounterAttack)
        && !d.has_active_effect(EffectType::Stun)
        && distance <= counter_range(res, defender);
    let defender_leads = can_counter
        && has_effect(d, EffectType::FirstStrike)
        && !has_effect(a, EffectType::FirstStrike);

    let mut strikes = Vec::with_capacity(3);
    if defender_leads {
        strikes.push(Strike { striker: DEFENDER, is_counter: true });
        strikes.push(Strike { striker: ATTACKER, is_counter: false });
    } else {
        strikes.push(Strike { striker: ATTACKER, is_counter: false });
        if can_counter {
            strikes.push(Strike { striker: DEFENDER, is_counter: true });
        }
    }
    if has_effect(a, EffectType::DoubleAttack) {
        strikes.push(Strike { striker: ATTACKER, is_counter: false });
    }
    strikes
}

/// Resolve a full attack from `attacker` on `defender`.
/// Validation happens before this is called.
pub fn execute_combat(res: &mut Resolution<'_>, attacker: usize, defender: usize) -> CombatReport {
    let mut report = CombatReport::default();
    let roles = [attacker, defender];

    let strikes = plan_strikes(res, attacker, defender);
    let mut mods = [
        fire_trigger(res, attacker, Some(defender), TriggerTiming::OnAttack),
        fire_trigger(res, defender, Some(attacker), TriggerTiming::OnDefend),
    ];

    let mut opening_strike = true;
    for strike in strikes {
        if !res.state.units[attacker].alive || !res.state.units[defender].alive {
            break;
        }
        let target = 1 - strike.striker;
        let (outcome, earned) = perform_strike(
            res,
            roles[strike.striker],
            roles[target],
            strike.is_counter,
            &mut mods,
            strike.striker,
        );
        if strike.striker == ATTACKER {
            report.exp_gained += earned;
            report.defender_damage += outcome.damage;
            report.attacker_life_steal += outcome.life_steal;
            report.attacker_damage += outcome.reflect_damage;
            report.reflect_damage += outcome.reflect_damage;
            report.is_critical |= outcome.is_critical;
            if opening_strike {
                report.evaded = outcome.evaded;
                opening_strike = false;
            }
        } else {
            report.attacker_damage += outcome.damage;
            report.defender_life_steal += outcome.life_steal;
            report.defender_damage += outcome.reflect_damage;
            report.is_counter_attack = true;
        }
    }

    report.attacker_died = !res.state.units[attacker].alive;
    report.defender_died = !res.state.units[defender].alive;

    if res.state.units[attacker].alive {
        let exp = damage_exp(report.defender_damage + report.attacker_damage, res.rules);
        let unit = &mut res.state.units[attacker];
        add_exp(unit, exp, res.rules, res.events);
        report.exp_gained += exp;
    }

    tracing::debug!(
        attacker = %res.state.units[attacker].id,
        defender = %res.state.units[defender].id,
        dealt = report.defender_damage,
        taken = report.attacker_damage,
        "engagement resolved"
    );
    report
}

/// One strike with its hooks and any resulting deaths.
/// Also returns the kill experience the striker earned.
fn perform_strike(
    res: &mut Resolution<'_>,
    striker: usize,
    target: usize,
    is_counter: bool,
    mods: &mut [StrikeModifiers; 2],
    striker_role: usize,
) -> (DamageOutcome, u32) {
    let target_role = 1 - striker_role;
    let defense_bonus = res.state.defense_bonus_at(res.state.units[target].position);
    let hp_before = res.state.units[target].hp_fraction();

    let Some((striker_unit, target_unit)) = res.state.pair_mut(striker, target) else {
        return (DamageOutcome::default(), 0);
    };
    let outcome = resolve_attack(
        striker_unit,
        target_unit,
        defense_bonus,
        &mods[striker_role],
        &mods[target_role],
        res.rng,
        res.rules,
    );

    let striker_id = res.state.units[striker].id.clone();
    let target_id = res.state.units[target].id.clone();
    res.emit(BattleEvent::UnitAttacked {
        unit_id: striker_id,
        defender_id: target_id,
        damage: outcome.damage,
        is_critical: outcome.is_critical,
        evaded: outcome.evaded,
        reflect_damage: outcome.reflect_damage,
        life_steal: outcome.life_steal,
        is_counter_attack: is_counter,
        died: outcome.target_died,
    });

    if outcome.damage > 0 && res.state.units[target].alive {
        let damaged = fire_trigger(res, target, Some(striker), TriggerTiming::OnDamaged);
        mods[target_role].merge(&damaged);
        let threshold = res.rules.hp_low_threshold;
        let hp_after = res.state.units[target].hp_fraction();
        if hp_before > threshold && hp_after <= threshold {
            let low = fire_trigger(res, target, Some(striker), TriggerTiming::OnHpLow);
            mods[target_role].merge(&low);
        }
    }

    let mut earned = 0;
    if outcome.target_died {
        earned = resolve_death(res, target, Some(striker));
    }
    if outcome.striker_died {
        resolve_death(res, striker, Some(target));
    }
    (outcome, earned)
}

/// Announce a death, then reward the killer: kill experience and ON_KILL hooks.
/// Returns the experience awarded.
pub fn resolve_death(res: &mut Resolution<'_>, victim: usize, killer: Option<usize>) -> u32 {
    let victim_id = res.state.units[victim].id.clone();
    let cause = match killer {
        Some(k) => DeathCause::Killed {
            killer_id: res.state.units[k].id.clone(),
        },
        None => DeathCause::DamageOverTime,
    };
    tracing::info!(unit = %victim_id, ?cause, "unit died");
    res.emit(BattleEvent::UnitDied {
        unit_id: victim_id,
        cause,
    });

    let Some(killer) = killer.filter(|&k| res.state.units[k].alive) else {
        return 0;
    };
    let exp = kill_exp(
        res.state.units[killer].level_info.level,
        res.state.units[victim].level_info.level,
        res.rules,
    );
    let unit = &mut res.state.units[killer];
    add_exp(unit, exp, res.rules, res.events);
    fire_trigger(res, killer, Some(victim), TriggerTiming::OnKill);
    exp
}
