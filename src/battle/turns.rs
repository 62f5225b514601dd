//! Turn cycle
//!
//! Ending a turn winds down the outgoing player's units, hands control to
//! the next player and runs start-of-turn upkeep for their units: stun
//! checks, turn-start hooks, damage over time and effect expiry.

use serde::{Deserialize, Serialize};

use crate::battle::context::Resolution;
use crate::battle::events::BattleEvent;
use crate::battle::units::ActionState;
use crate::combat::engagement::resolve_death;
use crate::core::types::{PlayerId, Turn};
use crate::skills::definitions::{EffectType, TriggerTiming};
use crate::skills::effects::tick_durations;
use crate::skills::triggers::fire_trigger;

/// Where the battle stands after a turn change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub turn: Turn,
    pub current_player_id: PlayerId,
}

/// End the current player's turn and start the next one.
/// Validation (who may end the turn) happens before this is called.
pub fn end_turn(res: &mut Resolution<'_>) -> TurnReport {
    if let Some(ending) = res.state.current_player_id().cloned() {
        wind_down(res, &ending);
    }

    let players = res.state.players.len().max(1);
    res.state.current_player_index = (res.state.current_player_index + 1) % players;
    if res.state.current_player_index == 0 {
        res.state.turn += 1;
    }
    res.state.sync_active_flags();

    let current_player_id = res
        .state
        .current_player_id()
        .cloned()
        .unwrap_or_else(|| PlayerId::new(""));
    start_up(res, &current_player_id);

    let turn = res.state.turn;
    tracing::info!(turn, player = %current_player_id, "turn started");
    res.emit(BattleEvent::TurnEnded {
        turn,
        current_player_id: current_player_id.clone(),
    });
    TurnReport {
        turn,
        current_player_id,
    }
}

/// Outgoing player: cooldowns, mana, turn-end hooks, then no more actions
fn wind_down(res: &mut Resolution<'_>, owner: &PlayerId) {
    let regen = res.rules.mana_regen_per_turn;
    for index in res.state.living_unit_indices_of(owner) {
        let unit = &mut res.state.units[index];
        for skill in unit.skills.iter_mut().filter(|s| s.is_active()) {
            skill.current_cooldown = skill.current_cooldown.saturating_sub(1);
        }
        if let (Some(mana), Some(max)) = (unit.stats.mana, unit.stats.max_mana) {
            unit.stats.mana = Some((mana + regen).min(max));
        }

        fire_trigger(res, index, None, TriggerTiming::OnTurnEnd);

        let unit = &mut res.state.units[index];
        if unit.alive {
            unit.action_state = ActionState::exhausted();
        }
    }
}

/// Incoming player: fresh actions, stun, hooks, damage over time, expiry
fn start_up(res: &mut Resolution<'_>, owner: &PlayerId) {
    for index in res.state.living_unit_indices_of(owner) {
        let unit = &mut res.state.units[index];
        let stunned = unit.has_active_effect(EffectType::Stun);
        unit.action_state = ActionState {
            is_stunned: stunned,
            ..ActionState::ready()
        };
        if stunned {
            unit.action_state.can_move = false;
            unit.action_state.can_attack = false;
            tracing::debug!(unit = %unit.id, "unit is stunned this turn");
        }

        fire_trigger(res, index, None, TriggerTiming::OnTurnStart);
        if !res.state.units[index].alive {
            continue;
        }

        apply_damage_over_time(res, index);

        let unit = &mut res.state.units[index];
        if unit.alive {
            tick_durations(unit);
        }
    }
}

/// Burn and poison tick; a unit killed this way dies with no killer
fn apply_damage_over_time(res: &mut Resolution<'_>, index: usize) {
    let unit = &mut res.state.units[index];
    let total: f32 = unit
        .active_effects
        .iter()
        .filter(|e| e.effect_type.is_damage_over_time())
        .map(|e| e.value)
        .sum();
    let damage = total.floor().max(0.0) as u32;
    if damage == 0 {
        return;
    }
    let died = unit.take_damage(damage);
    tracing::debug!(unit = %unit.id, damage, "damage over time");
    if died {
        resolve_death(res, index, None);
    }
}
