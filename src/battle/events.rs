//! Domain events raised while resolving commands
//!
//! Events are appended in the order effects are applied; the caller drains
//! them after each command.

use serde::{Deserialize, Serialize};

use crate::battle::victory::VictoryReason;
use crate::core::types::{PlayerId, Turn, UnitId};

/// How a unit died
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum DeathCause {
    Killed { killer_id: UnitId },
    DamageOverTime,
}

/// Something observable that happened in the battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum BattleEvent {
    UnitMoved {
        unit_id: UnitId,
        x: i32,
        y: i32,
    },
    UnitAttacked {
        unit_id: UnitId,
        defender_id: UnitId,
        damage: u32,
        is_critical: bool,
        evaded: bool,
        reflect_damage: u32,
        life_steal: u32,
        is_counter_attack: bool,
        died: bool,
    },
    UnitDied {
        unit_id: UnitId,
        cause: DeathCause,
    },
    UnitLevelUp {
        unit_id: UnitId,
        level: u32,
    },
    UnitHealed {
        target_id: UnitId,
        amount: u32,
    },
    SkillActivated {
        unit_id: UnitId,
        skill_id: String,
        target_ids: Vec<UnitId>,
    },
    TurnEnded {
        turn: Turn,
        current_player_id: PlayerId,
    },
    BattleEnded {
        winner: Option<PlayerId>,
        reason: VictoryReason,
    },
}

/// Ordered batch of events for one command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Number of death events for a unit
    pub fn deaths_of(&self, unit_id: &UnitId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BattleEvent::UnitDied { unit_id: id, .. } if id == unit_id))
            .count()
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}
