//! Elimination-based game-over detection

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::battle::state::BattleState;
use crate::core::types::PlayerId;

/// Why the battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VictoryReason {
    Elimination,
    Draw,
}

/// Result of a victory check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictoryStatus {
    pub is_game_over: bool,
    pub winner: Option<PlayerId>,
    pub reason: Option<VictoryReason>,
}

impl VictoryStatus {
    pub fn ongoing() -> Self {
        Self {
            is_game_over: false,
            winner: None,
            reason: None,
        }
    }
}

/// Group living units by owner: one owner left wins, none left is a draw
pub fn check_victory(state: &BattleState) -> VictoryStatus {
    let owners: BTreeSet<&PlayerId> = state.living_units().map(|u| &u.owner_id).collect();
    match owners.len() {
        0 => VictoryStatus {
            is_game_over: true,
            winner: None,
            reason: Some(VictoryReason::Draw),
        },
        1 => VictoryStatus {
            is_game_over: true,
            winner: owners.into_iter().next().cloned(),
            reason: Some(VictoryReason::Elimination),
        },
        _ => VictoryStatus::ongoing(),
    }
}
