//! Commands accepted by the battle core and the reports they produce

use serde::{Deserialize, Serialize};

use crate::battle::events::BattleEvent;
use crate::battle::turns::TurnReport;
use crate::combat::engagement::CombatReport;
use crate::core::error::CommandError;
use crate::core::types::{GridCoord, PlayerId, UnitId};
use crate::skills::resolution::SkillReport;

/// A player intent. `id` and `player_id` are carried for attribution and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: String,
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub action: CommandAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CommandAction {
    Move {
        unit_id: UnitId,
        from: GridCoord,
        to: GridCoord,
    },
    /// Strike an enemy, or heal an ally when the unit can heal
    Attack {
        unit_id: UnitId,
        target_id: UnitId,
        from: GridCoord,
        to: GridCoord,
    },
    Skill {
        unit_id: UnitId,
        skill_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_position: Option<GridCoord>,
    },
    EndTurn,
}

impl Command {
    pub fn new(id: impl Into<String>, player_id: PlayerId, action: CommandAction) -> Self {
        Self {
            id: id.into(),
            player_id,
            action,
        }
    }

    pub fn move_unit(
        id: impl Into<String>,
        player_id: PlayerId,
        unit_id: UnitId,
        from: GridCoord,
        to: GridCoord,
    ) -> Self {
        Self::new(id, player_id, CommandAction::Move { unit_id, from, to })
    }

    pub fn attack(
        id: impl Into<String>,
        player_id: PlayerId,
        unit_id: UnitId,
        target_id: UnitId,
        from: GridCoord,
        to: GridCoord,
    ) -> Self {
        Self::new(
            id,
            player_id,
            CommandAction::Attack {
                unit_id,
                target_id,
                from,
                to,
            },
        )
    }

    pub fn skill(
        id: impl Into<String>,
        player_id: PlayerId,
        unit_id: UnitId,
        skill_id: impl Into<String>,
        target_position: Option<GridCoord>,
    ) -> Self {
        Self::new(
            id,
            player_id,
            CommandAction::Skill {
                unit_id,
                skill_id: skill_id.into(),
                target_position,
            },
        )
    }

    pub fn end_turn(id: impl Into<String>, player_id: PlayerId) -> Self {
        Self::new(id, player_id, CommandAction::EndTurn)
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self.action {
            CommandAction::Move { .. } => "MOVE",
            CommandAction::Attack { .. } => "ATTACK",
            CommandAction::Skill { .. } => "SKILL",
            CommandAction::EndTurn => "END_TURN",
        }
    }
}

/// Variant-specific result of an accepted command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ActionReport {
    Moved {
        unit_id: UnitId,
        path: Vec<GridCoord>,
    },
    Combat(CombatReport),
    Healed {
        unit_id: UnitId,
        target_id: UnitId,
        amount: u32,
    },
    Skill(SkillReport),
    TurnEnded(TurnReport),
}

/// An accepted command with everything it caused, in causal order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport {
    pub command_id: String,
    pub action: ActionReport,
    pub events: Vec<BattleEvent>,
}

/// Flat `{success, message}` result for callers that surface text to players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CommandReport>,
}

impl From<Result<CommandReport, CommandError>> for CommandOutcome {
    fn from(result: Result<CommandReport, CommandError>) -> Self {
        match result {
            Ok(report) => Self {
                success: true,
                message: None,
                report: Some(report),
            },
            Err(err) => Self {
                success: false,
                message: Some(err.to_string()),
                report: None,
            },
        }
    }
}
