//! Battle engine facade
//!
//! Owns the state, rules and roll source for one match. Every accepted
//! command is followed by a victory check, and its events are fanned out
//! synchronously to subscribers in the order they were raised.

use std::collections::BTreeSet;
use std::path::Path;

use crate::battle::events::BattleEvent;
use crate::battle::loader::{build_state, load_scenario, ScenarioPayload};
use crate::battle::pathfinding::{attackable_area, find_path, movable_area};
use crate::battle::state::BattleState;
use crate::battle::victory::{check_victory, VictoryStatus};
use crate::command::processor;
use crate::command::types::{Command, CommandOutcome, CommandReport};
use crate::core::config::RulesConfig;
use crate::core::error::{CommandError, Result, ScenarioError};
use crate::core::rng::{BattleRng, SeededRng};
use crate::core::types::{GridCoord, UnitId};

/// Callback receiving every event, in causal order
pub type EventSubscriber = Box<dyn FnMut(&BattleEvent)>;

pub struct BattleEngine {
    state: BattleState,
    rules: RulesConfig,
    rng: Box<dyn BattleRng>,
    subscribers: Vec<EventSubscriber>,
    status: VictoryStatus,
}

impl BattleEngine {
    pub fn new(state: BattleState, rules: RulesConfig, rng: Box<dyn BattleRng>) -> Self {
        let status = check_victory(&state);
        Self {
            state,
            rules,
            rng,
            subscribers: Vec::new(),
            status,
        }
    }

    /// Build a battle from an in-memory payload
    pub fn from_scenario(
        payload: &ScenarioPayload,
        rules: RulesConfig,
        rng: Box<dyn BattleRng>,
    ) -> std::result::Result<Self, ScenarioError> {
        let state = build_state(payload, &rules)?;
        Ok(Self::new(state, rules, rng))
    }

    /// Load a JSON or TOML scenario with a fixed seed
    pub fn load(
        path: impl AsRef<Path>,
        rules: RulesConfig,
        seed: u64,
    ) -> std::result::Result<Self, ScenarioError> {
        let state = load_scenario(path, &rules)?;
        Ok(Self::new(state, rules, Box::new(SeededRng::new(seed))))
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn status(&self) -> &VictoryStatus {
        &self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_game_over
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&BattleEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Validate and apply a command.
    /// On success the report also carries BATTLE_ENDED if this command decided the match.
    pub fn execute(&mut self, command: &Command) -> Result<CommandReport> {
        if self.status.is_game_over {
            tracing::warn!(command = %command.id, "command rejected: battle is over");
            return Err(CommandError::BattleOver);
        }

        let outcome = processor::execute(&mut self.state, command, self.rng.as_mut(), &self.rules);
        let mut report = match outcome {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(
                    command = %command.id,
                    kind = command.kind(),
                    player = %command.player_id,
                    error = %err,
                    "command rejected"
                );
                return Err(err);
            }
        };

        let status = check_victory(&self.state);
        if status.is_game_over {
            tracing::info!(winner = ?status.winner, reason = ?status.reason, "battle over");
            if let Some(reason) = status.reason {
                report.events.push(BattleEvent::BattleEnded {
                    winner: status.winner.clone(),
                    reason,
                });
            }
        }
        self.status = status;

        for event in &report.events {
            for subscriber in &mut self.subscribers {
                subscriber(event);
            }
        }
        Ok(report)
    }

    /// `execute` flattened into the `{success, message}` shape
    pub fn submit(&mut self, command: &Command) -> CommandOutcome {
        CommandOutcome::from(self.execute(command))
    }

    pub fn movable_area(&self, unit_id: &UnitId) -> BTreeSet<GridCoord> {
        movable_area(&self.state, unit_id)
    }

    pub fn attackable_area(&self, unit_id: &UnitId) -> BTreeSet<GridCoord> {
        attackable_area(&self.state, unit_id)
    }

    pub fn find_path(&self, unit_id: &UnitId, to: GridCoord) -> Option<Vec<GridCoord>> {
        let from = self.state.unit(unit_id)?.position;
        find_path(&self.state, from, to, unit_id)
    }
}
