//! Borrowed resources for resolving one command

use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::state::BattleState;
use crate::core::config::RulesConfig;
use crate::core::rng::BattleRng;

/// Everything a resolver needs while a single command is applied.
/// Lives only for the duration of that command.
pub struct Resolution<'a> {
    pub state: &'a mut BattleState,
    pub rng: &'a mut dyn BattleRng,
    pub rules: &'a RulesConfig,
    pub events: &'a mut EventLog,
}

impl<'a> Resolution<'a> {
    pub fn new(
        state: &'a mut BattleState,
        rng: &'a mut dyn BattleRng,
        rules: &'a RulesConfig,
        events: &'a mut EventLog,
    ) -> Self {
        Self {
            state,
            rng,
            rules,
            events,
        }
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }
}
