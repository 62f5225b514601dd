//! Rules configuration with documented constants
//!
//! Every tunable number of the battle rules lives here. Defaults reproduce
//! the stock ruleset; a TOML file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::ScenarioError;

/// Tunable battle rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === EXPERIENCE ===
    /// Experience required to go from level 1 to level 2
    pub base_exp_to_next: u32,

    /// Growth of the requirement per level
    ///
    /// Requirement at level L is `floor(base * multiplier^(L-1))`.
    pub exp_multiplier: f32,

    /// Hard level cap. Units at the cap stop accumulating experience.
    pub max_level: u32,

    /// Experience for a killing blow on an equal-level target
    pub kill_exp: u32,

    /// Bonus kill experience per level the target is above the killer
    pub kill_exp_level_bonus: u32,

    /// Penalty per level the target is below the killer
    pub kill_exp_level_penalty: u32,

    /// Kill experience never drops below this
    pub min_kill_exp: u32,

    /// Experience per point of damage exchanged in an engagement
    pub damage_exp_rate: f32,

    // === COMBAT ===
    /// Attack multiplier for CRITICAL_HIT effects that declare a zero value
    pub default_crit_multiplier: f32,

    /// Floor for any strike that connects with a living target
    pub min_damage: u32,

    /// Counter range used when the counter skill declares range 0
    pub default_counter_range: u32,

    // === TURN CYCLE ===
    /// Mana restored to each of the ending player's units
    pub mana_regen_per_turn: u32,

    /// HP fraction at or below which ON_HP_LOW hooks fire
    pub hp_low_threshold: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            base_exp_to_next: 100,
            exp_multiplier: 1.5,
            max_level: 20,
            kill_exp: 50,
            kill_exp_level_bonus: 10,
            kill_exp_level_penalty: 5,
            min_kill_exp: 10,
            damage_exp_rate: 0.5,
            default_crit_multiplier: 2.0,
            min_damage: 1,
            default_counter_range: 1,
            mana_regen_per_turn: 10,
            hp_low_threshold: 0.3,
        }
    }
}

impl RulesConfig {
    /// Parse rules from TOML; missing fields keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        let config: RulesConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load rules from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.max_level == 0 {
            return Err(ScenarioError::Invalid("max_level must be at least 1".into()));
        }
        if self.base_exp_to_next == 0 {
            return Err(ScenarioError::Invalid(
                "base_exp_to_next must be positive".into(),
            ));
        }
        if self.min_damage == 0 {
            return Err(ScenarioError::Invalid("min_damage must be at least 1".into()));
        }
        if self.exp_multiplier < 1.0 {
            return Err(ScenarioError::Invalid(
                "exp_multiplier must be at least 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.hp_low_threshold) {
            return Err(ScenarioError::Invalid(
                "hp_low_threshold must be within 0..=1".into(),
            ));
        }
        Ok(())
    }
}
