use thiserror::Error;

use crate::core::types::{GridCoord, PlayerId, UnitId};

/// Broad category of a rejected command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, unknown ids, used actions, range, occupancy, resources
    Validation,
    /// Legal input that breaks a game rule (e.g. striking an ally)
    RuleViolation,
}

/// Reasons a command is rejected. Rejection never mutates battle state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Malformed(String),

    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("target not found: {0}")]
    TargetNotFound(UnitId),

    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("unit dead: {0}")]
    UnitDead(UnitId),

    #[error("target dead: {0}")]
    TargetDead(UnitId),

    #[error("not your unit: {unit} belongs to {owner}")]
    NotYourUnit { unit: UnitId, owner: PlayerId },

    #[error("not your turn: {0} is not the active player")]
    NotYourTurn(PlayerId),

    #[error("unit stunned: {0}")]
    Stunned(UnitId),

    #[error("unit already moved: {0}")]
    AlreadyMoved(UnitId),

    #[error("unit already attacked this turn: {0}")]
    AlreadyAttacked(UnitId),

    #[error("position mismatch for {unit}: expected {expected}, found {actual}")]
    PositionMismatch {
        unit: UnitId,
        expected: GridCoord,
        actual: GridCoord,
    },

    #[error("target out of bounds: {0}")]
    OutOfBounds(GridCoord),

    #[error("target occupied: {0}")]
    TileOccupied(GridCoord),

    #[error("target unreachable: {0}")]
    Unreachable(GridCoord),

    #[error("target out of range: distance {distance}, range {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error("cannot attack target: {0} is an ally")]
    FriendlyFire(UnitId),

    #[error("cannot heal target: {0} is at full health")]
    TargetUnhurt(UnitId),

    #[error("skill not found: {0}")]
    SkillNotFound(String),

    #[error("not an active skill: {0}")]
    NotActiveSkill(String),

    #[error("skill on cooldown: {skill} ({remaining} turns remaining)")]
    OnCooldown { skill: String, remaining: u32 },

    #[error("insufficient mana: {required} required, {available} available")]
    InsufficientMana { required: u32, available: u32 },

    #[error("no valid targets")]
    NoValidTargets,

    #[error("battle is over")]
    BattleOver,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::FriendlyFire(_) | CommandError::TargetUnhurt(_) => {
                ErrorKind::RuleViolation
            }
            _ => ErrorKind::Validation,
        }
    }
}

/// Errors raised while turning a scenario or rules file into battle state
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unsupported scenario version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid scenario: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, CommandError>;
