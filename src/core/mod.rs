pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::RulesConfig;
pub use error::{CommandError, ErrorKind, ScenarioError};
pub use rng::{BattleRng, ScriptedRng, SeededRng};
pub use types::{GridCoord, PlayerId, Turn, UnitId};
