//! Skill system
//!
//! Passive skills feed stat sums and fire on combat and turn hooks; active
//! skills are cast by command and resolved effect by effect.

pub mod definitions;
pub mod effects;
pub mod library;
pub mod resolution;
pub mod targeting;
pub mod triggers;

pub use definitions::{
    EffectType, Skill, SkillCondition, SkillEffect, SkillType, TargetType, TriggerTiming,
};
pub use effects::{effective_move, effective_range};
pub use library::{skill_definition, skills_for, SKILL_IDS};
pub use resolution::{available_active_skills, skill_readiness, use_skill, SkillReport};
pub use targeting::{collect_targets, filter_targets};
pub use triggers::fire_trigger;
