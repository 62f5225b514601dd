//! Combat resolution
//!
//! `resolution` computes and applies a single strike; `engagement` runs a
//! whole attack exchange on top of it.

pub mod engagement;
pub mod resolution;

pub use engagement::{execute_combat, resolve_death, CombatReport};
pub use resolution::{
    area_damage, calculate_damage, can_attack, resolve_attack, roll_critical, DamageOutcome,
    DamageRoll, StrikeModifiers,
};
