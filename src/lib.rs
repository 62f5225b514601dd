//! Grid Tactics - deterministic simulation core for turn-based grid battles

pub mod battle;
pub mod combat;
pub mod command;
pub mod core;
pub mod skills;
