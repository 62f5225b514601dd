//! Command pipeline
//!
//! Command -> validate (pure) -> apply -> CommandReport { action, events }

pub mod processor;
pub mod types;

pub use processor::execute;
pub use types::{ActionReport, Command, CommandAction, CommandOutcome, CommandReport};
