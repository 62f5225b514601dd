//! Headless Battle Runner
//!
//! Loads a scenario, replays a scripted command list against it and prints
//! the resulting event log and outcome.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use grid_tactics::battle::{BattleEngine, BattleEvent, VictoryStatus};
use grid_tactics::command::{Command, CommandOutcome};
use grid_tactics::core::RulesConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Battle Runner - replay scripted commands against a scenario
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Replay a command script against a battle scenario")]
struct Args {
    /// Scenario payload (.json or .toml)
    scenario: PathBuf,

    /// JSON array of commands to replay in order
    #[arg(long, short = 'c')]
    commands: Option<PathBuf>,

    /// Rules overrides (TOML)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Stop at the first rejected command
    #[arg(long)]
    strict: bool,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    seed: u64,
    commands_run: usize,
    rejected: usize,
    outcomes: Vec<CommandOutcome>,
    events: Vec<BattleEvent>,
    status: VictoryStatus,
    turn: u32,
}

fn load_commands(path: &PathBuf) -> Result<Vec<Command>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("grid_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let rules = match &args.rules {
        Some(path) => match RulesConfig::load(path) {
            Ok(rules) => rules,
            Err(e) => {
                eprintln!("Error: failed to load rules {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => RulesConfig::default(),
    };

    let mut engine = match BattleEngine::load(&args.scenario, rules, seed) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: failed to load scenario {}: {e}", args.scenario.display());
            return ExitCode::FAILURE;
        }
    };

    let commands = match &args.commands {
        Some(path) => match load_commands(path) {
            Ok(commands) => commands,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Vec::new(),
    };

    let text = args.format == "text";
    let mut summary = RunSummary {
        seed,
        commands_run: 0,
        rejected: 0,
        outcomes: Vec::new(),
        events: Vec::new(),
        status: engine.status().clone(),
        turn: engine.state().turn,
    };

    for command in &commands {
        let outcome = engine.submit(command);
        summary.commands_run += 1;
        if text {
            match (&outcome.report, &outcome.message) {
                (Some(report), _) => {
                    println!("[{}] {} ok", command.id, command.kind());
                    for event in &report.events {
                        println!("    {event:?}");
                    }
                }
                (None, message) => println!(
                    "[{}] {} rejected: {}",
                    command.id,
                    command.kind(),
                    message.as_deref().unwrap_or("unknown error")
                ),
            }
        }
        if let Some(report) = &outcome.report {
            summary.events.extend(report.events.iter().cloned());
        }
        let rejected = !outcome.success;
        summary.outcomes.push(outcome);
        if rejected {
            summary.rejected += 1;
            if args.strict {
                break;
            }
        }
    }

    summary.status = engine.status().clone();
    summary.turn = engine.state().turn;

    if text {
        println!();
        println!("Turn: {}", summary.turn);
        match (&summary.status.winner, summary.status.is_game_over) {
            (Some(winner), true) => println!("Winner: {winner}"),
            (None, true) => println!("Result: draw"),
            _ => println!("Result: battle still in progress"),
        }
        println!("Commands: {} run, {} rejected", summary.commands_run, summary.rejected);
    } else {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if args.strict && summary.rejected > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
