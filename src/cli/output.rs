//! Output formatting utilities for CLI.

use planetwars::game::{EndReason, Outcome, Side, World};
use serde::Serialize;
use std::fmt::Write as _;

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Winning player (1 or 2), null for a draw.
    pub(super) winner: Option<u8>,
    /// Why the match ended.
    pub(super) reason: EndReason,
    /// Turns played.
    pub(super) turns: u32,
    /// Per-player results.
    pub(super) players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player id (1 or 2).
    pub(super) id: u8,
    /// Launch command.
    pub(super) command: String,
    /// Ships on planets and in flight.
    pub(super) ships: u64,
    /// Planets owned.
    pub(super) planets: usize,
}

impl JsonMatchResult {
    /// Create from an outcome and the final world.
    pub(super) fn new(outcome: &Outcome, world: &World, commands: &[String; 2]) -> Self {
        Self {
            winner: outcome.winner.map(Side::id),
            reason: outcome.reason.clone(),
            turns: outcome.turn,
            players: Side::PLAYERS
                .iter()
                .zip(commands)
                .map(|(&side, command)| JsonPlayerResult {
                    id: side.id(),
                    command: command.clone(),
                    ships: world.total_ships(side),
                    planets: world.planet_count(side),
                })
                .collect(),
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(outcome: &Outcome, world: &World, commands: &[String; 2]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result");
    match outcome.winner {
        Some(side) => {
            let _ = writeln!(output, "  Winner: {side} ({})", commands[usize::from(side.id() - 1)]);
        }
        None => {
            let _ = writeln!(output, "  Winner: Draw");
        }
    }
    let _ = writeln!(output, "  Reason: {}", describe(&outcome.reason));
    let _ = writeln!(output, "  Turns: {}\n", outcome.turn);

    for (&side, command) in Side::PLAYERS.iter().zip(commands) {
        let _ = writeln!(
            output,
            "  {side}: {} ships, {} planets ({command})",
            world.total_ships(side),
            world.planet_count(side)
        );
    }

    output
}

fn describe(reason: &EndReason) -> String {
    match reason {
        EndReason::Elimination => "elimination".to_string(),
        EndReason::TurnLimit => "turn limit reached".to_string(),
        EndReason::Fault { sides } => {
            let names: Vec<String> = sides.iter().map(ToString::to_string).collect();
            format!("fault by {}", names.join(" and "))
        }
        EndReason::Aborted => "stopped before the end".to_string(),
    }
}
