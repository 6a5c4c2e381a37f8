//! Error types for the referee.
//!
//! Each kind maps to one failure class of a match: a map that cannot be
//! loaded, a bot that cannot be launched, a bot that breaks the stdout
//! protocol, or a bot that issues an illegal move.

use std::io;
use std::path::PathBuf;

use crate::game::{PlanetId, Side};

/// A map file could not be turned into a world.
#[derive(Debug, thiserror::Error)]
pub enum MapLoadError {
    /// The map file could not be read.
    #[error("unable to open the map file {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// No map file has been configured.
    #[error("no map file configured")]
    NoMapConfigured,
    /// A directive line has the wrong number of tokens.
    #[error("map file error [line {line}]: expected {expected} tokens on a {kind} line, have {found}")]
    TokenCount {
        /// 1-based line number.
        line: usize,
        /// `"planet"` or `"fleet"`.
        kind: &'static str,
        /// Required token count.
        expected: usize,
        /// Token count that was found.
        found: usize,
    },
    /// A token could not be parsed as a number.
    #[error("map file error [line {line}]: invalid number {token:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A planet coordinate that is NaN or infinite.
    #[error("map file error [line {line}]: coordinate {token:?} is not a finite number")]
    NonFiniteCoordinate {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// An owner id outside 0..=2.
    #[error("map file error [line {line}]: invalid owner id {owner}")]
    InvalidOwner {
        /// 1-based line number.
        line: usize,
        /// The offending owner id.
        owner: i64,
    },
    /// A negative ship count, growth rate, or trip length.
    #[error("map file error [line {line}]: {field} must not be negative, got {value}")]
    Negative {
        /// 1-based line number.
        line: usize,
        /// Name of the field.
        field: &'static str,
        /// The offending value.
        value: i64,
    },
    /// A fleet refers to a planet that has not been defined.
    #[error("map file error [line {line}]: fleet refers to an invalid planet with id={planet}")]
    UnknownPlanet {
        /// 1-based line number.
        line: usize,
        /// The offending planet id.
        planet: i64,
    },
    /// A fleet with no ships aboard.
    #[error("map file error [line {line}]: fleet must carry at least one ship")]
    EmptyFleet {
        /// 1-based line number.
        line: usize,
    },
    /// A fleet whose remaining turns exceed its trip length.
    #[error("map file error [line {line}]: fleet has {remaining} turns remaining on a {total}-turn trip")]
    TripBounds {
        /// 1-based line number.
        line: usize,
        /// Turns remaining.
        remaining: u32,
        /// Total trip length.
        total: u32,
    },
    /// A non-empty line that is neither a planet nor a fleet.
    #[error("map file error [line {line}]: a non-empty line that does not contain a planet or a fleet")]
    UnknownDirective {
        /// 1-based line number.
        line: usize,
    },
}

/// A bot process could not be started.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The launch command is empty.
    #[error("no launch command configured")]
    EmptyCommand,
    /// The process is already running.
    #[error("attempting to start a running process")]
    AlreadyRunning,
    /// The OS refused to spawn the process.
    #[error("couldn't start the bot `{command}`: {source}")]
    Spawn {
        /// The command that was run.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The process exited before it could take part in the game.
    #[error("bot `{command}` exited immediately with {status}")]
    ExitedEarly {
        /// The command that was run.
        command: String,
        /// Human-readable exit status.
        status: String,
    },
}

/// A bot's stdout did not follow the order protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// An order line with the wrong number of tokens.
    #[error("error on line {line} of stdout output; expected 3 tokens on a move order line, have {found}")]
    TokenCount {
        /// 1-based line number within this turn's output.
        line: usize,
        /// Token count that was found.
        found: usize,
    },
    /// An order token that is not an integer.
    #[error("error on line {line} of stdout output; {token:?} is not an integer")]
    InvalidNumber {
        /// 1-based line number within this turn's output.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// No `go` line arrived before the turn closed.
    #[error("player did not send \"go\" within allotted time")]
    MissingTerminator,
}

/// A syntactically valid order that breaks the rules of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// Source planet id out of range.
    #[error("source planet {0} does not exist")]
    UnknownSource(i64),
    /// Destination planet id out of range.
    #[error("destination planet {0} does not exist")]
    UnknownDestination(i64),
    /// Source and destination are the same planet.
    #[error("source planet and destination planet are the same ({0})")]
    SameSourceAndDestination(PlanetId),
    /// The issuing side does not own the source planet.
    #[error("source planet {planet} does not belong to {side}")]
    NotOwner {
        /// Source planet.
        planet: PlanetId,
        /// Side that issued the order.
        side: Side,
    },
    /// Ship count outside `[0, available]`.
    #[error("cannot send {requested} ships from planet {planet}; planet has {available} ships")]
    ShipCount {
        /// Source planet.
        planet: PlanetId,
        /// Requested count.
        requested: i64,
        /// Ships on the planet.
        available: u32,
    },
}

/// A side's turn failed: either its output was malformed or a move was illegal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnFault {
    /// Malformed output.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Illegal move on a given output line.
    #[error("error on line {line} of stdout output: {error}")]
    Order {
        /// 1-based line number within this turn's output.
        line: usize,
        /// What was wrong with the move.
        error: OrderError,
    },
    /// The bot process died or was not running.
    #[error("bot process is not running")]
    ProcessDied,
}

/// Configuration file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON for a config.
    #[error("config file {path}: {source}")]
    Json {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced to whoever drives the referee.
#[derive(Debug, thiserror::Error)]
pub enum RefereeError {
    /// The map could not be loaded; the previous world is untouched.
    #[error(transparent)]
    MapLoad(#[from] MapLoadError),
    /// A bot could not be launched.
    #[error("{side}: {source}")]
    Launch {
        /// Side whose bot failed.
        side: Side,
        /// Launch failure.
        #[source]
        source: LaunchError,
    },
    /// The referee loop is gone.
    #[error("referee is no longer running")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error_display_has_line() {
        let err = MapLoadError::TokenCount {
            line: 3,
            kind: "planet",
            expected: 6,
            found: 4,
        };
        let text = err.to_string();
        assert!(text.contains("[line 3]"));
        assert!(text.contains("expected 6 tokens"));
    }

    #[test]
    fn test_turn_fault_wraps_protocol() {
        let fault = TurnFault::from(ProtocolError::MissingTerminator);
        assert!(fault.to_string().contains("\"go\""));
    }

    #[test]
    fn test_order_fault_display() {
        let fault = TurnFault::Order {
            line: 2,
            error: OrderError::NotOwner {
                planet: 4,
                side: Side::PlayerB,
            },
        };
        let text = fault.to_string();
        assert!(text.contains("line 2"));
        assert!(text.contains("planet 4"));
    }
}
