//! CLI command implementations for the Planet Wars referee.

pub(crate) mod config;
pub(crate) mod play;
pub(crate) mod run;
pub(crate) mod validate;

mod logger;
mod output;

use clap::{Args, ValueEnum};
use planetwars::config::RefereeConfig;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Match settings shared by `run`, `play` and `config`.
///
/// Values given on the command line override the config file.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct MatchArgs {
    /// JSON config file to start from
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Map file
    #[arg(short, long)]
    pub(crate) map: Option<PathBuf>,

    /// Launch command for player 1
    #[arg(long = "player1")]
    pub(crate) player1: Option<String>,

    /// Launch command for player 2
    #[arg(long = "player2")]
    pub(crate) player2: Option<String>,

    /// Turn length in milliseconds
    #[arg(long)]
    pub(crate) turn_length: Option<u64>,

    /// First turn length in milliseconds
    #[arg(long)]
    pub(crate) first_turn_length: Option<u64>,

    /// Wait for bots indefinitely
    #[arg(long)]
    pub(crate) ignore_timer: bool,

    /// Maximum turns
    #[arg(short = 't', long)]
    pub(crate) max_turns: Option<u32>,

    /// Delay between turns in milliseconds while running
    #[arg(long)]
    pub(crate) step_delay: Option<u64>,

    /// Log text sent to the bots
    #[arg(long)]
    pub(crate) show_stdin: bool,

    /// Log text the bots write to stdout
    #[arg(long)]
    pub(crate) show_stdout: bool,

    /// Do not log text the bots write to stderr
    #[arg(long)]
    pub(crate) hide_stderr: bool,
}

impl MatchArgs {
    /// Build the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub(crate) fn resolve(self) -> Result<RefereeConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => RefereeConfig::load(path)?,
            None => RefereeConfig::default(),
        };

        if let Some(map) = self.map {
            config.map_path = Some(map);
        }
        if let Some(command) = self.player1 {
            config.players[0] = command;
        }
        if let Some(command) = self.player2 {
            config.players[1] = command;
        }
        if let Some(ms) = self.turn_length {
            config.turn_length_ms = ms;
        }
        if let Some(ms) = self.first_turn_length {
            config.first_turn_length_ms = ms;
        }
        if self.ignore_timer {
            config.ignore_timer = true;
        }
        if let Some(turns) = self.max_turns {
            config.max_turns = turns;
        }
        if let Some(ms) = self.step_delay {
            config.step_delay_ms = ms;
        }
        for filter in &mut config.log {
            filter.stdin |= self.show_stdin;
            filter.stdout |= self.show_stdout;
            filter.stderr &= !self.hide_stderr;
        }

        Ok(config)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<planetwars::error::ConfigError> for CliError {
    fn from(e: planetwars::error::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<planetwars::error::MapLoadError> for CliError {
    fn from(e: planetwars::error::MapLoadError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<planetwars::error::RefereeError> for CliError {
    fn from(e: planetwars::error::RefereeError) -> Self {
        Self::new(e.to_string())
    }
}
