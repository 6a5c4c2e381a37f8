//! Referee configuration.
//!
//! Settings are plain data supplied by whoever drives the referee. They can
//! be kept in a JSON file between sessions; missing fields take defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Side;

/// Per-player trace filter for the event logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamFilter {
    /// Show text sent to the bot.
    pub stdin: bool,
    /// Show text the bot wrote to stdout.
    pub stdout: bool,
    /// Show text the bot wrote to stderr.
    pub stderr: bool,
}

impl Default for StreamFilter {
    fn default() -> Self {
        Self {
            stdin: false,
            stdout: false,
            stderr: true,
        }
    }
}

/// Configuration for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefereeConfig {
    /// Map file loaded on reset.
    pub map_path: Option<PathBuf>,
    /// Launch command for each player, first player first.
    pub players: [String; 2],
    /// Time each bot gets per turn, in milliseconds.
    pub turn_length_ms: u64,
    /// Time each bot gets on turn 1, in milliseconds.
    pub first_turn_length_ms: u64,
    /// Wait for both bots indefinitely instead of enforcing a deadline.
    pub ignore_timer: bool,
    /// Turn limit.
    pub max_turns: u32,
    /// Pause between turns while running continuously, in milliseconds.
    pub step_delay_ms: u64,
    /// Trace filters, first player first.
    pub log: [StreamFilter; 2],
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            map_path: None,
            players: [String::new(), String::new()],
            turn_length_ms: 1000,
            first_turn_length_ms: 3000,
            ignore_timer: false,
            max_turns: 200,
            step_delay_ms: 100,
            log: [StreamFilter::default(); 2],
        }
    }
}

impl RefereeConfig {
    /// Read a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json + "\n").map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Launch command for a player. Neutral has none.
    #[must_use]
    pub fn launch_command(&self, side: Side) -> &str {
        match side {
            Side::PlayerA => &self.players[0],
            Side::PlayerB => &self.players[1],
            Side::Neutral => "",
        }
    }

    /// Trace filter for a player. Neutral shows nothing.
    #[must_use]
    pub fn stream_filter(&self, side: Side) -> StreamFilter {
        match side {
            Side::PlayerA => self.log[0],
            Side::PlayerB => self.log[1],
            Side::Neutral => StreamFilter {
                stdin: false,
                stdout: false,
                stderr: false,
            },
        }
    }

    /// Deadline for a given turn: turn 1 gets the first-turn length.
    #[must_use]
    pub fn turn_deadline(&self, turn: u32) -> Duration {
        if turn == 1 {
            Duration::from_millis(self.first_turn_length_ms)
        } else {
            Duration::from_millis(self.turn_length_ms)
        }
    }

    /// Pause between turns while running continuously.
    #[must_use]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
