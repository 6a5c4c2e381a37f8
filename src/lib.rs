// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Planet Wars: a referee for two-player bot matches.
//!
//! Two bots run as external processes and talk to the referee over a plain
//! text protocol on stdin/stdout. Each turn the referee sends every bot the
//! world from its own point of view, collects move orders until `go`, applies
//! them, and advances the world.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Referee (turn state machine)      │──▶ EventBus ──▶ observers
//! ├──────────────────┬──────────────────┤
//! │  BotProcess × 2  │  Protocol codec  │
//! ├──────────────────┴──────────────────┤
//! │   Game rules (world, orders, combat)│
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use planetwars::config::RefereeConfig;
//! use planetwars::referee::{Referee, State};
//! use std::time::Duration;
//!
//! let config = RefereeConfig {
//!     map_path: Some("maps/map1.txt".into()),
//!     players: ["./bot_a".into(), "./bot_b".into()],
//!     ..RefereeConfig::default()
//! };
//! let mut referee = Referee::new(config);
//! referee.reset().expect("map loads");
//! referee.run();
//! while referee.state() != State::Stopped {
//!     referee.tick(Duration::from_millis(50));
//! }
//! println!("{:?}", referee.outcome());
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod protocol;
pub mod referee;

pub use bot::BotProcess;
pub use config::RefereeConfig;
pub use events::{Event, EventBus};
pub use game::{Fleet, Outcome, Planet, PlanetId, Side, World};
pub use referee::{Control, Referee, RefereeHandle, State};
