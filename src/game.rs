//! Game layer for Planet Wars.
//!
//! Implements the rules of a match independently of the bot processes:
//! - Sides, planets, and fleets in flight
//! - Map file loading
//! - Move-order validation and fleet launch
//! - Growth, fleet movement, and battle resolution
//! - End-of-game evaluation

mod combat;
mod fleet;
mod invariants;
mod map;
mod orders;
mod outcome;
mod planet;
mod side;
mod world;

pub use combat::{resolve_battle, BattleResult};
pub use fleet::Fleet;
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use map::{load_map, parse_map};
pub use orders::{apply_order, apply_orders, Order};
pub use outcome::{evaluate, EndReason, Outcome};
pub use planet::{Planet, PlanetId};
pub use side::Side;
pub use world::World;
