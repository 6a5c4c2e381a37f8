//! Move orders: validation and fleet launch.

use tracing::debug;

use crate::error::{OrderError, TurnFault};
use crate::game::{Fleet, PlanetId, Side, World};

/// A move order as written by a bot: `source destination ships`.
///
/// Fields keep the bot's raw integers so that range errors can be reported
/// with the values the bot actually sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Source planet id.
    pub source: i64,
    /// Destination planet id.
    pub destination: i64,
    /// Ships to send.
    pub ships: i64,
}

impl Order {
    /// Create an order.
    #[must_use]
    pub const fn new(source: i64, destination: i64, ships: i64) -> Self {
        Self {
            source,
            destination,
            ships,
        }
    }
}

/// Validate one order against the live world and launch its fleet.
///
/// Ownership is checked against the current world, after earlier orders of
/// the same batch have already taken their ships. A valid order for zero
/// ships changes nothing and returns `Ok(None)`.
///
/// # Errors
///
/// Returns the rule the order breaks; the world is left untouched.
pub fn apply_order(world: &mut World, side: Side, order: Order) -> Result<Option<PlanetId>, OrderError> {
    let count = world.planets.len();
    let source = planet_index(order.source, count).ok_or(OrderError::UnknownSource(order.source))?;
    let destination = planet_index(order.destination, count)
        .ok_or(OrderError::UnknownDestination(order.destination))?;

    if source == destination {
        return Err(OrderError::SameSourceAndDestination(source));
    }

    let from = &world.planets[source];
    if from.owner != side {
        return Err(OrderError::NotOwner {
            planet: source,
            side,
        });
    }

    let ships = u32::try_from(order.ships)
        .ok()
        .filter(|&n| n <= from.ships)
        .ok_or(OrderError::ShipCount {
            planet: source,
            requested: order.ships,
            available: from.ships,
        })?;

    if ships == 0 {
        return Ok(None);
    }

    let fleet = Fleet::launch(side, ships, from, &world.planets[destination]);
    world.planets[source].ships -= ships;
    debug!(%side, source, destination, ships, trip = fleet.total_trip, "fleet launched");
    world.launch(fleet);
    Ok(Some(destination))
}

/// Apply a side's whole batch in emitted order.
///
/// Processing stops at the first illegal order; orders before it stay
/// applied. Each entry carries the output line it came from.
///
/// # Errors
///
/// Returns the first illegal order, tagged with its line.
pub fn apply_orders(world: &mut World, side: Side, orders: &[(usize, Order)]) -> Result<usize, TurnFault> {
    let mut launched = 0;
    for &(line, order) in orders {
        match apply_order(world, side, order) {
            Ok(Some(_)) => launched += 1,
            Ok(None) => {}
            Err(error) => return Err(TurnFault::Order { line, error }),
        }
    }
    Ok(launched)
}

fn planet_index(id: i64, count: usize) -> Option<PlanetId> {
    usize::try_from(id).ok().filter(|&idx| idx < count)
}
