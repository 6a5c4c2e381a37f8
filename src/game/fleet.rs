//! Fleets in flight between planets.

use crate::game::{Planet, PlanetId, Side};

/// A group of ships travelling from one planet to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fleet {
    /// Owner of the ships.
    pub owner: Side,
    /// Number of ships, fixed at launch.
    pub ships: u32,
    /// Planet the fleet left.
    pub source: PlanetId,
    /// Planet the fleet is heading to.
    pub destination: PlanetId,
    /// Trip length in turns, fixed at launch.
    pub total_trip: u32,
    /// Turns left until arrival.
    pub turns_remaining: u32,
    /// Source coordinates, kept for position interpolation.
    from: (f64, f64),
    /// Destination coordinates, kept for position interpolation.
    to: (f64, f64),
}

impl Fleet {
    /// Create a fleet between two planets.
    ///
    /// `turns_remaining` is clamped to `total_trip`.
    #[must_use]
    pub fn new(
        owner: Side,
        ships: u32,
        source: &Planet,
        destination: &Planet,
        total_trip: u32,
        turns_remaining: u32,
    ) -> Self {
        Self {
            owner,
            ships,
            source: source.id,
            destination: destination.id,
            total_trip,
            turns_remaining: turns_remaining.min(total_trip),
            from: (source.x, source.y),
            to: (destination.x, destination.y),
        }
    }

    /// Launch a fleet whose trip length is the distance between the planets.
    #[must_use]
    pub fn launch(owner: Side, ships: u32, source: &Planet, destination: &Planet) -> Self {
        let trip = source.distance_to(destination);
        Self::new(owner, ships, source, destination, trip, trip)
    }

    /// Move one turn closer. Returns `true` once the fleet has arrived.
    pub fn advance(&mut self) -> bool {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        self.has_arrived()
    }

    /// Whether the fleet has reached its destination.
    #[must_use]
    pub const fn has_arrived(&self) -> bool {
        self.turns_remaining == 0
    }

    /// Current position, linearly interpolated along the trip.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        if self.total_trip == 0 {
            return self.to;
        }
        let elapsed = f64::from(self.total_trip - self.turns_remaining);
        let progress = elapsed / f64::from(self.total_trip);
        (
            self.from.0 + (self.to.0 - self.from.0) * progress,
            self.from.1 + (self.to.1 - self.from.1) * progress,
        )
    }
}
