//! World state: planets, fleets in flight, and the turn counter.

use crate::game::{resolve_battle, Fleet, Planet, PlanetId, Side};

/// Complete simulation state of a match.
///
/// A world is replaced wholesale on reset; nothing is patched in place
/// across maps.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Planets, indexed by id.
    pub planets: Vec<Planet>,
    /// Fleets in flight.
    pub fleets: Vec<Fleet>,
    /// Fleets launched during the current turn (display only).
    pub new_fleets: Vec<Fleet>,
    /// Current turn number (0 until the first turn starts).
    pub turn: u32,
}

impl World {
    /// Create a world at turn 0.
    #[must_use]
    pub fn new(planets: Vec<Planet>, fleets: Vec<Fleet>) -> Self {
        Self {
            planets,
            new_fleets: fleets.clone(),
            fleets,
            turn: 0,
        }
    }

    /// Start the next turn: bump the counter and forget last turn's launches.
    pub fn begin_turn(&mut self) -> u32 {
        self.turn += 1;
        self.new_fleets.clear();
        self.turn
    }

    /// Get a planet by id.
    #[must_use]
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id)
    }

    /// Get a mutable planet by id.
    #[must_use]
    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(id)
    }

    /// Add a freshly launched fleet.
    pub fn launch(&mut self, fleet: Fleet) {
        self.new_fleets.push(fleet);
        self.fleets.push(fleet);
    }

    /// Total ships a side owns, on planets and in flight.
    #[must_use]
    pub fn total_ships(&self, side: Side) -> u64 {
        let on_planets: u64 = self
            .planets
            .iter()
            .filter(|p| p.owner == side)
            .map(|p| u64::from(p.ships))
            .sum();
        let in_flight: u64 = self
            .fleets
            .iter()
            .filter(|f| f.owner == side)
            .map(|f| u64::from(f.ships))
            .sum();
        on_planets + in_flight
    }

    /// Number of planets a side owns.
    #[must_use]
    pub fn planet_count(&self, side: Side) -> usize {
        self.planets.iter().filter(|p| p.owner == side).count()
    }

    /// Advance the world by one tick.
    ///
    /// 1. Owned planets grow.
    /// 2. Fleets move; arrived fleets leave the flight set and land.
    /// 3. Every planet with landings resolves its battle.
    pub fn advance(&mut self) {
        for planet in &mut self.planets {
            planet.grow();
        }

        let mut landings: Vec<Vec<(Side, u32)>> = vec![Vec::new(); self.planets.len()];
        self.fleets.retain_mut(|fleet| {
            if fleet.advance() {
                if let Some(queue) = landings.get_mut(fleet.destination) {
                    queue.push((fleet.owner, fleet.ships));
                }
                false
            } else {
                true
            }
        });

        for (planet, arrivals) in self.planets.iter_mut().zip(&landings) {
            if arrivals.is_empty() {
                continue;
            }
            let result = resolve_battle(planet.owner, planet.ships, arrivals);
            planet.owner = result.owner;
            planet.ships = result.ships;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> World {
        let planets = vec![
            Planet::new(0, 0.0, 0.0, Side::PlayerA, 10, 2),
            Planet::new(1, 3.0, 4.0, Side::Neutral, 3, 4),
            Planet::new(2, 6.0, 8.0, Side::PlayerB, 10, 2),
        ];
        World::new(planets, Vec::new())
    }

    #[test]
    fn test_world_creation() {
        let world = create_test_world();
        assert_eq!(world.turn, 0);
        assert_eq!(world.planets.len(), 3);
        assert!(world.fleets.is_empty());
    }

    #[test]
    fn test_begin_turn_clears_new_fleets() {
        let mut world = create_test_world();
        let fleet = Fleet::launch(Side::PlayerA, 4, &world.planets[0], &world.planets[1]);
        world.launch(fleet);
        assert_eq!(world.new_fleets.len(), 1);
        assert_eq!(world.begin_turn(), 1);
        assert!(world.new_fleets.is_empty());
        assert_eq!(world.fleets.len(), 1);
    }

    #[test]
    fn test_totals_include_fleets() {
        let mut world = create_test_world();
        let fleet = Fleet::launch(Side::PlayerA, 4, &world.planets[0], &world.planets[1]);
        world.planets[0].ships -= 4;
        world.launch(fleet);
        assert_eq!(world.total_ships(Side::PlayerA), 10);
        assert_eq!(world.total_ships(Side::PlayerB), 10);
        assert_eq!(world.total_ships(Side::Neutral), 3);
    }

    #[test]
    fn test_advance_grows_owned_only() {
        let mut world = create_test_world();
        world.advance();
        assert_eq!(world.planets[0].ships, 12);
        assert_eq!(world.planets[1].ships, 3);
        assert_eq!(world.planets[2].ships, 12);
    }

    #[test]
    fn test_fleet_lands_and_captures() {
        let mut world = create_test_world();
        let fleet = Fleet::launch(Side::PlayerA, 10, &world.planets[0], &world.planets[1]);
        world.planets[0].ships = 0;
        world.launch(fleet);

        for _ in 0..4 {
            world.advance();
            assert_eq!(world.fleets.len(), 1);
        }
        world.advance();
        assert!(world.fleets.is_empty());
        assert_eq!(world.planets[1].owner, Side::PlayerA);
        assert_eq!(world.planets[1].ships, 7);
    }

    #[test]
    fn test_simultaneous_landings_resolve_together() {
        let mut world = create_test_world();
        let from_a = Fleet::new(Side::PlayerA, 8, &world.planets[0], &world.planets[1], 1, 1);
        let from_b = Fleet::new(Side::PlayerB, 6, &world.planets[2], &world.planets[1], 1, 1);
        world.launch(from_a);
        world.launch(from_b);

        world.advance();
        // Neutral 3, A 8, B 6: A wins with 8 - 6.
        assert_eq!(world.planets[1].owner, Side::PlayerA);
        assert_eq!(world.planets[1].ships, 2);
    }

    #[test]
    fn test_growth_happens_before_battle() {
        let mut world = create_test_world();
        // B's planet grows from 10 to 12 before A's 11 ships land.
        let fleet = Fleet::new(Side::PlayerA, 11, &world.planets[0], &world.planets[2], 1, 1);
        world.launch(fleet);
        world.advance();
        assert_eq!(world.planets[2].owner, Side::PlayerB);
        assert_eq!(world.planets[2].ships, 1);
    }
}
