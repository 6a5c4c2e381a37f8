//! Property-based tests for game mechanics.
//!
//! These tests verify properties of combat, growth, orders and the protocol.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use planetwars::game::{apply_order, resolve_battle, Order, Planet, Side, World};
use planetwars::protocol::{parse_orders, serialize_state};

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Neutral), Just(Side::PlayerA), Just(Side::PlayerB)]
}

fn player_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::PlayerA), Just(Side::PlayerB)]
}

fn arrivals_strategy() -> impl Strategy<Value = Vec<(Side, u32)>> {
    prop::collection::vec((player_strategy(), 1u32..10_000), 1..8)
}

fn world_strategy() -> impl Strategy<Value = World> {
    prop::collection::vec(
        (-50.0f64..50.0, -50.0f64..50.0, side_strategy(), 0u32..500, 0u32..6),
        2..8,
    )
    .prop_map(|rows| {
        let planets = rows
            .into_iter()
            .enumerate()
            .map(|(id, (x, y, owner, ships, growth))| Planet::new(id, x, y, owner, ships, growth))
            .collect();
        World::new(planets, Vec::new())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Landing order never changes the battle result.
    #[test]
    fn prop_battle_is_commutative(
        owner in side_strategy(),
        garrison in 0u32..10_000,
        arrivals in arrivals_strategy(),
        rotate in 0usize..8
    ) {
        let forward = resolve_battle(owner, garrison, &arrivals);

        let mut reversed = arrivals.clone();
        reversed.reverse();
        prop_assert_eq!(resolve_battle(owner, garrison, &reversed), forward);

        let mut rotated = arrivals.clone();
        let len = rotated.len();
        rotated.rotate_left(rotate % len);
        prop_assert_eq!(resolve_battle(owner, garrison, &rotated), forward);
    }

    /// A battle never creates ships, and a new owner always had the largest force.
    #[test]
    fn prop_battle_bounded(
        owner in side_strategy(),
        garrison in 0u32..10_000,
        arrivals in arrivals_strategy()
    ) {
        let result = resolve_battle(owner, garrison, &arrivals);
        let mut forces = [0u64; 3];
        forces[owner.index()] += u64::from(garrison);
        for &(side, ships) in &arrivals {
            forces[side.index()] += u64::from(ships);
        }
        let total: u64 = forces.iter().sum();
        prop_assert!(u64::from(result.ships) <= total);
        if result.owner != owner {
            let winner = forces[result.owner.index()];
            prop_assert!(forces.iter().enumerate().all(|(i, &f)| i == result.owner.index() || f < winner));
        }
    }

    /// Every bot sees itself as 1, its opponent as 2 and neutral as 0.
    #[test]
    fn prop_pov_remap(side in side_strategy(), viewer in player_strategy()) {
        let pov = side.pov_id(viewer);
        match side {
            Side::Neutral => prop_assert_eq!(pov, 0),
            s if s == viewer => prop_assert_eq!(pov, 1),
            _ => prop_assert_eq!(pov, 2),
        }
        prop_assert_eq!(Side::from_pov_id(i64::from(pov), viewer), Some(side));
    }

    /// Serialized ownership follows the viewer's point of view.
    #[test]
    fn prop_serialized_owners(world in world_strategy(), viewer in player_strategy()) {
        let text = serialize_state(&world, viewer);
        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines.len(), world.planets.len() + 1);
        prop_assert_eq!(*lines.last().unwrap(), "go");
        for (planet, line) in world.planets.iter().zip(&lines) {
            let owner: u8 = line.split_whitespace().nth(3).unwrap().parse().unwrap();
            prop_assert_eq!(owner, planet.owner.pov_id(viewer));
        }
    }

    /// Neutral planets and zero-growth planets never grow.
    #[test]
    fn prop_growth_boundaries(
        owner in side_strategy(),
        ships in 0u32..1_000_000,
        growth in 0u32..100
    ) {
        let mut planet = Planet::new(0, 0.0, 0.0, owner, ships, growth);
        planet.grow();
        if owner == Side::Neutral || growth == 0 {
            prop_assert_eq!(planet.ships, ships);
        } else {
            prop_assert_eq!(planet.ships, ships + growth);
        }
    }

    /// Applying any order never panics, and a side's ship total is unchanged
    /// by launching a fleet.
    #[test]
    fn prop_apply_order_conserves_ships(
        mut world in world_strategy(),
        side in player_strategy(),
        source in -2i64..10,
        destination in -2i64..10,
        ships in -5i64..600
    ) {
        let before = world.total_ships(side);
        let fleets = world.fleets.len();
        match apply_order(&mut world, side, Order::new(source, destination, ships)) {
            Ok(Some(_)) => prop_assert_eq!(world.fleets.len(), fleets + 1),
            Ok(None) | Err(_) => prop_assert_eq!(world.fleets.len(), fleets),
        }
        prop_assert_eq!(world.total_ships(side), before);
    }

    /// The order parser accepts any text without panicking.
    #[test]
    fn prop_parse_orders_no_panic(text in "(?s).{0,400}") {
        let output = parse_orders(&text);
        prop_assert!(output.terminated || output.fault().is_some());
    }
}
