#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use planetwars::game::{apply_orders, check_invariants, evaluate, Planet, Side, World};
use planetwars::protocol::parse_orders;

/// A planet as generated by the fuzzer.
#[derive(Arbitrary, Debug)]
struct PlanetInput {
    x: i8,
    y: i8,
    owner: u8,
    ships: u16,
    growth: u8,
}

/// Structured input for whole-turn fuzzing.
#[derive(Arbitrary, Debug)]
struct TurnInput {
    /// Planets of the world.
    planets: Vec<PlanetInput>,
    /// Raw output of player 1.
    output_a: String,
    /// Raw output of player 2.
    output_b: String,
    /// Turns to advance afterwards.
    advances: u8,
}

fuzz_target!(|input: TurnInput| {
    if input.planets.is_empty() || input.planets.len() > 32 {
        return;
    }

    let planets = input
        .planets
        .iter()
        .enumerate()
        .map(|(id, p)| {
            Planet::new(
                id,
                f64::from(p.x),
                f64::from(p.y),
                Side::ALL[usize::from(p.owner % 3)],
                u32::from(p.ships),
                u32::from(p.growth % 8),
            )
        })
        .collect();
    let mut world = World::new(planets, Vec::new());

    let before = [Side::PlayerA, Side::PlayerB].map(|side| world.total_ships(side));

    // Apply both batches the way the referee does: A, then B
    for (side, text) in [(Side::PlayerA, &input.output_a), (Side::PlayerB, &input.output_b)] {
        let output = parse_orders(text);
        let _ = apply_orders(&mut world, side, &output.orders);
    }

    // Launching fleets never changes a side's total
    let after = [Side::PlayerA, Side::PlayerB].map(|side| world.total_ships(side));
    assert_eq!(before, after, "order application changed ship totals");

    for _ in 0..input.advances.min(64) {
        world.begin_turn();
        world.advance();
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
        if evaluate(&world, 1000).is_some() {
            break;
        }
    }
});
