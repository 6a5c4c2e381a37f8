#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use planetwars::game::{resolve_battle, Side};

/// Structured input for battle fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Owner id before the battle (taken mod 3).
    owner: u8,
    /// Garrison before the battle.
    garrison: u32,
    /// Landed fleets as (owner id, ships).
    arrivals: Vec<(u8, u32)>,
}

fn side(id: u8) -> Side {
    Side::ALL[usize::from(id % 3)]
}

fuzz_target!(|input: CombatInput| {
    // Cap inputs to keep runs short
    if input.arrivals.len() > 64 {
        return;
    }
    let owner = side(input.owner);
    let arrivals: Vec<(Side, u32)> = input
        .arrivals
        .iter()
        .map(|&(id, ships)| (side(id), ships))
        .collect();

    // Must not panic
    let result = resolve_battle(owner, input.garrison, &arrivals);

    let mut forces = [0u64; 3];
    forces[owner.index()] += u64::from(input.garrison);
    for &(s, ships) in &arrivals {
        forces[s.index()] += u64::from(ships);
    }

    // Ships are never created
    let total: u64 = forces.iter().sum();
    assert!(u64::from(result.ships) <= total, "battle created ships");

    // Ownership changes only to a strictly largest force
    if result.owner != owner {
        let winner = forces[result.owner.index()];
        for (idx, &force) in forces.iter().enumerate() {
            assert!(idx == result.owner.index() || force < winner, "new owner was not the largest force");
        }
    }

    // Landing order does not matter
    let mut reversed = arrivals.clone();
    reversed.reverse();
    assert_eq!(resolve_battle(owner, input.garrison, &reversed), result);
});
