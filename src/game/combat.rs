//! Battle resolution.
//!
//! A battle happens at a planet whenever one or more fleets land there in the
//! same turn. Every side's forces are pooled: the garrison counts for the
//! current owner, and each landed fleet counts for its own owner. The largest
//! force wins and loses as many ships as the second-largest force had.

use crate::game::Side;

/// Outcome of a battle at one planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleResult {
    /// Owner after the battle.
    pub owner: Side,
    /// Garrison after the battle.
    pub ships: u32,
}

/// Resolve a battle at a planet.
///
/// `arrivals` lists the landed fleets as `(owner, ships)`; their order does
/// not matter. Rules:
/// - the side with the strictly largest total takes or keeps the planet with
///   `total - second_largest` ships;
/// - if the top two totals are tied, the current owner keeps the planet with
///   no ships left, which also covers two attackers tying over a neutral planet.
#[must_use]
pub fn resolve_battle(owner: Side, garrison: u32, arrivals: &[(Side, u32)]) -> BattleResult {
    let mut forces = [0u64; 3];
    forces[owner.index()] += u64::from(garrison);
    for &(side, ships) in arrivals {
        forces[side.index()] += u64::from(ships);
    }

    let mut ranked: Vec<(Side, u64)> = Side::ALL.iter().map(|&s| (s, forces[s.index()])).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let (leader, top) = ranked[0];
    let second = ranked[1].1;

    if top > second {
        BattleResult {
            owner: leader,
            ships: clamp_ships(top - second),
        }
    } else {
        BattleResult { owner, ships: 0 }
    }
}

fn clamp_ships(ships: u64) -> u32 {
    u32::try_from(ships).unwrap_or(u32::MAX)
}
