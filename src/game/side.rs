//! Sides of a match and point-of-view remapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three possible owners of a planet or fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Unowned planets. Never runs a bot and never grows.
    Neutral = 0,
    /// The first bot.
    PlayerA = 1,
    /// The second bot.
    PlayerB = 2,
}

impl Side {
    /// The two sides that run bots, in processing order.
    pub const PLAYERS: [Side; 2] = [Side::PlayerA, Side::PlayerB];

    /// All three sides, indexed by id.
    pub const ALL: [Side; 3] = [Side::Neutral, Side::PlayerA, Side::PlayerB];

    /// Look up a side by its fixed id.
    #[must_use]
    pub const fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Side::Neutral),
            1 => Some(Side::PlayerA),
            2 => Some(Side::PlayerB),
            _ => None,
        }
    }

    /// The fixed id (0, 1 or 2).
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Index into per-side tables of length 3.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this side runs a bot.
    #[must_use]
    pub const fn is_player(self) -> bool {
        !matches!(self, Side::Neutral)
    }

    /// The other player. Neutral has no opponent and maps to itself.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Neutral => Side::Neutral,
            Side::PlayerA => Side::PlayerB,
            Side::PlayerB => Side::PlayerA,
        }
    }

    /// This side's id as seen by `viewer`.
    ///
    /// Every bot sees itself as `1` and its opponent as `2`; neutral stays `0`.
    #[must_use]
    pub const fn pov_id(self, viewer: Side) -> u8 {
        match self {
            Side::Neutral => 0,
            _ if self as u8 == viewer as u8 => 1,
            _ => 2,
        }
    }

    /// Inverse of [`Side::pov_id`]: the real side behind a POV id sent to `viewer`.
    #[must_use]
    pub const fn from_pov_id(pov: i64, viewer: Side) -> Option<Self> {
        match pov {
            0 => Some(Side::Neutral),
            1 => Some(viewer),
            2 => Some(viewer.opponent()),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Neutral => write!(f, "Neutral"),
            Side::PlayerA => write!(f, "Player 1"),
            Side::PlayerB => write!(f, "Player 2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_ids_round_trip() {
        for side in Side::ALL {
            assert_eq!(Side::from_id(i64::from(side.id())), Some(side));
        }
        assert_eq!(Side::from_id(3), None);
        assert_eq!(Side::from_id(-1), None);
    }

    #[test]
    fn test_pov_self_is_one() {
        assert_eq!(Side::PlayerA.pov_id(Side::PlayerA), 1);
        assert_eq!(Side::PlayerB.pov_id(Side::PlayerB), 1);
    }

    #[test]
    fn test_pov_opponent_is_two() {
        assert_eq!(Side::PlayerB.pov_id(Side::PlayerA), 2);
        assert_eq!(Side::PlayerA.pov_id(Side::PlayerB), 2);
    }

    #[test]
    fn test_pov_neutral_is_zero() {
        assert_eq!(Side::Neutral.pov_id(Side::PlayerA), 0);
        assert_eq!(Side::Neutral.pov_id(Side::PlayerB), 0);
    }

    #[test]
    fn test_from_pov_id() {
        assert_eq!(Side::from_pov_id(1, Side::PlayerB), Some(Side::PlayerB));
        assert_eq!(Side::from_pov_id(2, Side::PlayerB), Some(Side::PlayerA));
        assert_eq!(Side::from_pov_id(0, Side::PlayerB), Some(Side::Neutral));
        assert_eq!(Side::from_pov_id(7, Side::PlayerB), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Side::PlayerA.to_string(), "Player 1");
        assert_eq!(Side::Neutral.to_string(), "Neutral");
    }
}
