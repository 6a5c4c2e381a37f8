//! End-of-game evaluation.

use serde::Serialize;

use crate::game::{Side, World};

/// Why a match ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// One or both sides ran out of ships.
    Elimination,
    /// The turn limit was reached.
    TurnLimit,
    /// One or both bots broke the protocol, made an illegal move, or died.
    Fault {
        /// Sides at fault.
        sides: Vec<Side>,
    },
    /// The match was stopped by the controller before it finished.
    Aborted,
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The winning side, or `None` for a draw.
    pub winner: Option<Side>,
    /// Why the match ended.
    pub reason: EndReason,
    /// Turn on which the match ended.
    pub turn: u32,
}

impl Outcome {
    /// Whether the match was drawn.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Outcome when the given sides faulted: the other side wins, or a draw
    /// when both faulted.
    #[must_use]
    pub fn forfeit(sides: Vec<Side>, turn: u32) -> Self {
        let winner = match sides.as_slice() {
            [side] => Some(side.opponent()),
            _ => None,
        };
        Self {
            winner,
            reason: EndReason::Fault { sides },
            turn,
        }
    }
}

/// Decide whether the match is over after a world advance.
///
/// Ships on planets and in flight both count. A side with no ships loses;
/// both at zero is a draw. At the turn limit the side with more ships wins,
/// and equal totals draw.
#[must_use]
pub fn evaluate(world: &World, max_turns: u32) -> Option<Outcome> {
    let a = world.total_ships(Side::PlayerA);
    let b = world.total_ships(Side::PlayerB);

    let (winner, reason) = if a == 0 || b == 0 {
        let winner = match (a, b) {
            (0, 0) => None,
            (_, 0) => Some(Side::PlayerA),
            _ => Some(Side::PlayerB),
        };
        (winner, EndReason::Elimination)
    } else if world.turn >= max_turns {
        let winner = match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Side::PlayerA),
            std::cmp::Ordering::Less => Some(Side::PlayerB),
            std::cmp::Ordering::Equal => None,
        };
        (winner, EndReason::TurnLimit)
    } else {
        return None;
    };

    Some(Outcome {
        winner,
        reason,
        turn: world.turn,
    })
}
