//! World invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger for a world built by the map loader and evolved
//! by order application and world advances. If they do, it indicates a bug.

use crate::game::World;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Planet ids are contiguous and match their index
    for (idx, planet) in world.planets.iter().enumerate() {
        if planet.id != idx {
            violations.push(InvariantViolation {
                message: format!("Planet at index {idx} has id {}", planet.id),
            });
        }
    }

    let count = world.planets.len();
    for (idx, fleet) in world.fleets.iter().enumerate() {
        if fleet.source >= count || fleet.destination >= count {
            violations.push(InvariantViolation {
                message: format!(
                    "Fleet {idx} refers to planets {} -> {} but only {count} exist",
                    fleet.source, fleet.destination
                ),
            });
        }

        if fleet.ships == 0 {
            violations.push(InvariantViolation {
                message: format!("Fleet {idx} carries no ships"),
            });
        }

        if fleet.turns_remaining > fleet.total_trip {
            violations.push(InvariantViolation {
                message: format!(
                    "Fleet {idx} has {} turns remaining on a {}-turn trip",
                    fleet.turns_remaining, fleet.total_trip
                ),
            });
        }

        // Arrived fleets are removed in the same advance
        if fleet.turns_remaining == 0 && world.turn > 0 {
            violations.push(InvariantViolation {
                message: format!("Fleet {idx} has arrived but is still in flight"),
            });
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}
