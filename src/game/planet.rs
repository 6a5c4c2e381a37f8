//! Planet type.

use std::collections::BTreeMap;

use crate::game::Side;

/// Planet identifier: the 0-based position in map-file order.
pub type PlanetId = usize;

/// A planet on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    /// Stable id assigned at load time.
    pub id: PlanetId,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Current owner.
    pub owner: Side,
    /// Ships stationed on the planet (the garrison).
    pub ships: u32,
    /// Ships added per turn while owned by a player.
    pub growth_rate: u32,
    /// Cosmetic properties set by bots through `#-` directives.
    annotations: BTreeMap<String, String>,
}

impl Planet {
    /// Create a planet.
    #[must_use]
    pub fn new(id: PlanetId, x: f64, y: f64, owner: Side, ships: u32, growth_rate: u32) -> Self {
        Self {
            id,
            x,
            y,
            owner,
            ships,
            growth_rate,
            annotations: BTreeMap::new(),
        }
    }

    /// Travel time to another planet: the Euclidean distance rounded up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn distance_to(&self, other: &Planet) -> u32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy).ceil() as u32
    }

    /// Add this turn's growth. Neutral planets never grow.
    pub fn grow(&mut self) {
        if self.owner.is_player() {
            self.ships = self.ships.saturating_add(self.growth_rate);
        }
    }

    /// Set a display-only property.
    pub fn annotate(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(name.into(), value.into());
    }

    /// Display-only properties, sorted by name.
    #[must_use]
    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }
}
