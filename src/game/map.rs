//! Map file loading.
//!
//! One directive per line; `#` starts a comment and blank lines are skipped:
//!
//! ```text
//! P <x> <y> <owner> <ships> <growth>
//! F <owner> <ships> <source> <destination> <trip_length> <turns_remaining>
//! ```
//!
//! Planet ids are assigned in file order starting at 0. Any malformed line
//! aborts the load and nothing is returned.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::MapLoadError;
use crate::game::{Fleet, Planet, Side, World};

/// A fleet line waiting for planet references to be resolved.
struct PendingFleet {
    line: usize,
    owner: Side,
    ships: u32,
    source: i64,
    destination: i64,
    total_trip: u32,
    turns_remaining: u32,
}

/// Read and parse a map file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is malformed.
pub fn load_map(path: &Path) -> Result<World, MapLoadError> {
    let text = fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text)
}

/// Parse map text into a fresh world at turn 0.
///
/// # Errors
///
/// Returns the first malformed line found.
pub fn parse_map(text: &str) -> Result<World, MapLoadError> {
    let mut planets = Vec::new();
    let mut pending = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = content.split_whitespace().collect();

        match tokens.first() {
            None => {}
            Some(&"P") => {
                expect_tokens(line, "planet", 6, tokens.len())?;
                let x = coordinate(line, tokens[1])?;
                let y = coordinate(line, tokens[2])?;
                let owner = side(line, tokens[3])?;
                let ships = count(line, "ship count", tokens[4])?;
                let growth = count(line, "growth rate", tokens[5])?;
                planets.push(Planet::new(planets.len(), x, y, owner, ships, growth));
            }
            Some(&"F") => {
                expect_tokens(line, "fleet", 7, tokens.len())?;
                let fleet = PendingFleet {
                    line,
                    owner: side(line, tokens[1])?,
                    ships: count(line, "ship count", tokens[2])?,
                    source: number(line, tokens[3])?,
                    destination: number(line, tokens[4])?,
                    total_trip: count(line, "trip length", tokens[5])?,
                    turns_remaining: count(line, "turns remaining", tokens[6])?,
                };
                if fleet.ships == 0 {
                    return Err(MapLoadError::EmptyFleet { line });
                }
                if fleet.turns_remaining > fleet.total_trip {
                    return Err(MapLoadError::TripBounds {
                        line,
                        remaining: fleet.turns_remaining,
                        total: fleet.total_trip,
                    });
                }
                pending.push(fleet);
            }
            Some(_) => return Err(MapLoadError::UnknownDirective { line }),
        }
    }

    let fleets = pending
        .into_iter()
        .map(|f| {
            let source = planet_ref(&planets, f.line, f.source)?;
            let destination = planet_ref(&planets, f.line, f.destination)?;
            Ok(Fleet::new(
                f.owner,
                f.ships,
                source,
                destination,
                f.total_trip,
                f.turns_remaining,
            ))
        })
        .collect::<Result<Vec<_>, MapLoadError>>()?;

    Ok(World::new(planets, fleets))
}

fn expect_tokens(
    line: usize,
    kind: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), MapLoadError> {
    if found == expected {
        Ok(())
    } else {
        Err(MapLoadError::TokenCount {
            line,
            kind,
            expected,
            found,
        })
    }
}

fn number<T: FromStr>(line: usize, token: &str) -> Result<T, MapLoadError> {
    token.parse().map_err(|_| MapLoadError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn coordinate(line: usize, token: &str) -> Result<f64, MapLoadError> {
    let value: f64 = number(line, token)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MapLoadError::NonFiniteCoordinate {
            line,
            token: token.to_string(),
        })
    }
}

fn side(line: usize, token: &str) -> Result<Side, MapLoadError> {
    let owner: i64 = number(line, token)?;
    Side::from_id(owner).ok_or(MapLoadError::InvalidOwner { line, owner })
}

fn count(line: usize, field: &'static str, token: &str) -> Result<u32, MapLoadError> {
    let value: i64 = number(line, token)?;
    if value < 0 {
        return Err(MapLoadError::Negative { line, field, value });
    }
    u32::try_from(value).map_err(|_| MapLoadError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn planet_ref(planets: &[Planet], line: usize, id: i64) -> Result<&Planet, MapLoadError> {
    usize::try_from(id)
        .ok()
        .and_then(|idx| planets.get(idx))
        .ok_or(MapLoadError::UnknownPlanet { line, planet: id })
}
