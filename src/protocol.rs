//! Text protocol spoken with bot processes.
//!
//! Engine to bot, once per turn, relabelled so the receiving bot is always
//! side `1` and its opponent side `2`:
//!
//! ```text
//! P <x> <y> <owner> <ships> <growth>
//! F <owner> <ships> <source> <destination> <trip_length> <turns_remaining>
//! go
//! ```
//!
//! Bot to engine: zero or more `source destination ships` lines, optional
//! `#- planet <id> <name> <value>` display directives, then `go`.

use std::fmt::Write as _;

use crate::error::ProtocolError;
use crate::game::{Order, PlanetId, Side, World};

/// Line that ends a message in either direction.
pub const TERMINATOR: &str = "go";

/// A display directive attached to a planet. Has no effect on the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Planet the property belongs to.
    pub planet: PlanetId,
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: String,
}

/// Everything a bot said during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotOutput {
    /// Orders tagged with their 1-based output line.
    pub orders: Vec<(usize, Order)>,
    /// Display directives.
    pub annotations: Vec<Annotation>,
    /// Whether the `go` line was seen.
    pub terminated: bool,
    /// First protocol error, if any. Orders before it are kept.
    pub error: Option<ProtocolError>,
}

impl BotOutput {
    /// The error that ends the turn for this bot: a malformed line, or the
    /// missing terminator when every line was well-formed.
    #[must_use]
    pub fn fault(&self) -> Option<ProtocolError> {
        match &self.error {
            Some(err) => Some(err.clone()),
            None if !self.terminated => Some(ProtocolError::MissingTerminator),
            None => None,
        }
    }
}

/// Render the world as seen by `viewer`.
#[must_use]
pub fn serialize_state(world: &World, viewer: Side) -> String {
    let mut out = String::new();
    for planet in &world.planets {
        let _ = writeln!(
            out,
            "P {} {} {} {} {}",
            planet.x,
            planet.y,
            planet.owner.pov_id(viewer),
            planet.ships,
            planet.growth_rate
        );
    }
    for fleet in &world.fleets {
        let _ = writeln!(
            out,
            "F {} {} {} {} {} {}",
            fleet.owner.pov_id(viewer),
            fleet.ships,
            fleet.source,
            fleet.destination,
            fleet.total_trip,
            fleet.turns_remaining
        );
    }
    out.push_str(TERMINATOR);
    out.push('\n');
    out
}

/// Whether accumulated output already holds a complete turn.
#[must_use]
pub fn contains_terminator(buffer: &str) -> bool {
    buffer.lines().any(is_terminator)
}

/// The terminator must fill the whole line; only a trailing `\r` is allowed.
fn is_terminator(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == TERMINATOR
}

/// Parse one turn of bot output.
///
/// Lines are read until `go`. Blank lines are skipped; `#-` lines become
/// annotations; everything else must be exactly three integers. Parsing
/// stops at the first malformed line.
#[must_use]
pub fn parse_orders(buffer: &str) -> BotOutput {
    let mut output = BotOutput::default();

    for (idx, raw) in buffer.lines().enumerate() {
        let line = idx + 1;
        if is_terminator(raw) {
            output.terminated = true;
            break;
        }
        let text = raw.trim();

        if text.is_empty() {
            continue;
        }
        if let Some(directive) = display_directive(text) {
            if let Some(annotation) = parse_annotation(directive) {
                output.annotations.push(annotation);
            }
            continue;
        }

        match parse_order_line(line, text) {
            Ok(order) => output.orders.push((line, order)),
            Err(err) => {
                output.error = Some(err);
                break;
            }
        }
    }

    output
}

fn parse_order_line(line: usize, text: &str) -> Result<Order, ProtocolError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(ProtocolError::TokenCount {
            line,
            found: tokens.len(),
        });
    }

    let field = |token: &str| {
        token.parse::<i64>().map_err(|_| ProtocolError::InvalidNumber {
            line,
            token: token.to_string(),
        })
    };

    Ok(Order::new(field(tokens[0])?, field(tokens[1])?, field(tokens[2])?))
}

/// Strip the `#-` (or `# -`) prefix of a display directive.
fn display_directive(text: &str) -> Option<&str> {
    text.strip_prefix('#')?.trim_start().strip_prefix('-')
}

/// `planet <id> <name> <value...>`; anything else is ignored.
fn parse_annotation(directive: &str) -> Option<Annotation> {
    let mut tokens = directive.split_whitespace();
    if tokens.next()? != "planet" {
        return None;
    }
    let planet = tokens.next()?.parse().ok()?;
    let name = tokens.next()?.to_string();
    let value = tokens.collect::<Vec<_>>().join(" ");
    Some(Annotation {
        planet,
        name,
        value,
    })
}
