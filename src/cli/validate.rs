//! Map validation command implementation.

use super::CliError;
use planetwars::game::{check_invariants, load_map, Side};
use std::path::PathBuf;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded.
pub(crate) fn execute(map: PathBuf) -> Result<(), CliError> {
    println!("Validating: {}", map.display());
    println!();

    let world = match load_map(&map) {
        Ok(world) => {
            print_check("Map file parses", true);
            world
        }
        Err(e) => {
            print_check("Map file parses", false);
            return Err(e.into());
        }
    };

    let violations = check_invariants(&world);
    print_check("World invariants", violations.is_empty());
    if let Some(first) = violations.first() {
        return Err(CliError::new(first.to_string()));
    }

    let players_present = Side::PLAYERS.iter().all(|&side| world.total_ships(side) > 0);
    print_check("Both players have ships", players_present);

    println!();
    println!("Summary:");
    println!("  Planets:      {}", world.planets.len());
    println!("  Fleets:       {}", world.fleets.len());
    for side in Side::ALL {
        println!(
            "  {:<13} {} planets, {} ships",
            format!("{side}:"),
            world.planet_count(side),
            world.total_ships(side)
        );
    }

    println!();
    if players_present {
        println!("Validation successful!");
    } else {
        println!("Map loads, but the match would end on turn 1.");
    }

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
