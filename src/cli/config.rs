//! Config command implementation.

use super::{CliError, MatchArgs};
use std::path::PathBuf;

/// Execute the config command: write the effective settings as JSON.
///
/// # Errors
///
/// Returns an error if a source config cannot be read or the output cannot
/// be written.
pub(crate) fn execute(args: MatchArgs, output: PathBuf) -> Result<(), CliError> {
    let config = args.resolve()?;
    config.save(&output)?;
    println!("Config written to: {}", output.display());
    Ok(())
}
