//! Run command implementation.

use super::output::{format_text, JsonMatchResult};
use super::{logger, CliError, MatchArgs, OutputFormat};
use planetwars::referee::{Referee, State};
use std::path::PathBuf;
use std::time::Duration;

/// Longest a single wait inside the referee loop may take.
const TICK: Duration = Duration::from_millis(50);

/// Execute the run command: play a whole match without pausing.
///
/// # Errors
///
/// Returns an error if the configuration or map cannot be loaded, or the
/// match ends before it was decided.
pub(crate) fn execute(
    args: MatchArgs,
    format: OutputFormat,
    save_config: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = args.resolve()?;
    if let Some(path) = &save_config {
        config.save(path)?;
    }

    let filters = config.log;
    let commands = config.players.clone();
    let mut referee = Referee::new(config);
    let log = (!quiet).then(|| logger::spawn(referee.subscribe(), filters));

    referee.reset()?;
    referee.run();
    while referee.state() != State::Stopped {
        referee.tick(TICK);
    }

    let outcome = referee.outcome().cloned();
    let world = referee.world().clone();
    drop(referee);
    if let Some(log) = log {
        let _ = log.join();
    }

    let outcome = outcome.ok_or_else(|| CliError::new("Match ended without a result"))?;
    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&outcome, &world, &commands));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonMatchResult::new(&outcome, &world, &commands))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
