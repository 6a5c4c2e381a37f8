//! Interactive command implementation.
//!
//! Reads one command per line from stdin and forwards it to the referee:
//! `reset`, `step`, `run`, `pause`, `stop`, `quit`.

use super::{logger, CliError, MatchArgs};
use planetwars::referee::{Control, Referee, RefereeHandle};
use std::io::{self, BufRead};
use std::thread;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub(crate) fn execute(args: MatchArgs) -> Result<(), CliError> {
    let config = args.resolve()?;
    let filters = config.log;
    let mut referee = Referee::new(config);
    let log = logger::spawn(referee.subscribe(), filters);

    eprintln!("Commands: reset, step, run, pause, stop, quit");
    let handle = referee.handle();
    thread::spawn(move || read_commands(&handle));

    referee.run_loop();
    drop(referee);
    let _ = log.join();
    Ok(())
}

fn read_commands(handle: &RefereeHandle) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        match parse_control(word) {
            Some(control) => {
                if handle.send(control).is_err() || control == Control::Shutdown {
                    return;
                }
            }
            None => eprintln!("Unknown command: {word}"),
        }
    }
    let _ = handle.shutdown();
}

/// Map a typed command to a control message.
pub(super) fn parse_control(word: &str) -> Option<Control> {
    match word.to_ascii_lowercase().as_str() {
        "reset" | "r" => Some(Control::Reset),
        "step" | "s" => Some(Control::Step),
        "run" => Some(Control::Run),
        "pause" | "p" => Some(Control::Pause),
        "stop" => Some(Control::Stop),
        "quit" | "exit" | "q" => Some(Control::Shutdown),
        _ => None,
    }
}
