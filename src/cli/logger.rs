//! Event log printed while a match is played.

use planetwars::config::StreamFilter;
use planetwars::events::{Event, Source, Stream};
use planetwars::game::Side;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;

/// Print events to stderr until every sender is gone.
pub(super) fn spawn(events: Receiver<Event>, filters: [StreamFilter; 2]) -> JoinHandle<()> {
    thread::spawn(move || {
        for event in events {
            if let Some(text) = format_event(&event, &filters) {
                eprintln!("{text}");
            }
        }
    })
}

/// Render one event, or `None` when the filters hide it.
pub(super) fn format_event(event: &Event, filters: &[StreamFilter; 2]) -> Option<String> {
    let engine = Source::Engine;
    let text = match event {
        Event::Reset => format!("[{engine}]: world loaded"),
        Event::TurnStarted { turn } => format!("[{engine}]: turn {turn}"),
        Event::TurnEnded { .. } => return None,
        Event::Message { source, text } => format!("[{source}]: {text}"),
        Event::Error { source, text } => format!("[{source}]: error: {text}"),
        Event::Trace { side, stream, text } => {
            if !shown(filters, *side, *stream) {
                return None;
            }
            text.lines()
                .map(|line| format!("[{side} {stream}]: {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Event::GameOver(outcome) => match outcome.winner {
            Some(side) => format!("[{engine}]: {side} wins after {} turns", outcome.turn),
            None => format!("[{engine}]: draw after {} turns", outcome.turn),
        },
        Event::Stopped => format!("[{engine}]: stopped"),
    };
    Some(text)
}

fn shown(filters: &[StreamFilter; 2], side: Side, stream: Stream) -> bool {
    let filter = match side {
        Side::PlayerA => filters[0],
        Side::PlayerB => filters[1],
        Side::Neutral => return false,
    };
    match stream {
        Stream::Stdin => filter.stdin,
        Stream::Stdout => filter.stdout,
        Stream::Stderr => filter.stderr,
    }
}
