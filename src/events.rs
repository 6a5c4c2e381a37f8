//! Typed notifications for observers (renderers, loggers, controllers).
//!
//! The referee never calls into an observer. It publishes [`Event`]s on an
//! [`EventBus`]; every subscriber gets its own channel and reads at its own
//! pace.

use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::game::{Outcome, Side};

/// Who an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// The referee itself.
    Engine,
    /// One of the bots.
    Player(Side),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Engine => write!(f, "Game Engine"),
            Source::Player(side) => write!(f, "{side}"),
        }
    }
}

/// Which standard stream a trace event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Text written to the bot.
    Stdin,
    /// Text the bot wrote to stdout.
    Stdout,
    /// Text the bot wrote to stderr.
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdin => write!(f, "stdin"),
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
        }
    }
}

/// A notification published by the referee.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new world was loaded.
    Reset,
    /// A turn has started and game state is being sent.
    TurnStarted {
        /// Turn number.
        turn: u32,
    },
    /// A turn has closed. On a faulted turn the world is left unchanged and
    /// `GameOver` follows.
    TurnEnded {
        /// Turn number.
        turn: u32,
    },
    /// Informational diagnostic.
    Message {
        /// Component the message is about.
        source: Source,
        /// Human-readable text.
        text: String,
    },
    /// Error diagnostic.
    Error {
        /// Component at fault.
        source: Source,
        /// Human-readable text.
        text: String,
    },
    /// Raw bot I/O.
    Trace {
        /// Bot the text belongs to.
        side: Side,
        /// Which stream.
        stream: Stream,
        /// The text, verbatim.
        text: String,
    },
    /// The match is over.
    GameOver(Outcome),
    /// The referee stopped; bots are no longer running.
    Stopped,
}

/// Fan-out of events to any number of subscribers.
#[derive(Debug, Default, Clone)]
pub struct EventBus {
    subscribers: Vec<Sender<Event>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Send an event to every subscriber, forgetting those that hung up.
    pub fn publish(&mut self, event: &Event) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Publish an informational message.
    pub fn message(&mut self, source: Source, text: impl Into<String>) {
        self.publish(&Event::Message {
            source,
            text: text.into(),
        });
    }

    /// Publish an error message.
    pub fn error(&mut self, source: Source, text: impl Into<String>) {
        self.publish(&Event::Error {
            source,
            text: text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(&Event::Reset);
        assert_eq!(a.try_recv().unwrap(), Event::Reset);
        assert_eq!(b.try_recv().unwrap(), Event::Reset);
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        bus.message(Source::Engine, "hello");
        assert_eq!(bus.subscriber_count(), 1);
        assert!(matches!(keep.try_recv().unwrap(), Event::Message { .. }));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Engine.to_string(), "Game Engine");
        assert_eq!(Source::Player(Side::PlayerB).to_string(), "Player 2");
        assert_eq!(Stream::Stderr.to_string(), "stderr");
    }
}
