//! Cancellable deadlines for the referee loop.

use std::time::{Duration, Instant};

/// Interval between completion checks when the turn timer is ignored.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Armed deadlines. A cleared slot never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Timers {
    /// Hard end of the current turn.
    pub(crate) deadline: Option<Instant>,
    /// Next completion check while the timer is ignored.
    pub(crate) poll: Option<Instant>,
    /// Next automatic step while running continuously.
    pub(crate) continuation: Option<Instant>,
}

impl Timers {
    /// The earliest armed deadline.
    pub(crate) fn next(&self) -> Option<Instant> {
        [self.deadline, self.poll, self.continuation]
            .into_iter()
            .flatten()
            .min()
    }

    /// Disarm everything belonging to the turn in flight.
    pub(crate) fn clear_turn(&mut self) {
        self.deadline = None;
        self.poll = None;
    }

    /// Disarm every timer.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the turn deadline has passed.
    pub(crate) fn deadline_passed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|at| now >= at)
    }

    /// Take the poll timer if it is due.
    pub(crate) fn take_poll(&mut self, now: Instant) -> bool {
        take_due(&mut self.poll, now)
    }

    /// Take the continuation if it is due.
    pub(crate) fn take_continuation(&mut self, now: Instant) -> bool {
        take_due(&mut self.continuation, now)
    }
}

fn take_due(slot: &mut Option<Instant>, now: Instant) -> bool {
    if slot.is_some_and(|at| now >= at) {
        *slot = None;
        true
    } else {
        false
    }
}
