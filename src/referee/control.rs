//! Commands from an external controller.

use crossbeam_channel::Sender;

use crate::error::RefereeError;

/// A request for the referee loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Reload the map and get ready for turn 1.
    Reset,
    /// Play one turn.
    Step,
    /// Keep stepping until paused or the game ends.
    Run,
    /// Stop stepping automatically.
    Pause,
    /// Kill both bots and end the game.
    Stop,
    /// Stop and leave the loop.
    Shutdown,
}

/// Cloneable handle for driving a [`Referee`](super::Referee) from another
/// thread.
#[derive(Debug, Clone)]
pub struct RefereeHandle {
    pub(super) tx: Sender<Control>,
}

impl RefereeHandle {
    /// Queue a command.
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn send(&self, control: Control) -> Result<(), RefereeError> {
        self.tx.send(control).map_err(|_| RefereeError::Disconnected)
    }

    /// Queue [`Control::Reset`].
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn reset(&self) -> Result<(), RefereeError> {
        self.send(Control::Reset)
    }

    /// Queue [`Control::Step`].
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn step(&self) -> Result<(), RefereeError> {
        self.send(Control::Step)
    }

    /// Queue [`Control::Run`].
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn run(&self) -> Result<(), RefereeError> {
        self.send(Control::Run)
    }

    /// Queue [`Control::Pause`].
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn pause(&self) -> Result<(), RefereeError> {
        self.send(Control::Pause)
    }

    /// Queue [`Control::Stop`].
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn stop(&self) -> Result<(), RefereeError> {
        self.send(Control::Stop)
    }

    /// Queue [`Control::Shutdown`].
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError::Disconnected`] if the referee has been dropped.
    pub fn shutdown(&self) -> Result<(), RefereeError> {
        self.send(Control::Shutdown)
    }
}
