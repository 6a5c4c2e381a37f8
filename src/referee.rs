//! Turn scheduler for a two-bot match.
//!
//! The [`Referee`] is a single-threaded state machine:
//!
//! ```text
//!            reset              step               both done / deadline
//! Stopped ─────────▶ Reset ───────────▶ Stepping ─────────────────────▶ Processing
//!    ▲                 ▲                   ▲                              │
//!    │                 │                   └────────── step ── Ready ◀────┤
//!    └──── stop / game over / fault ──────────────────────────────────────┘
//! ```
//!
//! Triggers (bot output, the turn deadline, the poll tick, the continuation
//! while running, and controller commands) are all served by [`Referee::tick`],
//! which waits on one `select!`. Every trigger re-checks the current state, so
//! a trigger left over from a cancelled turn does nothing.

mod control;
mod timers;

pub use control::{Control, RefereeHandle};

use std::fmt;
use std::time::{Duration, Instant};

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bot::{BotProcess, ProcessIo};
use crate::config::RefereeConfig;
use crate::error::{MapLoadError, RefereeError, TurnFault};
use crate::events::{Event, EventBus, Source};
use crate::game::{
    apply_orders, assert_invariants, evaluate, load_map, EndReason, Fleet, Outcome, Planet, Side,
    World,
};
use crate::protocol;

use timers::{Timers, POLL_INTERVAL};

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// No bots running and no turn in progress.
    Stopped,
    /// A world is loaded; bots start on the next step.
    Reset,
    /// Idle between turns.
    Ready,
    /// State sent; waiting for both bots.
    Stepping,
    /// Orders being applied and the world advanced.
    Processing,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Stopped => "stopped",
            State::Reset => "reset",
            State::Ready => "ready",
            State::Stepping => "stepping",
            State::Processing => "processing",
        };
        f.write_str(name)
    }
}

/// Drives a match between two bot processes.
#[derive(Debug)]
pub struct Referee {
    config: RefereeConfig,
    world: World,
    state: State,
    continuous: bool,
    bots: [BotProcess; 2],
    bus: EventBus,
    timers: Timers,
    outcome: Option<Outcome>,
    control_tx: Sender<Control>,
    control_rx: Receiver<Control>,
}

/// Position of a player's bot in `Referee::bots`.
fn seat(side: Side) -> usize {
    usize::from(side == Side::PlayerB)
}

impl Referee {
    /// Create a stopped referee with an empty world.
    #[must_use]
    pub fn new(config: RefereeConfig) -> Self {
        let bots = Side::PLAYERS.map(|side| BotProcess::new(side, config.launch_command(side)));
        let (control_tx, control_rx) = unbounded();
        Self {
            config,
            world: World::default(),
            state: State::Stopped,
            continuous: false,
            bots,
            bus: EventBus::new(),
            timers: Timers::default(),
            outcome: None,
            control_tx,
            control_rx,
        }
    }

    /// Register an observer.
    pub fn subscribe(&mut self) -> Receiver<Event> {
        self.bus.subscribe()
    }

    /// Handle for controlling the referee from another thread.
    #[must_use]
    pub fn handle(&self) -> RefereeHandle {
        RefereeHandle {
            tx: self.control_tx.clone(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &RefereeConfig {
        &self.config
    }

    /// Replace the configuration. Launch commands apply from the next reset.
    pub fn set_config(&mut self, config: RefereeConfig) {
        self.config = config;
    }

    /// Current scheduler state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Current turn number (0 before the first step).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.world.turn
    }

    /// The world being played.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Planets, in id order.
    #[must_use]
    pub fn planets(&self) -> &[Planet] {
        &self.world.planets
    }

    /// Fleets in flight.
    #[must_use]
    pub fn fleets(&self) -> &[Fleet] {
        &self.world.fleets
    }

    /// Fleets launched this turn.
    #[must_use]
    pub fn new_fleets(&self) -> &[Fleet] {
        &self.world.new_fleets
    }

    /// Result of the last finished match.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Whether turns advance automatically.
    #[must_use]
    pub fn is_running_continuously(&self) -> bool {
        self.continuous
    }

    /// Stop both bots and load a fresh world from the configured map.
    ///
    /// On failure nothing changes: the previous world, state and bots are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns an error if no map is configured or the map cannot be loaded.
    pub fn reset(&mut self) -> Result<(), RefereeError> {
        let loaded = match &self.config.map_path {
            Some(path) => load_map(path),
            None => Err(MapLoadError::NoMapConfigured),
        };
        let world = match loaded {
            Ok(world) => world,
            Err(err) => {
                warn!(error = %err, "reset failed");
                self.bus.error(Source::Engine, err.to_string());
                return Err(err.into());
            }
        };

        for bot in &mut self.bots {
            bot.stop(&mut self.bus);
        }
        for side in Side::PLAYERS {
            self.bots[seat(side)].set_command(self.config.launch_command(side));
        }

        info!(planets = world.planets.len(), fleets = world.fleets.len(), "world loaded");
        self.world = world;
        self.outcome = None;
        self.timers.clear();
        self.state = State::Reset;
        self.bus.publish(&Event::Reset);
        self.schedule_continuation(self.config.step_delay());
        Ok(())
    }

    /// Start the next turn.
    ///
    /// Does nothing while stopped or mid-turn. From `Reset` both bots are
    /// launched first.
    pub fn step(&mut self) {
        match self.state {
            State::Stopped | State::Stepping | State::Processing => return,
            State::Reset => {
                if let Err(err) = self.launch_bots() {
                    warn!(error = %err, "unable to start bots");
                    self.halt();
                    return;
                }
            }
            State::Ready => {}
        }

        self.timers.continuation = None;
        let turn = self.world.begin_turn();
        info!(turn, "turn started");
        self.bus.publish(&Event::TurnStarted { turn });

        let dead: Vec<Side> = Side::PLAYERS
            .into_iter()
            .filter(|&side| !self.bots[seat(side)].is_running())
            .collect();
        if !dead.is_empty() {
            for &side in &dead {
                warn!(turn, %side, "bot is not running");
                self.bus
                    .error(Source::Player(side), TurnFault::ProcessDied.to_string());
            }
            self.bus.publish(&Event::TurnEnded { turn });
            self.finish(Outcome::forfeit(dead, turn));
            return;
        }

        for side in Side::PLAYERS {
            let message = protocol::serialize_state(&self.world, side);
            self.bots[seat(side)].send_state(&message, &mut self.bus);
        }

        self.state = State::Stepping;
        let now = Instant::now();
        if self.config.ignore_timer {
            self.timers.poll = Some(now + POLL_INTERVAL);
        } else {
            self.timers.deadline = Some(now + self.config.turn_deadline(turn));
        }
    }

    /// Step automatically until paused or the game ends.
    pub fn run(&mut self) {
        if !self.continuous {
            debug!("continuous play on");
        }
        self.continuous = true;
        self.schedule_continuation(Duration::ZERO);
    }

    /// Stop stepping automatically. A turn in flight still completes.
    pub fn pause(&mut self) {
        if self.continuous {
            debug!("continuous play off");
        }
        self.continuous = false;
        self.timers.continuation = None;
    }

    /// Kill both bots and end the game, whatever the state.
    pub fn stop(&mut self) {
        self.timers.clear();
        if self.state == State::Stopped {
            return;
        }
        if self.outcome.is_none() && self.world.turn > 0 {
            let outcome = Outcome {
                winner: None,
                reason: EndReason::Aborted,
                turn: self.world.turn,
            };
            self.bus.publish(&Event::GameOver(outcome.clone()));
            self.outcome = Some(outcome);
        }
        self.halt();
    }

    /// Apply one controller command.
    ///
    /// Returns `false` for [`Control::Shutdown`].
    pub fn apply(&mut self, control: Control) -> bool {
        debug!(?control, state = %self.state, "control");
        match control {
            Control::Reset => {
                // Failure is already reported on the bus.
                let _ = self.reset();
            }
            Control::Step => self.step(),
            Control::Run => self.run(),
            Control::Pause => self.pause(),
            Control::Stop => self.stop(),
            Control::Shutdown => {
                self.stop();
                return false;
            }
        }
        true
    }

    /// Wait for the next trigger and act on it.
    ///
    /// Waits at most `idle` when no timer is armed. Returns `false` once a
    /// shutdown has been received.
    pub fn tick(&mut self, idle: Duration) -> bool {
        let now = Instant::now();
        let wait = self
            .timers
            .next()
            .map_or(idle, |at| at.saturating_duration_since(now).min(idle));

        let first = self.bots[0].receiver().clone();
        let second = self.bots[1].receiver().clone();
        let control = self.control_rx.clone();

        let keep_going = select! {
            recv(first) -> io => {
                if let Ok(io) = io {
                    self.on_output(Side::PlayerA, io);
                }
                true
            }
            recv(second) -> io => {
                if let Ok(io) = io {
                    self.on_output(Side::PlayerB, io);
                }
                true
            }
            recv(control) -> msg => match msg {
                Ok(control) => self.apply(control),
                Err(_) => false,
            },
            default(wait) => true,
        };

        self.fire_timers(Instant::now());
        keep_going
    }

    /// Serve triggers until shut down.
    pub fn run_loop(&mut self) {
        while self.tick(Duration::from_secs(1)) {}
    }

    fn on_output(&mut self, side: Side, io: ProcessIo) {
        if self.bots[seat(side)].handle_io(io, &mut self.bus) {
            self.check_completion();
        }
    }

    fn fire_timers(&mut self, now: Instant) {
        if self.timers.deadline_passed(now) {
            self.check_completion();
        }
        if self.timers.take_poll(now) {
            self.check_completion();
            if self.state == State::Stepping {
                self.timers.poll = Some(now + POLL_INTERVAL);
            }
        }
        if self.timers.take_continuation(now)
            && self.continuous
            && matches!(self.state, State::Ready | State::Reset)
        {
            self.step();
        }
    }

    /// Move to processing once both bots are done or the deadline passed.
    fn check_completion(&mut self) {
        if self.state != State::Stepping {
            return;
        }
        let all_done = self
            .bots
            .iter_mut()
            .all(|bot| bot.is_done() || !bot.is_running());
        if all_done || self.timers.deadline_passed(Instant::now()) {
            self.process_turn();
        }
    }

    fn process_turn(&mut self) {
        self.state = State::Processing;
        self.timers.clear_turn();
        let turn = self.world.turn;

        let faults: Vec<(Side, TurnFault)> = Side::PLAYERS
            .into_iter()
            .filter_map(|side| self.take_orders(side).map(|fault| (side, fault)))
            .collect();

        if !faults.is_empty() {
            for (side, fault) in &faults {
                warn!(turn, %side, %fault, "turn fault");
                self.bus.error(Source::Player(*side), fault.to_string());
            }
            self.bus.publish(&Event::TurnEnded { turn });
            let sides = faults.into_iter().map(|(side, _)| side).collect();
            self.finish(Outcome::forfeit(sides, turn));
            return;
        }

        self.world.advance();
        assert_invariants(&self.world);
        debug!(
            turn,
            a = self.world.total_ships(Side::PlayerA),
            b = self.world.total_ships(Side::PlayerB),
            "turn ended"
        );
        self.bus.publish(&Event::TurnEnded { turn });

        match evaluate(&self.world, self.config.max_turns) {
            Some(outcome) => self.finish(outcome),
            None => {
                self.state = State::Ready;
                self.schedule_continuation(self.config.step_delay());
            }
        }
    }

    /// Parse and apply one side's buffered output.
    fn take_orders(&mut self, side: Side) -> Option<TurnFault> {
        let bot = &mut self.bots[seat(side)];
        let alive = bot.is_running();
        let output = protocol::parse_orders(&bot.read_commands());

        for note in &output.annotations {
            if let Some(planet) = self.world.planet_mut(note.planet) {
                planet.annotate(note.name.clone(), note.value.clone());
            }
        }

        match apply_orders(&mut self.world, side, &output.orders) {
            Err(fault) => Some(fault),
            Ok(_) if !alive => Some(TurnFault::ProcessDied),
            Ok(_) => output.fault().map(TurnFault::from),
        }
    }

    fn launch_bots(&mut self) -> Result<(), RefereeError> {
        for side in Side::PLAYERS {
            self.bots[seat(side)]
                .start(&mut self.bus)
                .map_err(|source| RefereeError::Launch { side, source })?;
        }
        Ok(())
    }

    fn schedule_continuation(&mut self, delay: Duration) {
        if self.continuous && matches!(self.state, State::Ready | State::Reset) {
            self.timers.continuation = Some(Instant::now() + delay);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        match outcome.winner {
            Some(side) => info!(turn = outcome.turn, winner = %side, reason = ?outcome.reason, "game over"),
            None => info!(turn = outcome.turn, reason = ?outcome.reason, "game over: draw"),
        }
        let text = match outcome.winner {
            Some(side) => format!("{side} wins on turn {}", outcome.turn),
            None => format!("draw on turn {}", outcome.turn),
        };
        self.bus.message(Source::Engine, text);
        self.bus.publish(&Event::GameOver(outcome.clone()));
        self.outcome = Some(outcome);
        self.halt();
    }

    fn halt(&mut self) {
        for bot in &mut self.bots {
            bot.stop(&mut self.bus);
        }
        self.timers.clear();
        self.continuous = false;
        self.state = State::Stopped;
        info!("referee stopped");
        self.bus.publish(&Event::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const MAP: &str = "P 0 0 1 10 1\nP 5 0 0 3 0\nP 10 0 2 10 1\n";

    fn create_test_config(dir: &Path) -> RefereeConfig {
        let map = dir.join("map.txt");
        fs::write(&map, MAP).unwrap();
        RefereeConfig {
            map_path: Some(map),
            ..RefereeConfig::default()
        }
    }

    fn drain(events: &Receiver<Event>) -> Vec<Event> {
        events.try_iter().collect()
    }

    #[test]
    fn test_starts_stopped() {
        let referee = Referee::new(RefereeConfig::default());
        assert_eq!(referee.state(), State::Stopped);
        assert_eq!(referee.turn(), 0);
        assert!(referee.planets().is_empty());
    }

    #[test]
    fn test_reset_without_map_fails_closed() {
        let mut referee = Referee::new(RefereeConfig::default());
        let events = referee.subscribe();
        assert!(matches!(
            referee.reset(),
            Err(RefereeError::MapLoad(MapLoadError::NoMapConfigured))
        ));
        assert_eq!(referee.state(), State::Stopped);
        assert!(matches!(drain(&events).as_slice(), [Event::Error { source: Source::Engine, .. }]));
    }

    #[test]
    fn test_reset_loads_world() {
        let dir = tempfile::tempdir().unwrap();
        let mut referee = Referee::new(create_test_config(dir.path()));
        let events = referee.subscribe();
        referee.reset().unwrap();
        assert_eq!(referee.state(), State::Reset);
        assert_eq!(referee.turn(), 0);
        let ids: Vec<_> = referee.planets().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(drain(&events), vec![Event::Reset]);
    }

    #[test]
    fn test_bad_map_keeps_previous_world() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = create_test_config(dir.path());
        let mut referee = Referee::new(config.clone());
        referee.reset().unwrap();

        let broken = dir.path().join("broken.txt");
        fs::write(&broken, "P 0 0 1 10\n").unwrap();
        config.map_path = Some(broken);
        referee.set_config(config);
        assert!(referee.reset().is_err());
        assert_eq!(referee.state(), State::Reset);
        assert_eq!(referee.planets().len(), 3);
    }

    #[test]
    fn test_step_is_noop_when_stopped() {
        let mut referee = Referee::new(RefereeConfig::default());
        let events = referee.subscribe();
        referee.step();
        assert_eq!(referee.state(), State::Stopped);
        assert_eq!(referee.turn(), 0);
        assert!(drain(&events).is_empty());
    }

    #[test]
    fn test_launch_failure_stops() {
        let dir = tempfile::tempdir().unwrap();
        let mut referee = Referee::new(create_test_config(dir.path()));
        referee.reset().unwrap();
        let events = referee.subscribe();
        referee.step();
        assert_eq!(referee.state(), State::Stopped);
        assert_eq!(referee.turn(), 0);
        let events = drain(&events);
        assert!(events.iter().any(|e| matches!(e, Event::Error { .. })));
        assert_eq!(events.last(), Some(&Event::Stopped));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut referee = Referee::new(create_test_config(dir.path()));
        referee.reset().unwrap();
        let events = referee.subscribe();
        referee.stop();
        referee.stop();
        assert_eq!(referee.state(), State::Stopped);
        assert_eq!(drain(&events), vec![Event::Stopped]);
        assert!(referee.outcome().is_none());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut referee = Referee::new(create_test_config(dir.path()));
        referee.reset().unwrap();
        let events = referee.subscribe();
        referee.pause();
        referee.pause();
        assert_eq!(referee.state(), State::Reset);
        assert!(!referee.is_running_continuously());
        assert!(drain(&events).is_empty());
    }

    #[test]
    fn test_run_arms_continuation() {
        let dir = tempfile::tempdir().unwrap();
        let mut referee = Referee::new(create_test_config(dir.path()));
        referee.reset().unwrap();
        referee.run();
        assert!(referee.is_running_continuously());
        assert!(referee.timers.continuation.is_some());
        referee.pause();
        assert!(referee.timers.continuation.is_none());
    }

    #[test]
    fn test_shutdown_through_handle() {
        let mut referee = Referee::new(RefereeConfig::default());
        let handle = referee.handle();
        handle.shutdown().unwrap();
        assert!(!referee.tick(Duration::from_millis(100)));
    }

    #[test]
    fn test_seats() {
        assert_eq!(seat(Side::PlayerA), 0);
        assert_eq!(seat(Side::PlayerB), 1);
    }
}
