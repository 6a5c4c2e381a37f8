//! Bot process supervision.
//!
//! A [`BotProcess`] owns one bot's child process. Two reader threads per
//! launch forward the child's stdout and stderr as [`ProcessIo`] messages on
//! a channel that the referee selects on; all state changes happen on the
//! referee thread in [`BotProcess::handle_io`]. A writer thread owns the
//! child's stdin, so a bot that never reads cannot stall the referee.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::events::{Event, EventBus, Source, Stream};
use crate::game::Side;
use crate::protocol;

/// How long a freshly spawned process is watched for an immediate failure.
const LAUNCH_GRACE: Duration = Duration::from_millis(100);

/// How long `stop` waits for a killed process to exit.
const STOP_TIMEOUT: Duration = Duration::from_millis(1000);

/// How long an exit is awaited once stdout has closed.
const EXIT_TIMEOUT: Duration = Duration::from_millis(200);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Raw output from a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoKind {
    /// A chunk of stdout, usually one line with its newline.
    Stdout(String),
    /// A chunk of stderr.
    Stderr(String),
    /// Stdout reached end of file.
    Closed,
}

/// Output tagged with the launch it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIo {
    /// Launch generation of the process that produced it.
    pub generation: u64,
    /// What arrived.
    pub kind: IoKind,
}

/// One bot's process and its accumulated output.
#[derive(Debug)]
pub struct BotProcess {
    side: Side,
    command: String,
    child: Option<Child>,
    stdin: Option<Sender<String>>,
    buffer: String,
    generation: u64,
    tx: Sender<ProcessIo>,
    rx: Receiver<ProcessIo>,
}

impl BotProcess {
    /// Create a supervisor for `side` that will run `command`.
    #[must_use]
    pub fn new(side: Side, command: impl Into<String>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            side,
            command: command.into(),
            child: None,
            stdin: None,
            buffer: String::new(),
            generation: 0,
            tx,
            rx,
        }
    }

    /// Side this bot plays.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Launch command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Change the launch command used by the next `start`.
    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    /// Channel carrying this bot's output. Feed every message to
    /// [`handle_io`](Self::handle_io).
    #[must_use]
    pub fn receiver(&self) -> &Receiver<ProcessIo> {
        &self.rx
    }

    /// Spawn the bot with piped standard streams.
    ///
    /// # Errors
    ///
    /// Fails if the process is already running, the command is empty, the
    /// OS cannot spawn it, or it exits unsuccessfully right away. Every
    /// failure is also published on `bus`.
    pub fn start(&mut self, bus: &mut EventBus) -> Result<(), LaunchError> {
        let result = self.launch();
        match &result {
            Ok(()) => bus.message(self.source(), format!("started `{}`", self.command)),
            Err(err) => bus.error(self.source(), err.to_string()),
        }
        result
    }

    fn launch(&mut self) -> Result<(), LaunchError> {
        if self.is_running() {
            return Err(LaunchError::AlreadyRunning);
        }

        let args = split_command(&self.command);
        let (program, rest) = args.split_first().ok_or(LaunchError::EmptyCommand)?;
        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        self.generation += 1;
        self.buffer.clear();
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(stdout, self.generation, self.tx.clone(), IoKind::Stdout, true);
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(stderr, self.generation, self.tx.clone(), IoKind::Stderr, false);
        }

        if let Some(status) = wait_for_exit(&mut child, LAUNCH_GRACE)
            && !status.success()
        {
            return Err(LaunchError::ExitedEarly {
                command: self.command.clone(),
                status: status.to_string(),
            });
        }

        info!(side = %self.side, command = %self.command, pid = child.id(), "bot started");
        self.stdin = child.stdin.take().map(|stdin| spawn_writer(stdin, self.side));
        self.child = Some(child);
        Ok(())
    }

    /// Kill the process and wait for it to exit. Does nothing if no process
    /// was launched.
    pub fn stop(&mut self, bus: &mut EventBus) {
        self.stdin = None;
        let Some(mut child) = self.child.take() else {
            return;
        };
        // Output still queued from this launch is stale from here on.
        self.generation += 1;

        if let Err(err) = child.kill() {
            debug!(side = %self.side, error = %err, "kill failed; process already gone");
        }
        if wait_for_exit(&mut child, STOP_TIMEOUT).is_none() {
            warn!(side = %self.side, "bot did not exit after kill; waiting");
            if let Err(err) = child.wait() {
                warn!(side = %self.side, error = %err, "unable to reap bot process");
            }
        }
        info!(side = %self.side, "bot stopped");
        bus.message(self.source(), "process stopped");
    }

    /// Queue the turn message for the bot's stdin. Dropped when the bot is
    /// not running. Never blocks on the pipe.
    pub fn send_state(&mut self, text: &str, bus: &mut EventBus) {
        if !self.is_running() {
            debug!(side = %self.side, "bot not running; state dropped");
            return;
        }
        let Some(stdin) = self.stdin.as_ref() else {
            return;
        };

        bus.publish(&Event::Trace {
            side: self.side,
            stream: Stream::Stdin,
            text: text.to_string(),
        });
        if stdin.send(text.to_string()).is_err() {
            debug!(side = %self.side, "bot stdin closed; state dropped");
        }
    }

    /// Take everything the bot has written since the last call.
    pub fn read_commands(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Whether the buffered output contains the turn terminator.
    #[must_use]
    pub fn is_done(&self) -> bool {
        protocol::contains_terminator(&self.buffer)
    }

    /// Whether a process exists and the OS reports it alive.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Absorb one message from [`receiver`](Self::receiver).
    ///
    /// Returns `false` for output of an earlier launch, which is discarded.
    pub fn handle_io(&mut self, io: ProcessIo, bus: &mut EventBus) -> bool {
        if io.generation != self.generation {
            return false;
        }
        match io.kind {
            IoKind::Stdout(text) => {
                self.buffer.push_str(&text);
                bus.publish(&Event::Trace {
                    side: self.side,
                    stream: Stream::Stdout,
                    text,
                });
            }
            IoKind::Stderr(text) => bus.publish(&Event::Trace {
                side: self.side,
                stream: Stream::Stderr,
                text,
            }),
            IoKind::Closed => self.report_exit(bus),
        }
        true
    }

    fn report_exit(&mut self, bus: &mut EventBus) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match wait_for_exit(child, EXIT_TIMEOUT) {
            Some(status) if status.success() => {
                info!(side = %self.side, "bot exited");
                bus.message(self.source(), "process exited normally");
            }
            Some(status) => {
                warn!(side = %self.side, %status, "bot crashed");
                bus.error(self.source(), format!("process crashed ({status})"));
            }
            None => {
                debug!(side = %self.side, "bot closed stdout but is still running");
                bus.message(self.source(), "process closed its output stream");
            }
        }
    }

    fn source(&self) -> Source {
        Source::Player(self.side)
    }
}

impl Drop for BotProcess {
    fn drop(&mut self) {
        self.stdin = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Split a launch command on whitespace; double quotes group words.
#[must_use]
pub fn split_command(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in command.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

fn spawn_reader<R, F>(stream: R, generation: u64, tx: Sender<ProcessIo>, wrap: F, report_close: bool)
where
    R: Read + Send + 'static,
    F: Fn(String) -> IoKind + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut chunk = Vec::new();
        loop {
            chunk.clear();
            match reader.read_until(b'\n', &mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let kind = wrap(String::from_utf8_lossy(&chunk).into_owned());
                    if tx.send(ProcessIo { generation, kind }).is_err() {
                        return;
                    }
                }
            }
        }
        if report_close {
            let _ = tx.send(ProcessIo {
                generation,
                kind: IoKind::Closed,
            });
        }
    });
}

/// Feed queued messages into the child's stdin until the sender is dropped
/// or the pipe breaks.
fn spawn_writer<W>(mut stdin: W, side: Side) -> Sender<String>
where
    W: Write + Send + 'static,
{
    let (tx, rx) = unbounded::<String>();
    thread::spawn(move || {
        for text in rx {
            if let Err(err) = stdin.write_all(text.as_bytes()).and_then(|()| stdin.flush()) {
                debug!(side = %side, error = %err, "write to bot failed");
                return;
            }
        }
    });
    tx
}

/// Poll until the child exits or `timeout` passes.
fn wait_for_exit(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            Ok(None) | Err(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed channel output into the bot until `until` holds or time runs out.
    fn pump(bot: &mut BotProcess, bus: &mut EventBus, until: impl Fn(&BotProcess) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !until(bot) && Instant::now() < deadline {
            if let Ok(io) = bot.receiver().recv_timeout(Duration::from_millis(50)) {
                bot.handle_io(io, bus);
            }
        }
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("./bot --fast"), vec!["./bot", "--fast"]);
        assert_eq!(
            split_command("sh -c \"echo hi; echo go\""),
            vec!["sh", "-c", "echo hi; echo go"]
        );
        assert_eq!(split_command("  java   -jar \"My Bot.jar\" "), vec!["java", "-jar", "My Bot.jar"]);
        assert_eq!(split_command("a \"\" b"), vec!["a", "", "b"]);
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn test_empty_command() {
        let mut bus = EventBus::new();
        let events = bus.subscribe();
        let mut bot = BotProcess::new(Side::PlayerA, "");
        assert!(matches!(bot.start(&mut bus), Err(LaunchError::EmptyCommand)));
        assert!(!bot.is_running());
        assert!(matches!(events.try_recv().unwrap(), Event::Error { .. }));
    }

    #[test]
    fn test_missing_program() {
        let mut bus = EventBus::new();
        let mut bot = BotProcess::new(Side::PlayerB, "/no/such/bot/binary");
        assert!(matches!(bot.start(&mut bus), Err(LaunchError::Spawn { .. })));
        assert!(!bot.is_running());
    }

    #[test]
    fn test_echo_round_trip() {
        let mut bus = EventBus::new();
        let mut bot = BotProcess::new(Side::PlayerA, "cat");
        bot.start(&mut bus).unwrap();
        assert!(bot.is_running());

        bot.send_state("0 1 5\ngo\n", &mut bus);
        pump(&mut bot, &mut bus, BotProcess::is_done);
        assert!(bot.is_done());
        assert_eq!(bot.read_commands(), "0 1 5\ngo\n");
        assert!(!bot.is_done());
        assert_eq!(bot.read_commands(), "");

        bot.stop(&mut bus);
        assert!(!bot.is_running());
    }

    #[test]
    fn test_start_twice_is_error() {
        let mut bus = EventBus::new();
        let mut bot = BotProcess::new(Side::PlayerA, "cat");
        bot.start(&mut bus).unwrap();
        assert!(matches!(bot.start(&mut bus), Err(LaunchError::AlreadyRunning)));
        assert!(bot.is_running());
        bot.stop(&mut bus);
    }

    #[test]
    fn test_send_does_not_block_on_full_pipe() {
        let mut bus = EventBus::new();
        let mut bot = BotProcess::new(Side::PlayerA, "sleep 30");
        bot.start(&mut bus).unwrap();

        let big = "P 1.0 2.0 1 100 5\n".repeat(20_000);
        let started = Instant::now();
        bot.send_state(&big, &mut bus);
        bot.send_state(&big, &mut bus);
        assert!(started.elapsed() < Duration::from_secs(1));

        bot.stop(&mut bus);
        assert!(!bot.is_running());
    }

    #[test]
    fn test_send_while_stopped_is_dropped() {
        let mut bus = EventBus::new();
        let events = bus.subscribe();
        let mut bot = BotProcess::new(Side::PlayerA, "cat");
        bot.send_state("go\n", &mut bus);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_stderr_is_traced_not_buffered() {
        let mut bus = EventBus::new();
        let events = bus.subscribe();
        let mut bot = BotProcess::new(Side::PlayerB, "sh -c \"echo thinking >&2; cat\"");
        bot.start(&mut bus).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = false;
        while !seen && Instant::now() < deadline {
            if let Ok(io) = bot.receiver().recv_timeout(Duration::from_millis(50)) {
                bot.handle_io(io, &mut bus);
            }
            seen = events.try_iter().any(|e| {
                matches!(e, Event::Trace { stream: Stream::Stderr, ref text, .. } if text == "thinking\n")
            });
        }
        assert!(seen);
        assert_eq!(bot.read_commands(), "");
        bot.stop(&mut bus);
    }

    #[test]
    fn test_stale_output_is_ignored() {
        let mut bus = EventBus::new();
        let mut bot = BotProcess::new(Side::PlayerA, "cat");
        bot.start(&mut bus).unwrap();
        bot.stop(&mut bus);
        let stale = ProcessIo {
            generation: 1,
            kind: IoKind::Stdout("go\n".into()),
        };
        assert!(!bot.handle_io(stale, &mut bus));
        assert!(!bot.is_done());
    }

    #[test]
    fn test_crash_is_reported() {
        let mut bus = EventBus::new();
        let events = bus.subscribe();
        let mut bot = BotProcess::new(Side::PlayerA, "sh -c \"sleep 0.2; exit 3\"");
        match bot.start(&mut bus) {
            Err(LaunchError::ExitedEarly { .. }) => {}
            Err(err) => panic!("unexpected launch error: {err}"),
            Ok(()) => {
                let deadline = Instant::now() + Duration::from_secs(5);
                while Instant::now() < deadline {
                    match bot.receiver().recv_timeout(Duration::from_millis(50)) {
                        Ok(io) if io.kind == IoKind::Closed => {
                            bot.handle_io(io, &mut bus);
                            break;
                        }
                        Ok(io) => {
                            bot.handle_io(io, &mut bus);
                        }
                        Err(_) => {}
                    }
                }
                assert!(!bot.is_running());
            }
        }
        let crashed = events
            .try_iter()
            .any(|e| matches!(e, Event::Error { ref text, .. } if text.contains("exit")));
        assert!(crashed);
    }

    #[test]
    fn test_normal_exit_is_not_running() {
        let mut bus = EventBus::new();
        let mut bot = BotProcess::new(Side::PlayerB, "sh -c \"echo go\"");
        bot.start(&mut bus).unwrap();
        pump(&mut bot, &mut bus, BotProcess::is_done);
        assert!(bot.is_done());
        let deadline = Instant::now() + Duration::from_secs(5);
        while bot.is_running() && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }
        assert!(!bot.is_running());
    }
}
