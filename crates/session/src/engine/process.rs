//! UCI engine running as a child process.
//!
//! Lines from the engine's stdout are pumped into a channel by a reader
//! thread so every wait can carry a deadline. Once the process exits, a pipe
//! breaks or a search overruns its ceiling, the engine is unhealthy for good.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use chess_core::Position;
use tracing::{debug, info, instrument, warn};

use super::protocol::{self, EngineLine};
use super::EngineBackend;
use crate::config::EngineConfig;
use crate::error::{EngineError, StartError};
use crate::limit::SearchLimit;

pub struct UciEngine {
    name: String,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    healthy: bool,
    timeout_slack: Duration,
    depth_timeout: Duration,
}

impl UciEngine {
    /// Launch the engine and complete the `uci`/`isready` handshake.
    #[instrument(skip_all, fields(path = %config.path.display()))]
    pub fn start(config: &EngineConfig) -> Result<Self, StartError> {
        let path = config.path.as_path();
        if config.ensure_executable {
            ensure_executable(path);
        }

        let mut child = Command::new(path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| spawn_error(path, e))?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                reap(&mut child);
                return Err(StartError::Launch("engine pipes unavailable".to_string()));
            }
        };
        let lines = match spawn_reader(stdout) {
            Ok(lines) => lines,
            Err(e) => {
                reap(&mut child);
                return Err(StartError::Launch(format!("cannot read engine output: {e}")));
            }
        };

        let mut engine = UciEngine {
            name: path.display().to_string(),
            child,
            stdin,
            lines,
            healthy: true,
            timeout_slack: config.timeout_slack(),
            depth_timeout: config.depth_timeout(),
        };

        // Dropping `engine` on failure tears the process down.
        engine
            .handshake(config)
            .map_err(|e| StartError::Launch(format!("handshake failed: {e}")))?;

        info!(name = %engine.name, "engine ready");
        Ok(engine)
    }

    fn handshake(&mut self, config: &EngineConfig) -> Result<(), EngineError> {
        let ceiling = config.handshake_timeout();
        let deadline = deadline_after(ceiling);

        self.send(protocol::UCI)?;
        loop {
            match protocol::parse_line(&self.read_line(deadline, ceiling)?) {
                EngineLine::Name(name) if !name.is_empty() => self.name = name.to_string(),
                EngineLine::UciOk => break,
                _ => {}
            }
        }

        for (name, value) in &config.options {
            self.send(&protocol::setoption_command(name, value))?;
        }

        self.send(protocol::IS_READY)?;
        loop {
            if protocol::parse_line(&self.read_line(deadline, ceiling)?) == EngineLine::ReadyOk {
                return Ok(());
            }
        }
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        if !self.healthy {
            return Err(EngineError::Disconnected);
        }
        debug!(command, "to engine");
        let written = writeln!(self.stdin, "{command}").and_then(|_| self.stdin.flush());
        if let Err(e) = written {
            warn!(error = %e, "engine pipe closed");
            self.healthy = false;
            return Err(EngineError::Disconnected);
        }
        Ok(())
    }

    fn read_line(&mut self, deadline: Instant, ceiling: Duration) -> Result<String, EngineError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match self.lines.recv_timeout(remaining) {
            Ok(line) => {
                debug!(line = %line, "from engine");
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout { ceiling }),
            Err(RecvTimeoutError::Disconnected) => {
                warn!("engine closed its output");
                self.healthy = false;
                Err(EngineError::Disconnected)
            }
        }
    }

    fn check_alive(&mut self) -> Result<(), EngineError> {
        if !self.healthy {
            return Err(EngineError::Disconnected);
        }
        match self.child.try_wait() {
            Ok(None) => Ok(()),
            Ok(Some(status)) => {
                warn!(%status, "engine process exited");
                self.healthy = false;
                Err(EngineError::Disconnected)
            }
            Err(e) => {
                warn!(error = %e, "cannot poll engine process");
                self.healthy = false;
                Err(EngineError::Disconnected)
            }
        }
    }

    /// Ask the engine to quit, and kill it if it has not exited after
    /// [`QUIT_GRACE`].
    fn shutdown(&mut self) {
        self.healthy = false;
        let _ = writeln!(self.stdin, "{}", protocol::QUIT);
        let _ = self.stdin.flush();
        if !wait_for_exit(&mut self.child, QUIT_GRACE) {
            debug!(name = %self.name, "engine ignored quit, killing it");
        }
        reap(&mut self.child);
    }
}

impl EngineBackend for UciEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn sync(&mut self, position: &Position) -> Result<(), EngineError> {
        self.check_alive()?;
        self.send(&protocol::position_command(position))
    }

    #[instrument(skip(self), fields(engine = %self.name))]
    fn best_move(&mut self, limit: SearchLimit) -> Result<String, EngineError> {
        self.check_alive()?;
        let ceiling = limit.protocol_timeout(self.timeout_slack, self.depth_timeout);
        let deadline = deadline_after(ceiling);
        self.send(&limit.go_command())?;

        loop {
            let line = match self.read_line(deadline, ceiling) {
                Ok(line) => line,
                Err(err @ EngineError::Timeout { .. }) => {
                    warn!(?ceiling, "engine search overran, killing it");
                    self.shutdown();
                    return Err(err);
                }
                Err(err) => return Err(err),
            };

            match protocol::parse_line(&line) {
                EngineLine::BestMove(Some(token)) => return Ok(token.to_string()),
                EngineLine::BestMove(None) => {
                    return Err(EngineError::Protocol("bestmove without a move".to_string()));
                }
                _ => {}
            }
        }
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.check_alive()?;
        self.send(protocol::NEW_GAME)
    }

    fn is_healthy(&self) -> bool {
        self.healthy
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        debug!(name = %self.name, "stopping engine");
        self.shutdown();
    }
}

const QUIT_GRACE: Duration = Duration::from_millis(200);
const EXIT_POLL: Duration = Duration::from_millis(10);

/// Fallback wait when a ceiling does not fit on the clock.
const LONGEST_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

fn deadline_after(ceiling: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ceiling)
        .or_else(|| now.checked_add(LONGEST_WAIT))
        .unwrap_or(now)
}

/// Poll until the child exits or `grace` runs out. True if it exited.
fn wait_for_exit(child: &mut Child, grace: Duration) -> bool {
    let deadline = deadline_after(grace);
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) if Instant::now() < deadline => thread::sleep(EXIT_POLL),
            Ok(None) | Err(_) => return false,
        }
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader(stdout: ChildStdout) -> io::Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("uci-reader".to_string())
        .spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn spawn_error(path: &Path, err: io::Error) -> StartError {
    match err.kind() {
        io::ErrorKind::NotFound => StartError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => StartError::Permission(path.to_path_buf()),
        _ => StartError::Launch(err.to_string()),
    }
}

/// Add execute bits to an existing engine file.
///
/// A missing file is left for the spawn to report.
#[cfg(unix)]
pub(crate) fn ensure_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let Ok(meta) = std::fs::metadata(path) else {
        return;
    };
    if !meta.is_file() {
        return;
    }
    let mut perms = meta.permissions();
    let mode = perms.mode();
    if mode & 0o111 == 0o111 {
        return;
    }
    perms.set_mode(mode | 0o111);
    match std::fs::set_permissions(path, perms) {
        Ok(()) => debug!(path = %path.display(), "marked engine executable"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not mark engine executable"),
    }
}

#[cfg(not(unix))]
pub(crate) fn ensure_executable(_path: &Path) {}

#[cfg(test)]
#[path = "process_tests.rs"]
mod process_tests;
