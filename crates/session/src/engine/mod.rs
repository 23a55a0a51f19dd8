//! Engine side of the session.
//!
//! The session talks to an engine only through [`EngineBackend`], and
//! brings one up through an [`EngineLauncher`]. [`UciEngine`] is the real
//! thing: a child process speaking UCI over stdin/stdout.

pub mod process;
pub mod protocol;

use std::fmt;

use chess_core::Position;

use crate::error::{EngineError, StartError};
use crate::limit::SearchLimit;

pub use process::UciEngine;

/// A running engine that can be asked for moves.
pub trait EngineBackend: Send {
    /// Name the engine reported during the handshake.
    fn name(&self) -> &str;

    /// Make the engine's idea of the position match `position`.
    ///
    /// Sent before every search, so calling it twice in a row is harmless.
    fn sync(&mut self, position: &Position) -> Result<(), EngineError>;

    /// Search the synchronised position and return the raw move text.
    ///
    /// The text is not trusted: the caller parses and validates it.
    fn best_move(&mut self, limit: SearchLimit) -> Result<String, EngineError>;

    /// Tell the engine a new game starts.
    fn new_game(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

/// Something that can start an engine on demand.
pub trait EngineLauncher: Send {
    fn launch(&self) -> Result<Box<dyn EngineBackend>, StartError>;
}

impl<F> EngineLauncher for F
where
    F: Fn() -> Result<Box<dyn EngineBackend>, StartError> + Send,
{
    fn launch(&self) -> Result<Box<dyn EngineBackend>, StartError> {
        self()
    }
}

/// Engine availability as seen from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// No engine configured; both sides are played by hand.
    HumanOnly,
    /// Configured but not launched yet.
    NotStarted,
    Ready(String),
    Unavailable(String),
    Disconnected,
}

impl EngineStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineStatus::Ready(_))
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::HumanOnly => write!(f, "none (human-only play)"),
            EngineStatus::NotStarted => write!(f, "not started yet"),
            EngineStatus::Ready(name) => write!(f, "ready ({name})"),
            EngineStatus::Unavailable(reason) => write!(f, "unavailable: {reason}"),
            EngineStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}
