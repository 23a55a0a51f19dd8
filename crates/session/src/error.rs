//! Error taxonomy of the session.
//!
//! Every failure a caller can see maps to an [`ErrorCategory`] and a
//! [`Recovery`], so a front end can present it without matching on variants.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chess_core::{Move, MoveParseError, SessionState};
use thiserror::Error;

/// The engine process could not be brought up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("engine executable not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("engine at {} cannot be executed (permission denied)", .0.display())]
    Permission(PathBuf),
    #[error("engine failed to launch: {0}")]
    Launch(String),
}

/// A human move was refused. The session is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Parse(#[from] MoveParseError),
    #[error("{mv} is not legal in this position")]
    Illegal { mv: Move },
    #[error("the game is over ({0})")]
    GameOver(SessionState),
}

/// An engine move could not be obtained or was refused. The session is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("the game is over ({0})")]
    GameOver(SessionState),
    #[error("{0}")]
    Unavailable(String),
    #[error("engine answered with something that is not a move: {0}")]
    Protocol(String),
    #[error("engine suggested an illegal move: {mv}")]
    IllegalMove { mv: Move },
    #[error("engine did not answer within {}ms", .ceiling.as_millis())]
    Timeout { ceiling: Duration },
    #[error("engine process has gone away")]
    Disconnected,
}

impl From<StartError> for EngineError {
    fn from(err: StartError) -> Self {
        EngineError::Unavailable(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidInput,
    IllegalMove,
    GameOver,
    EngineUnavailable,
    EngineMisbehaved,
    EngineTimeout,
    EngineDisconnected,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "Invalid input",
            ErrorCategory::IllegalMove => "Illegal move",
            ErrorCategory::GameOver => "Game over",
            ErrorCategory::EngineUnavailable => "Engine unavailable",
            ErrorCategory::EngineMisbehaved => "Engine error",
            ErrorCategory::EngineTimeout => "Engine timeout",
            ErrorCategory::EngineDisconnected => "Engine disconnected",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user can do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recovery {
    ReEnterMove,
    NewGame,
    HumanOnly,
    RejectEngineMove,
    RestartEngine,
}

impl Recovery {
    pub fn hint(self) -> &'static str {
        match self {
            Recovery::ReEnterMove => "Enter a move like e2e4 or e7e8q.",
            Recovery::NewGame => "Type `reset` to start a new game.",
            Recovery::HumanOnly => "You can keep playing both sides.",
            Recovery::RejectEngineMove => {
                "The engine move was discarded; ask again or `restart` the engine."
            }
            Recovery::RestartEngine => "Type `restart` to relaunch the engine.",
        }
    }
}

impl MoveError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MoveError::Parse(_) => ErrorCategory::InvalidInput,
            MoveError::Illegal { .. } => ErrorCategory::IllegalMove,
            MoveError::GameOver(_) => ErrorCategory::GameOver,
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            MoveError::Parse(_) | MoveError::Illegal { .. } => Recovery::ReEnterMove,
            MoveError::GameOver(_) => Recovery::NewGame,
        }
    }
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::GameOver(_) => ErrorCategory::GameOver,
            EngineError::Unavailable(_) => ErrorCategory::EngineUnavailable,
            EngineError::Protocol(_) | EngineError::IllegalMove { .. } => {
                ErrorCategory::EngineMisbehaved
            }
            EngineError::Timeout { .. } => ErrorCategory::EngineTimeout,
            EngineError::Disconnected => ErrorCategory::EngineDisconnected,
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            EngineError::GameOver(_) => Recovery::NewGame,
            EngineError::Unavailable(_) => Recovery::HumanOnly,
            EngineError::Protocol(_) | EngineError::IllegalMove { .. } => {
                Recovery::RejectEngineMove
            }
            EngineError::Timeout { .. } | EngineError::Disconnected => Recovery::RestartEngine,
        }
    }
}
