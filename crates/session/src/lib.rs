//! Human vs engine chess session.
//!
//! - [`GameSession`]: owns the authoritative position and gates every move
//! - [`engine`]: the engine seam and the UCI subprocess adapter
//! - [`SessionConfig`]: TOML configuration for the engine and search limit
//! - [`commands`]: text commands and replies for front ends
//! - [`GameRecord`]: the game as JSON

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod limit;
pub mod record;
pub mod session;

pub use commands::{execute, Command, CommandError, Reply, ReplyKind};
pub use config::{ConfigError, EngineConfig, SessionConfig, DEFAULT_ENGINE_PATH};
pub use engine::{EngineBackend, EngineLauncher, EngineStatus, UciEngine};
pub use error::{EngineError, ErrorCategory, MoveError, Recovery, StartError};
pub use limit::{LimitError, SearchLimit};
pub use record::{GameRecord, Mover, PlayedMove, RecordError};
pub use session::GameSession;
