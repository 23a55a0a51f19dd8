//! Move history and saved games.

use std::fs;
use std::path::{Path, PathBuf};

use chess_core::{parse_position_args, Color, Move, Position, SessionState, UciPositionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mover {
    Human,
    Engine,
}

/// One applied move, as stored in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    /// 1-based ply number within the game.
    pub ply: usize,
    pub side: Color,
    pub mover: Mover,
    #[serde(rename = "uci")]
    pub mv: Move,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed game record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("game record does not replay: {0}")]
    Replay(#[from] UciPositionError),
}

/// A finished or ongoing game, serialisable as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub start_fen: String,
    pub moves: Vec<PlayedMove>,
    pub state: SessionState,
    /// Position after the last move.
    pub fen: String,
}

impl GameRecord {
    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let json = fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild the final position by replaying the moves from the start.
    pub fn replay(&self) -> Result<Position, RecordError> {
        let mut args = vec!["fen"];
        args.extend(self.start_fen.split_whitespace());
        let moves: Vec<String> = self.moves.iter().map(|m| m.mv.to_string()).collect();
        if !moves.is_empty() {
            args.push("moves");
            args.extend(moves.iter().map(String::as_str));
        }
        Ok(parse_position_args(&args)?)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
