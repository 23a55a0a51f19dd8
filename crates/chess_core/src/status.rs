//! Termination classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::rules::RulesOracle;
use crate::types::Color;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position that end the game by repetition.
pub const REPETITION_LIMIT: usize = 3;

/// Where a game stands. Everything except `InProgress` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    InProgress,
    Checkmate,
    Stalemate,
    DrawInsufficientMaterial,
    DrawFiftyMoveRule,
    DrawRepetition,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self != SessionState::InProgress
    }

    /// The winner, given the side to move in the classified position.
    pub fn winner(self, side_to_move: Color) -> Option<Color> {
        match self {
            SessionState::Checkmate => Some(side_to_move.other()),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionState::InProgress => "in progress",
            SessionState::Checkmate => "checkmate",
            SessionState::Stalemate => "stalemate",
            SessionState::DrawInsufficientMaterial => "draw by insufficient material",
            SessionState::DrawFiftyMoveRule => "draw by the fifty-move rule",
            SessionState::DrawRepetition => "draw by threefold repetition",
        };
        f.write_str(text)
    }
}

/// Classify `pos`. Exactly one state is returned for every position.
///
/// Positions without a legal move are decided first and are always
/// checkmate or stalemate. Draw rules are only consulted when the side to
/// move can still move: insufficient material, then the fifty-move rule,
/// then repetition.
pub fn classify<R: RulesOracle + ?Sized>(rules: &R, pos: &Position) -> SessionState {
    if rules.is_terminal_no_moves(pos) {
        return if rules.is_check(pos) {
            SessionState::Checkmate
        } else {
            SessionState::Stalemate
        };
    }

    if rules.has_insufficient_material(pos) {
        return SessionState::DrawInsufficientMaterial;
    }
    if rules.halfmove_clock(pos) >= FIFTY_MOVE_HALFMOVES {
        return SessionState::DrawFiftyMoveRule;
    }
    if rules.repetition_count(pos) >= REPETITION_LIMIT {
        return SessionState::DrawRepetition;
    }

    SessionState::InProgress
}
