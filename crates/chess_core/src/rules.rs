//! Rules oracle: legality, move application and termination predicates.
//!
//! Chess rules are not implemented here. [`StandardRules`] answers every
//! question by asking `shakmaty`, and the rest of the workspace only ever
//! talks to the [`RulesOracle`] trait.

use shakmaty::{CastlingMode, Position as _, san::SanPlus, uci::UciMove};
use thiserror::Error;

use crate::board::Position;
use crate::types::Move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("{mv} is not a legal move in {fen}")]
    IllegalMove { mv: Move, fen: String },
}

/// Everything the session needs to know about the rules of the game.
///
/// Implementations must be pure: no method may change the position it is
/// given, and [`apply`](RulesOracle::apply) returns a new one.
pub trait RulesOracle: Send + Sync {
    /// All legal moves for the side to move, castling written as the king's
    /// two-square step.
    fn legal_moves(&self, pos: &Position) -> Vec<Move>;

    fn is_legal(&self, pos: &Position, mv: &Move) -> bool {
        self.legal_moves(pos).contains(mv)
    }

    /// Play `mv` on a copy of `pos`.
    fn apply(&self, pos: &Position, mv: &Move) -> Result<Position, RulesError>;

    /// True when the side to move has no legal move at all.
    fn is_terminal_no_moves(&self, pos: &Position) -> bool {
        self.legal_moves(pos).is_empty()
    }

    /// True when the side to move is in check.
    fn is_check(&self, pos: &Position) -> bool;

    fn has_insufficient_material(&self, pos: &Position) -> bool;

    fn halfmove_clock(&self, pos: &Position) -> u32 {
        pos.halfmove_clock()
    }

    fn repetition_count(&self, pos: &Position) -> usize {
        pos.repetitions()
    }

    /// Short algebraic notation for a legal move, when the backend knows it.
    fn san(&self, _pos: &Position, _mv: &Move) -> Option<String> {
        None
    }
}

/// Standard chess rules backed by `shakmaty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    /// Resolve long-form notation to a backend move, if it is legal.
    ///
    /// Only the spelling [`legal_moves`](RulesOracle::legal_moves) lists is
    /// accepted, so castling as king-takes-rook (`e1h1`) is refused.
    fn resolve(pos: &Position, mv: &Move) -> Option<shakmaty::Move> {
        let m = mv.to_uci().to_move(pos.chess()).ok()?;
        (pos.chess().is_legal(&m) && Self::canonical(&m) == Some(*mv)).then_some(m)
    }

    fn canonical(m: &shakmaty::Move) -> Option<Move> {
        Move::from_uci(&UciMove::from_move(m, CastlingMode::Standard))
    }
}

impl RulesOracle for StandardRules {
    fn legal_moves(&self, pos: &Position) -> Vec<Move> {
        pos.chess()
            .legal_moves()
            .iter()
            .filter_map(Self::canonical)
            .collect()
    }

    fn is_legal(&self, pos: &Position, mv: &Move) -> bool {
        Self::resolve(pos, mv).is_some()
    }

    fn apply(&self, pos: &Position, mv: &Move) -> Result<Position, RulesError> {
        let illegal = || RulesError::IllegalMove {
            mv: *mv,
            fen: pos.fen(),
        };

        let m = Self::resolve(pos, mv).ok_or_else(illegal)?;
        let next = pos.chess().clone().play(&m).map_err(|_| illegal())?;
        Ok(pos.advanced(*mv, next))
    }

    fn is_terminal_no_moves(&self, pos: &Position) -> bool {
        pos.chess().legal_moves().is_empty()
    }

    fn is_check(&self, pos: &Position) -> bool {
        pos.chess().is_check()
    }

    fn has_insufficient_material(&self, pos: &Position) -> bool {
        pos.chess().is_insufficient_material()
    }

    fn san(&self, pos: &Position, mv: &Move) -> Option<String> {
        let m = Self::resolve(pos, mv)?;
        Some(SanPlus::from_move(pos.chess().clone(), &m).to_string())
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
