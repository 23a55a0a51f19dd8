use shakmaty::{
    CastlingMode, Chess, EnPassantMode, Position as _, Square,
    fen::Fen,
    zobrist::{Zobrist64, ZobristHash},
};
use thiserror::Error;

use crate::types::*;

/// FEN of the standard initial setup.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN {fen:?}: {reason}")]
    Syntax { fen: String, reason: String },
    #[error("FEN {fen:?} is not a legal position: {reason}")]
    Illegal { fen: String, reason: String },
}

/// A board state together with the road that led to it.
///
/// Besides piece placement, side to move, castling rights, en-passant target
/// and the move counters, a `Position` remembers the start it was played from,
/// the moves played since, and a hash of every position reached on the way.
/// The history is what makes repetition counting and engine synchronisation
/// possible.
///
/// Positions can only be built from a validated FEN or by applying a legal
/// move through a [`RulesOracle`](crate::RulesOracle), so every value is a
/// position reachable by legal play.
#[derive(Clone, Debug)]
pub struct Position {
    chess: Chess,
    /// `None` for the standard setup.
    start: Option<String>,
    moves: Vec<Move>,
    /// Repetition keys, one per position reached, current one last.
    keys: Vec<Zobrist64>,
}

impl Position {
    pub fn startpos() -> Self {
        Self::rooted(Chess::default(), None)
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed: Fen = fen.trim().parse().map_err(|e| FenError::Syntax {
            fen: fen.to_string(),
            reason: format!("{e}"),
        })?;
        let chess: Chess =
            parsed
                .into_position(CastlingMode::Standard)
                .map_err(|e| FenError::Illegal {
                    fen: fen.to_string(),
                    reason: format!("{e}"),
                })?;

        let normalized = fen_of(&chess);
        let start = (normalized != STARTING_FEN).then_some(normalized);
        Ok(Self::rooted(chess, start))
    }

    fn rooted(chess: Chess, start: Option<String>) -> Self {
        let key = repetition_key(&chess);
        Self {
            chess,
            start,
            moves: Vec::new(),
            keys: vec![key],
        }
    }

    /// The position after `mv`, which the caller has already resolved and
    /// played on the backend board.
    pub(crate) fn advanced(&self, mv: Move, next: Chess) -> Self {
        let mut keys = self.keys.clone();
        keys.push(repetition_key(&next));
        let mut moves = self.moves.clone();
        moves.push(mv);
        Self {
            chess: next,
            start: self.start.clone(),
            moves,
            keys,
        }
    }

    pub(crate) fn chess(&self) -> &Chess {
        &self.chess
    }

    pub fn fen(&self) -> String {
        fen_of(&self.chess)
    }

    /// FEN of the position this one was played from.
    pub fn start_fen(&self) -> &str {
        self.start.as_deref().unwrap_or(STARTING_FEN)
    }

    pub fn is_standard_start(&self) -> bool {
        self.start.is_none()
    }

    /// Moves played since the start position, in order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    pub fn side_to_move(&self) -> Color {
        self.chess.turn().into()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.chess.halfmoves()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.chess.fullmoves().get()
    }

    /// How many times the current position has occurred, counting this one.
    pub fn repetitions(&self) -> usize {
        match self.keys.last() {
            Some(current) => self.keys.iter().filter(|k| *k == current).count(),
            None => 0,
        }
    }

    /// Text board, rank 8 at the top, upper case for White.
    pub fn diagram(&self) -> String {
        let board = self.chess.board();
        let mut out = String::with_capacity(200);
        for rank in (0..8u32).rev() {
            out.push(char::from(b'1' + rank as u8));
            for file in 0..8u32 {
                out.push(' ');
                match board.piece_at(Square::new(rank * 8 + file)) {
                    Some(piece) => out.push(piece.char()),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.moves == other.moves && self.fen() == other.fen()
    }
}

impl Eq for Position {}

fn fen_of(chess: &Chess) -> String {
    Fen::from_position(chess.clone(), EnPassantMode::Legal).to_string()
}

// Board, side to move, castling rights and a capturable en-passant square.
// Move counters are not part of the key.
fn repetition_key(chess: &Chess) -> Zobrist64 {
    chess.zobrist_hash::<Zobrist64>(EnPassantMode::Legal)
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
