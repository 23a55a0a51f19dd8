use thiserror::Error;

use crate::board::{FenError, Position};
use crate::rules::{RulesOracle, StandardRules};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UciPositionError {
    #[error("position command needs `startpos` or `fen <fen>`")]
    MissingSetup,
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error("bad move {text:?} in position command: {reason}")]
    Move { text: String, reason: String },
}

/// Arguments of the `position` command that reproduce `pos`, history
/// included, e.g. `startpos moves e2e4 e7e5`.
pub fn position_args(pos: &Position) -> String {
    let mut s = if pos.is_standard_start() {
        String::from("startpos")
    } else {
        format!("fen {}", pos.start_fen())
    };
    if !pos.moves().is_empty() {
        s.push_str(" moves");
        for mv in pos.moves() {
            s.push(' ');
            s.push_str(&mv.to_string());
        }
    }
    s
}

/// Rebuild a position from the arguments of a `position` command.
///
/// Supports `startpos [moves ...]` and `fen <fields> [moves ...]`. Unlike a
/// forgiving engine, a move that cannot be played is an error rather than
/// silently skipped.
pub fn parse_position_args(args: &[&str]) -> Result<Position, UciPositionError> {
    let moves_at = args.iter().position(|&a| a == "moves").unwrap_or(args.len());
    let (setup, moves) = args.split_at(moves_at);

    let mut pos = match setup.first() {
        Some(&"startpos") => Position::startpos(),
        Some(&"fen") if setup.len() > 1 => Position::from_fen(&setup[1..].join(" "))?,
        _ => return Err(UciPositionError::MissingSetup),
    };

    let rules = StandardRules;
    for &text in moves.iter().skip(1) {
        let mv: Move = text.parse().map_err(|e: MoveParseError| UciPositionError::Move {
            text: text.to_string(),
            reason: e.to_string(),
        })?;
        pos = rules
            .apply(&pos, &mv)
            .map_err(|e| UciPositionError::Move {
                text: text.to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(pos)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
