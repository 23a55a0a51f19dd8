//! The subset of UCI spoken to the engine.

use chess_core::{position_args, Position};

pub const UCI: &str = "uci";
pub const UCI_OK: &str = "uciok";
pub const IS_READY: &str = "isready";
pub const READY_OK: &str = "readyok";
pub const NEW_GAME: &str = "ucinewgame";
pub const QUIT: &str = "quit";

/// One line of engine output, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineLine<'a> {
    /// `id name <name>`
    Name(&'a str),
    UciOk,
    ReadyOk,
    /// `bestmove <move> [ponder <move>]`, the move token if there was one.
    BestMove(Option<&'a str>),
    /// `info ...` search output.
    Info,
    /// Anything else: `id author`, `option ...`, banners, noise.
    Other,
}

pub fn parse_line(line: &str) -> EngineLine<'_> {
    let line = line.trim();
    let mut tokens = line.split_whitespace();

    match tokens.next() {
        Some(UCI_OK) => EngineLine::UciOk,
        Some(READY_OK) => EngineLine::ReadyOk,
        Some("bestmove") => EngineLine::BestMove(tokens.next()),
        Some("info") => EngineLine::Info,
        Some("id") if tokens.next() == Some("name") => {
            let name = line
                .splitn(3, char::is_whitespace)
                .nth(2)
                .map(str::trim)
                .unwrap_or_default();
            EngineLine::Name(name)
        }
        _ => EngineLine::Other,
    }
}

pub fn position_command(position: &Position) -> String {
    format!("position {}", position_args(position))
}

pub fn setoption_command(name: &str, value: &str) -> String {
    format!("setoption name {name} value {value}")
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
