//! Random mover that speaks UCI.
//!
//! Picks uniformly among the legal moves. A few options script its
//! behaviour for tests:
//! - `Seed`: make the move choice reproducible
//! - `FixedMove`: answer every `go` with this text, legal or not
//! - `DelayMs`: wait before answering `go`
//! - `ExitOnGo`: exit instead of answering `go`

use std::time::Duration;

use chess_core::{parse_position_args, Position, RulesOracle, StandardRules};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const NAME: &str = "RandomMover 0.1";
pub const AUTHOR: &str = "ML-chess";

/// What the driver should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write these lines now.
    Send(Vec<String>),
    /// Wait, then write these lines.
    SendAfter(Duration, Vec<String>),
    /// Stop reading and exit.
    Exit,
}

impl Action {
    fn none() -> Self {
        Action::Send(Vec::new())
    }

    fn line(line: impl Into<String>) -> Self {
        Action::Send(vec![line.into()])
    }
}

pub struct RandomMover {
    position: Position,
    rng: StdRng,
    fixed_move: Option<String>,
    delay: Duration,
    exit_on_go: bool,
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomMover {
    pub fn new() -> Self {
        Self {
            position: Position::startpos(),
            rng: StdRng::from_entropy(),
            fixed_move: None,
            delay: Duration::ZERO,
            exit_on_go: false,
        }
    }

    #[cfg(test)]
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn handle(&mut self, line: &str) -> Action {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Action::none();
        };

        match command {
            "uci" => Action::Send(vec![
                format!("id name {NAME}"),
                format!("id author {AUTHOR}"),
                "option name Seed type spin default 0 min 0 max 18446744073709551615".to_string(),
                "option name FixedMove type string default <empty>".to_string(),
                "option name DelayMs type spin default 0 min 0 max 600000".to_string(),
                "option name ExitOnGo type check default false".to_string(),
                "uciok".to_string(),
            ]),
            "isready" => Action::line("readyok"),
            "setoption" => self.set_option(&parts[1..]),
            "ucinewgame" => {
                self.position = Position::startpos();
                Action::none()
            }
            "position" => match parse_position_args(&parts[1..]) {
                Ok(position) => {
                    self.position = position;
                    Action::none()
                }
                Err(e) => Action::line(format!("info string ignoring position: {e}")),
            },
            "go" => self.go(),
            "quit" => Action::Exit,
            _ => Action::none(),
        }
    }

    fn set_option(&mut self, args: &[&str]) -> Action {
        // setoption name <name...> [value <value...>]
        let value_at = args.iter().position(|&a| a == "value");
        let name = match args.first() {
            Some(&"name") => args[1..value_at.unwrap_or(args.len())].join(" "),
            _ => return Action::line("info string setoption needs a name"),
        };
        let value = value_at
            .map(|i| args[i + 1..].join(" "))
            .unwrap_or_default();

        match name.to_ascii_lowercase().as_str() {
            "seed" => match value.parse::<u64>() {
                Ok(seed) => self.rng = StdRng::seed_from_u64(seed),
                Err(_) => return Action::line(format!("info string bad seed {value:?}")),
            },
            "fixedmove" => {
                self.fixed_move =
                    (!value.is_empty() && value != "<empty>").then(|| value.clone());
            }
            "delayms" => match value.parse::<u64>() {
                Ok(ms) => self.delay = Duration::from_millis(ms),
                Err(_) => return Action::line(format!("info string bad delay {value:?}")),
            },
            "exitongo" => self.exit_on_go = value.eq_ignore_ascii_case("true"),
            _ => return Action::line(format!("info string unknown option {name:?}")),
        }
        Action::none()
    }

    fn go(&mut self) -> Action {
        if self.exit_on_go {
            return Action::Exit;
        }

        let answer = match &self.fixed_move {
            Some(text) => text.clone(),
            None => {
                let moves = StandardRules.legal_moves(&self.position);
                match moves.choose(&mut self.rng) {
                    Some(mv) => mv.to_string(),
                    // UCI's null move: nothing to play.
                    None => "0000".to_string(),
                }
            }
        };

        let lines = vec![
            "info depth 1 nodes 1 score cp 0".to_string(),
            format!("bestmove {answer}"),
        ];
        if self.delay.is_zero() {
            Action::Send(lines)
        } else {
            Action::SendAfter(self.delay, lines)
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
