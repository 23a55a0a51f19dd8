//! Text commands for front ends.
//!
//! A front end parses a line into a [`Command`], runs it with [`execute`] and
//! shows the [`Reply`]. Session errors come back as replies; nothing here
//! fails.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use chess_core::SessionState;
use thiserror::Error;

use crate::error::{EngineError, MoveError};
use crate::limit::{LimitError, SearchLimit};
use crate::record::{Mover, PlayedMove};
use crate::session::GameSession;

pub const HELP: &str = "\
Commands:
  <move> | move <move>   play a move, e.g. e2e4 or e7e8q
  engine [limit]         let the engine move (limit: time=<s> or depth=<n>)
  hint [limit]           show the engine's suggestion without playing it
  reset                  start a new game
  state                  show the game state and engine status
  board                  show the board
  history                list the moves played
  restart                relaunch the engine
  save <path>            write the game to a JSON file
  help                   show this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(String),
    Engine(Option<SearchLimit>),
    Hint(Option<SearchLimit>),
    Reset,
    State,
    Board,
    History,
    Restart,
    Save(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Limit(#[from] LimitError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let limit = || -> Result<Option<SearchLimit>, CommandError> {
            if rest.is_empty() {
                Ok(None)
            } else {
                Ok(Some(rest.parse()?))
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "move" | "m" if rest.is_empty() => Err(CommandError::MissingArgument("move")),
            "move" | "m" => Ok(Command::Move(rest.to_string())),
            "engine" | "go" => Ok(Command::Engine(limit()?)),
            "hint" => Ok(Command::Hint(limit()?)),
            "reset" | "new" => Ok(Command::Reset),
            "state" | "status" => Ok(Command::State),
            "board" | "show" => Ok(Command::Board),
            "history" | "moves" => Ok(Command::History),
            "restart" => Ok(Command::Restart),
            "save" if rest.is_empty() => Err(CommandError::MissingArgument("save")),
            "save" => Ok(Command::Save(PathBuf::from(rest))),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ if rest.is_empty() && looks_like_move(word) => Ok(Command::Move(word.to_string())),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// A bare word is taken as a move when it starts like a square.
fn looks_like_move(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1].is_ascii_digit()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Ok,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub message: String,
    /// The position changed; front ends should redraw.
    pub changed: bool,
}

impl Reply {
    fn new(kind: ReplyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            changed: false,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(ReplyKind::Ok, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ReplyKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ReplyKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ReplyKind::Error, message)
    }

    fn changed(mut self) -> Self {
        self.changed = true;
        self
    }
}

impl From<MoveError> for Reply {
    fn from(err: MoveError) -> Self {
        let message = format!("{}: {}. {}", err.category(), err, err.recovery().hint());
        match err {
            MoveError::GameOver(_) => Reply::info(message),
            _ => Reply::error(message),
        }
    }
}

impl From<EngineError> for Reply {
    fn from(err: EngineError) -> Self {
        let message = format!("{}: {}. {}", err.category(), err, err.recovery().hint());
        match err {
            EngineError::GameOver(_) => Reply::info(message),
            EngineError::Unavailable(_) => Reply::warning(message),
            _ => Reply::error(message),
        }
    }
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        Reply::error(err.to_string())
    }
}

/// Run one command against the session.
///
/// `default_limit` applies to engine commands that do not name a limit.
/// [`Command::Quit`] is left to the caller and answers with a goodbye.
pub fn execute(session: &GameSession, command: Command, default_limit: SearchLimit) -> Reply {
    match command {
        Command::Move(text) => match session.apply_human_move(&text) {
            Ok(_) => Reply::ok(format!(
                "You played {}.{}",
                describe_last(session),
                outcome(session)
            ))
            .changed(),
            Err(err) => err.into(),
        },
        Command::Engine(limit) => {
            match session.request_engine_move(limit.unwrap_or(default_limit)) {
                Ok(_) => Reply::ok(format!(
                    "Engine played {}.{}",
                    describe_last(session),
                    outcome(session)
                ))
                .changed(),
                Err(err) => err.into(),
            }
        }
        Command::Hint(limit) => match session.suggest_engine_move(limit.unwrap_or(default_limit)) {
            Ok(mv) => Reply::info(format!("Engine suggests {mv}.")),
            Err(err) => err.into(),
        },
        Command::Reset => {
            session.reset();
            Reply::ok("New game. White to move.").changed()
        }
        Command::State => Reply::info(format!(
            "{} Engine: {}.",
            state_line(session),
            session.engine_status()
        )),
        Command::Board => {
            let position = session.snapshot();
            Reply::info(format!(
                "{}FEN: {}\n{}",
                position.diagram(),
                position.fen(),
                state_line(session)
            ))
        }
        Command::History => history(session),
        Command::Restart => match session.restart_engine() {
            Ok(name) => Reply::ok(format!("Engine restarted: {name}.")),
            Err(err) => err.into(),
        },
        Command::Save(path) => match session.record().save(&path) {
            Ok(()) => Reply::ok(format!("Game saved to {}.", path.display())),
            Err(err) => Reply::error(format!("Could not save the game: {err}.")),
        },
        Command::Help => Reply::info(HELP),
        Command::Quit => Reply::info("Bye."),
    }
}

/// `e2e4 (e4)` for the move just played, when its SAN is known.
fn describe_last(session: &GameSession) -> String {
    match session.history().pop() {
        Some(PlayedMove {
            mv, san: Some(san), ..
        }) => format!("{mv} ({san})"),
        Some(played) => played.mv.to_string(),
        None => String::new(),
    }
}

fn outcome(session: &GameSession) -> String {
    let state = session.current_state();
    if state.is_terminal() {
        format!(" {}", game_over_line(session, state))
    } else {
        String::new()
    }
}

fn game_over_line(session: &GameSession, state: SessionState) -> String {
    let to_move = session.snapshot().side_to_move();
    match state.winner(to_move) {
        Some(winner) => format!("Game over: {state}, {winner} wins."),
        None => format!("Game over: {state}."),
    }
}

fn state_line(session: &GameSession) -> String {
    let state = session.current_state();
    if state.is_terminal() {
        game_over_line(session, state)
    } else {
        let position = session.snapshot();
        format!(
            "Move {}, {} to move.",
            position.fullmove_number(),
            position.side_to_move()
        )
    }
}

fn history(session: &GameSession) -> Reply {
    let moves = session.history();
    if moves.is_empty() {
        return Reply::info("No moves yet.");
    }

    let mut out = String::new();
    for played in &moves {
        let who = match played.mover {
            Mover::Human => "you",
            Mover::Engine => "engine",
        };
        let san = played.san.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:>3}. {:<5} {:<6} {:<8} {}",
            played.ply,
            played.side.to_string(),
            played.mv.to_string(),
            san,
            who
        );
    }
    Reply::info(out.trim_end())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
