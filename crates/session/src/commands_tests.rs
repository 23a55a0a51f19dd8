use super::*;

use std::time::Duration;

use crate::engine::EngineBackend;
use crate::error::StartError;
use chess_core::Position;

struct Echo(&'static str);

impl EngineBackend for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn sync(&mut self, _position: &Position) -> Result<(), EngineError> {
        Ok(())
    }

    fn best_move(&mut self, _limit: SearchLimit) -> Result<String, EngineError> {
        Ok(self.0.to_string())
    }
}

fn run(session: &GameSession, line: &str) -> Reply {
    match line.parse::<Command>() {
        Ok(command) => execute(session, command, SearchLimit::default()),
        Err(err) => err.into(),
    }
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_commands() {
    assert_eq!("e2e4".parse(), Ok(Command::Move("e2e4".to_string())));
    assert_eq!("move e7e8q".parse(), Ok(Command::Move("e7e8q".to_string())));
    assert_eq!("E2E4".parse(), Ok(Command::Move("E2E4".to_string())));
    assert_eq!("engine".parse(), Ok(Command::Engine(None)));
    assert_eq!(
        "engine time=0.5".parse(),
        Ok(Command::Engine(Some(SearchLimit::Time(Duration::from_millis(500)))))
    );
    assert_eq!(
        "hint depth=6".parse(),
        Ok(Command::Hint(Some(SearchLimit::Depth(6))))
    );
    assert_eq!("  reset ".parse(), Ok(Command::Reset));
    assert_eq!("save game.json".parse(), Ok(Command::Save("game.json".into())));
    assert_eq!("quit".parse(), Ok(Command::Quit));
}

#[test]
fn test_parse_errors() {
    assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
    assert_eq!(
        "hello".parse::<Command>(),
        Err(CommandError::Unknown("hello".to_string()))
    );
    assert_eq!(
        "save".parse::<Command>(),
        Err(CommandError::MissingArgument("save"))
    );
    assert!(matches!(
        "engine nodes=5".parse::<Command>(),
        Err(CommandError::Limit(_))
    ));
}

#[test]
fn test_huge_engine_time_is_refused() {
    let session = GameSession::new();
    let reply = run(&session, "engine time=1e19");
    assert_eq!(reply.kind, ReplyKind::Error);
    assert!(!reply.changed);
    assert!(session.history().is_empty());
}

#[test]
fn test_bare_bad_square_still_reaches_session() {
    // `e2e9` looks like a move, so the session reports the parse error.
    assert_eq!("e2e9".parse(), Ok(Command::Move("e2e9".to_string())));
}

// =============================================================================
// Execution
// =============================================================================

#[test]
fn test_move_reply() {
    let session = GameSession::new();
    let reply = run(&session, "e2e4");

    assert_eq!(reply.kind, ReplyKind::Ok);
    assert!(reply.changed);
    assert_eq!(reply.message, "You played e2e4 (e4).");
}

#[test]
fn test_invalid_and_illegal_replies() {
    let session = GameSession::new();

    let reply = run(&session, "e2e9");
    assert_eq!(reply.kind, ReplyKind::Error);
    assert!(!reply.changed);
    assert!(reply.message.starts_with("Invalid input:"), "{}", reply.message);

    let reply = run(&session, "e2e5");
    assert_eq!(reply.kind, ReplyKind::Error);
    assert!(reply.message.starts_with("Illegal move:"), "{}", reply.message);
    assert_eq!(session.snapshot(), Position::startpos());
}

#[test]
fn test_engine_reply_and_checkmate() {
    let session = GameSession::with_engine(Box::new(Echo("d8h4")));
    for mv in ["f2f3", "e7e5", "g2g4"] {
        run(&session, mv);
    }

    let reply = run(&session, "engine");
    assert_eq!(reply.kind, ReplyKind::Ok);
    assert_eq!(
        reply.message,
        "Engine played d8h4 (Qh4#). Game over: checkmate, Black wins."
    );

    let reply = run(&session, "e2e4");
    assert_eq!(reply.kind, ReplyKind::Info);
    assert!(reply.message.starts_with("Game over:"));
}

#[test]
fn test_hint_does_not_change_the_board() {
    let session = GameSession::with_engine(Box::new(Echo("e2e4")));
    let reply = run(&session, "hint");

    assert_eq!(reply.kind, ReplyKind::Info);
    assert_eq!(reply.message, "Engine suggests e2e4.");
    assert!(!reply.changed);
    assert!(session.history().is_empty());
}

#[test]
fn test_engine_unavailable_is_a_warning() {
    let launcher = || -> Result<Box<dyn EngineBackend>, StartError> {
        Err(StartError::Permission("/opt/stockfish".into()))
    };
    let session = GameSession::with_launcher(Box::new(launcher));

    let reply = run(&session, "engine");
    assert_eq!(reply.kind, ReplyKind::Warning);
    assert!(reply.message.contains("permission denied"));
    assert!(reply.message.contains("keep playing"));
}

#[test]
fn test_state_board_and_history() {
    let session = GameSession::new();
    run(&session, "e2e4");
    run(&session, "e7e5");

    let state = run(&session, "state");
    assert_eq!(
        state.message,
        "Move 2, White to move. Engine: none (human-only play)."
    );

    let board = run(&session, "board");
    assert!(board.message.contains("4 . . . . P . . ."));
    assert!(board.message.contains("FEN: rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"));

    let history = run(&session, "history");
    let lines: Vec<&str> = history.message.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("e2e4") && lines[0].ends_with("you"));
    assert!(lines[1].contains("Black"));
}

#[test]
fn test_reset_reply() {
    let session = GameSession::new();
    run(&session, "e2e4");
    let reply = run(&session, "new");

    assert!(reply.changed);
    assert_eq!(session.snapshot(), Position::startpos());
    assert_eq!(run(&session, "history").message, "No moves yet.");
}

#[test]
fn test_save_writes_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    let session = GameSession::new();
    run(&session, "e2e4");

    let reply = run(&session, &format!("save {}", path.display()));
    assert_eq!(reply.kind, ReplyKind::Ok);

    let record = crate::GameRecord::load(&path).unwrap();
    assert_eq!(record.moves.len(), 1);
}
