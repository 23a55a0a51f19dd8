use super::*;

#[test]
fn test_bestmove_lines() {
    assert_eq!(parse_line("bestmove e2e4"), EngineLine::BestMove(Some("e2e4")));
    assert_eq!(
        parse_line("bestmove e7e8q ponder a2a3\r"),
        EngineLine::BestMove(Some("e7e8q"))
    );
    assert_eq!(parse_line("bestmove"), EngineLine::BestMove(None));
    assert_eq!(
        parse_line("bestmove (none)"),
        EngineLine::BestMove(Some("(none)"))
    );
}

#[test]
fn test_handshake_lines() {
    assert_eq!(
        parse_line("id name Stockfish 16.1"),
        EngineLine::Name("Stockfish 16.1")
    );
    assert_eq!(parse_line("id author the Stockfish developers"), EngineLine::Other);
    assert_eq!(parse_line("uciok"), EngineLine::UciOk);
    assert_eq!(parse_line("  readyok  "), EngineLine::ReadyOk);
}

#[test]
fn test_noise_is_other() {
    assert_eq!(
        parse_line("info depth 12 score cp 31 pv e2e4 e7e5"),
        EngineLine::Info
    );
    assert_eq!(parse_line(""), EngineLine::Other);
    assert_eq!(
        parse_line("option name Hash type spin default 16 min 1 max 33554432"),
        EngineLine::Other
    );
    assert_eq!(parse_line("Stockfish 16.1 by the Stockfish developers"), EngineLine::Other);
}

#[test]
fn test_commands() {
    let pos = Position::startpos();
    assert_eq!(position_command(&pos), "position startpos");
    assert_eq!(setoption_command("Threads", "2"), "setoption name Threads value 2");
}
