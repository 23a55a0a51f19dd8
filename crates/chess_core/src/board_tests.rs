use super::*;
use crate::{RulesOracle, StandardRules};

fn play(pos: &Position, moves: &[&str]) -> Position {
    let rules = StandardRules;
    let mut pos = pos.clone();
    for text in moves {
        let mv: Move = text.parse().unwrap();
        pos = rules.apply(&pos, &mv).unwrap();
    }
    pos
}

#[test]
fn test_startpos_fen() {
    let pos = Position::startpos();
    assert_eq!(pos.fen(), STARTING_FEN);
    assert!(pos.is_standard_start());
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 1);
    assert_eq!(pos.repetitions(), 1);
    assert!(pos.moves().is_empty());
}

#[test]
fn test_from_fen_of_start_is_standard() {
    let pos = Position::from_fen(STARTING_FEN).unwrap();
    assert!(pos.is_standard_start());
    assert_eq!(pos, Position::startpos());
}

#[test]
fn test_from_fen_keeps_custom_start() {
    let fen = "8/8/8/4k3/8/4K3/8/8 w - - 0 1";
    let pos = Position::from_fen(fen).unwrap();
    assert!(!pos.is_standard_start());
    assert_eq!(pos.start_fen(), fen);
}

#[test]
fn test_from_fen_rejects_garbage() {
    assert!(matches!(
        Position::from_fen("not a fen"),
        Err(FenError::Syntax { .. })
    ));
}

#[test]
fn test_from_fen_rejects_impossible_position() {
    // No kings at all.
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
        Err(FenError::Illegal { .. })
    ));
}

#[test]
fn test_moves_and_counters_advance() {
    let pos = play(&Position::startpos(), &["e2e4", "e7e5", "g1f3"]);
    assert_eq!(pos.side_to_move(), Color::Black);
    assert_eq!(pos.fullmove_number(), 2);
    assert_eq!(pos.halfmove_clock(), 1);
    assert_eq!(pos.moves().len(), 3);
    assert_eq!(pos.last_move().unwrap().to_string(), "g1f3");
}

#[test]
fn test_repetitions_count_knight_shuffle() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let once = play(&Position::startpos(), &shuffle);
    assert_eq!(once.repetitions(), 2);

    let twice = play(&once, &shuffle);
    assert_eq!(twice.repetitions(), 3);
}

#[test]
fn test_equality_includes_history() {
    let a = play(&Position::startpos(), &["g1f3", "g8f6", "f3g1", "f6g8"]);
    let b = Position::startpos();
    assert_eq!(a.fen().split(' ').next(), b.fen().split(' ').next());
    assert_ne!(a, b);
}

#[test]
fn test_diagram_of_startpos() {
    let diagram = Position::startpos().diagram();
    let lines: Vec<&str> = diagram.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "8 r n b q k b n r");
    assert_eq!(lines[6], "2 P P P P P P P P");
    assert_eq!(lines[7], "1 R N B Q K B N R");
    assert_eq!(lines[8], "  a b c d e f g h");
}
