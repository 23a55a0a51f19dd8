use super::*;
use crate::board::STARTING_FEN;

fn mv(text: &str) -> Move {
    text.parse().unwrap()
}

#[test]
fn test_startpos_moves() {
    let pos = Position::startpos();
    let moves = StandardRules.legal_moves(&pos);
    // Starting position has 20 legal moves
    assert_eq!(moves.len(), 20);
    assert!(moves.contains(&mv("e2e4")));
    assert!(moves.contains(&mv("g1f3")));
}

#[test]
fn test_kiwipete_moves() {
    // Kiwipete position - complex with many move types
    let pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let moves = StandardRules.legal_moves(&pos);
    assert_eq!(moves.len(), 48);
    // Castling is listed as the king's two-square step.
    assert!(moves.contains(&mv("e1g1")));
    assert!(moves.contains(&mv("e1c1")));
}

#[test]
fn test_is_legal_agrees_with_legal_moves() {
    let pos = Position::startpos();
    let rules = StandardRules;
    for m in rules.legal_moves(&pos) {
        assert!(rules.is_legal(&pos, &m), "{m} should be legal");
    }
    assert!(!rules.is_legal(&pos, &mv("e2e5")));
    assert!(!rules.is_legal(&pos, &mv("e7e5")));
    assert!(!rules.is_legal(&pos, &mv("e2e4q")));

    // Italian game, White ready to castle short.
    let mut castling = Position::startpos();
    for m in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"] {
        castling = rules.apply(&castling, &mv(m)).unwrap();
    }
    let listed = rules.legal_moves(&castling);
    for m in &listed {
        assert!(rules.is_legal(&castling, m), "{m} should be legal");
    }
    assert!(listed.contains(&mv("e1g1")));
    assert!(rules.is_legal(&castling, &mv("e1g1")));
    assert!(!listed.contains(&mv("e1h1")));
    assert!(!rules.is_legal(&castling, &mv("e1h1")));
}

#[test]
fn test_apply_is_pure() {
    let pos = Position::startpos();
    let next = StandardRules.apply(&pos, &mv("e2e4")).unwrap();

    assert_eq!(pos.fen(), STARTING_FEN);
    assert_eq!(
        next.fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
}

#[test]
fn test_apply_rejects_illegal_move() {
    let pos = Position::startpos();
    let err = StandardRules.apply(&pos, &mv("e1e2")).unwrap_err();
    assert!(matches!(err, RulesError::IllegalMove { .. }));
}

#[test]
fn test_promotion_requires_piece() {
    let pos = Position::from_fen("8/4P3/8/8/8/k7/8/4K3 w - - 0 1").unwrap();
    let rules = StandardRules;
    assert!(!rules.is_legal(&pos, &mv("e7e8")));
    let promoted = rules.apply(&pos, &mv("e7e8n")).unwrap();
    assert_eq!(promoted.fen(), "4N3/8/8/8/8/k7/8/4K3 b - - 0 1");
}

#[test]
fn test_castling_stored_in_king_step_form() {
    let pos =
        Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let next = StandardRules.apply(&pos, &mv("e1g1")).unwrap();
    assert_eq!(next.last_move(), Some(mv("e1g1")));
    assert!(next.fen().starts_with("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 b kq"));
}

#[test]
fn test_castling_onto_rook_square_refused() {
    let pos =
        Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    for m in ["e1h1", "e1a1"] {
        let err = StandardRules.apply(&pos, &mv(m)).unwrap_err();
        assert!(matches!(err, RulesError::IllegalMove { .. }), "{m}");
        assert_eq!(StandardRules.san(&pos, &mv(m)), None);
    }
}

#[test]
fn test_no_moves_and_check_predicates() {
    // Fool's mate: white is checkmated.
    let mated =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
    assert!(StandardRules.is_terminal_no_moves(&mated));
    assert!(StandardRules.is_check(&mated));

    let stalemate = Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(StandardRules.is_terminal_no_moves(&stalemate));
    assert!(!StandardRules.is_check(&stalemate));
}

#[test]
fn test_san_of_legal_moves() {
    let pos = Position::startpos();
    assert_eq!(StandardRules.san(&pos, &mv("g1f3")).as_deref(), Some("Nf3"));
    assert_eq!(StandardRules.san(&pos, &mv("e2e4")).as_deref(), Some("e4"));
    assert_eq!(StandardRules.san(&pos, &mv("e2e5")), None);
}

#[test]
fn test_san_marks_mate() {
    let pos = Position::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
        .unwrap();
    assert_eq!(StandardRules.san(&pos, &mv("d8h4")).as_deref(), Some("Qh4#"));
}
