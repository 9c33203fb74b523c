use super::*;
use chess_core::{BoardState, legal_moves, move_to_uci};

#[test]
fn best_move_is_legal() {
    let mut engine = ClassicalEngine::new();
    let pos = Position::startpos();
    let mv = engine.best_move(&pos, Difficulty::Depth(2)).unwrap();
    assert!(legal_moves(&pos).contains(&mv));
    assert!(engine.nodes() > 0);
}

#[test]
fn checkmated_side_has_no_move() {
    let mut engine = ClassicalEngine::new();
    let pos = Position::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
        .unwrap();
    assert_eq!(
        engine.best_move(&pos, Difficulty::Depth(2)),
        Err(EngineError::NoLegalMoves)
    );
}

#[test]
fn elo_maps_to_increasing_depth() {
    assert_eq!(depth_for_elo(800), 1);
    assert_eq!(depth_for_elo(1320), 2);
    assert_eq!(depth_for_elo(1500), 3);
    assert_eq!(depth_for_elo(3000), 5);
}

#[test]
fn history_is_cleared_for_new_game() {
    let mut engine = ClassicalEngine::new();
    engine.set_history(BoardState::new().history());
    assert_eq!(engine.history.len(), 1);
    engine.new_game();
    assert!(engine.history.is_empty());
}

/// Hash of the position after `uci` is played from `fen`.
fn hash_after(fen: &str, uci: &str) -> u64 {
    let mut pos = Position::from_fen(fen).unwrap();
    let mv = legal_moves(&pos)
        .into_iter()
        .find(|m| move_to_uci(*m) == uci)
        .unwrap();
    let _ = pos.make_move(mv);
    pos.position_hash()
}

#[test]
fn losing_side_steers_into_repetition() {
    // Down a queen; Kg1 is covered, so only Kg2 and Kh2 remain.
    let fen = "7k/q7/8/8/8/8/8/7K w - - 0 1";
    let pos = Position::from_fen(fen).unwrap();
    let here = pos.position_hash();

    for target in ["h1g2", "h1h2"] {
        let seen = hash_after(fen, target);
        let mut engine = ClassicalEngine::new();
        engine.set_history(&[seen, here, seen, here]);
        let mv = engine.best_move(&pos, Difficulty::Depth(2)).unwrap();
        assert_eq!(move_to_uci(mv), target);
    }
}

#[test]
fn expired_deadline_still_returns_a_legal_move() {
    let mut engine = ClassicalEngine::new();
    let pos = Position::startpos();
    engine.set_deadline(Some(Instant::now()));
    let mv = engine.best_move(&pos, Difficulty::Depth(8)).unwrap();
    assert!(legal_moves(&pos).contains(&mv));
    // A depth-8 search from the start runs to millions of nodes.
    assert!(engine.nodes() < 100_000, "searched {} nodes", engine.nodes());

    engine.new_game();
    assert_eq!(engine.deadline, None);
}

#[test]
fn evaluate_matches_material() {
    let mut engine = ClassicalEngine::with_move_time(Duration::from_millis(50));
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
    assert_eq!(engine.evaluate(&pos), Ok(900));
}
