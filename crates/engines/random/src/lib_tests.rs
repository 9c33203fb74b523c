use super::*;
use chess_core::legal_moves;

#[test]
fn random_engine_returns_legal_move() {
    let mut engine = RandomEngine::new();
    let pos = Position::startpos();

    let mv = engine.best_move(&pos, Difficulty::default()).unwrap();

    assert!(legal_moves(&pos).contains(&mv));
}

#[test]
fn random_engine_handles_checkmate() {
    let mut engine = RandomEngine::new();
    let pos =
        Position::from_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1")
            .unwrap();

    assert_eq!(
        engine.best_move(&pos, Difficulty::default()),
        Err(EngineError::NoLegalMoves)
    );
}

#[test]
fn random_engine_handles_stalemate() {
    let mut engine = RandomEngine::new();
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1").unwrap();

    assert!(engine.best_move(&pos, Difficulty::default()).is_err());
}

#[test]
fn seeded_engines_agree() {
    let pos = Position::startpos();
    let mut a = RandomEngine::seeded(7);
    let mut b = RandomEngine::seeded(7);
    for _ in 0..5 {
        assert_eq!(
            a.best_move(&pos, Difficulty::default()),
            b.best_move(&pos, Difficulty::default())
        );
    }
}
