use super::*;
use chess_core::{Position, move_to_uci};

#[test]
fn test_pick_best_move_start_position() {
    let pos = Position::startpos();
    let mut nodes = 0;
    let result = pick_best_move(&pos, 3, &[], None, &mut nodes);
    assert!(result.best_move.is_some());
    assert!(!result.stopped);
    assert!(nodes > 0);
}

#[test]
fn test_pick_best_move_finds_back_rank_mate() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1").unwrap();
    let mut nodes = 0;
    let result = pick_best_move(&pos, 2, &[], None, &mut nodes);
    let (mv, score) = result.best_move.unwrap();
    assert_eq!(move_to_uci(mv), "e1e8");
    assert!(score > 90_000);
}

#[test]
fn test_pick_best_move_takes_hanging_queen() {
    let pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
    let mut nodes = 0;
    let (mv, _) = pick_best_move(&pos, 2, &[], None, &mut nodes).best_move.unwrap();
    assert_eq!(move_to_uci(mv), "d1d5");
}

#[test]
fn test_no_moves_means_no_best_move() {
    let pos = Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    let mut nodes = 0;
    assert!(pick_best_move(&pos, 2, &[], None, &mut nodes).best_move.is_none());
}

#[test]
fn test_expired_deadline_still_returns_a_move() {
    let pos = Position::startpos();
    let mut nodes = 0;
    let result = pick_best_move(&pos, 6, &[], Some(Instant::now()), &mut nodes);
    assert!(result.best_move.is_some());
    assert!(result.stopped);
}
