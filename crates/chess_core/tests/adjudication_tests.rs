//! End-of-game detection through `adjudicate`.

use chess_core::{
    BoardState, Color, DrawReason, Outcome, Position, WinReason, adjudicate, legal_moves_into,
    move_to_uci,
};

fn state(fen: &str) -> BoardState {
    BoardState::from_fen(fen).unwrap()
}

fn play(state: &BoardState, uci: &str) -> BoardState {
    let mv = state
        .legal_moves()
        .into_iter()
        .find(|m| move_to_uci(*m) == uci)
        .unwrap_or_else(|| panic!("{uci} not legal"));
    state.apply(mv).unwrap()
}

// =============================================================================
// Positions without legal moves
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    let s = state("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert!(s.legal_moves().is_empty());
    assert!(!s.in_check());
    assert_eq!(
        adjudicate(&s),
        Some(Outcome::Draw {
            reason: DrawReason::Stalemate
        })
    );
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let pos = Position::from_fen("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut scratch = pos.clone();
    let mut moves = Vec::new();
    legal_moves_into(&mut scratch, &mut moves);
    assert!(moves.is_empty());
    assert!(!pos.in_check(Color::Black));
}

#[test]
fn test_scholars_mate_is_checkmate() {
    let s = state("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    assert_eq!(
        adjudicate(&s),
        Some(Outcome::Decisive {
            winner: Color::White,
            reason: WinReason::Checkmate
        })
    );
}

#[test]
fn test_mate_beats_fifty_move_claim() {
    let s = state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 100 80");
    assert_eq!(
        adjudicate(&s).and_then(|o| o.winner()),
        Some(Color::White)
    );
}

#[test]
fn test_check_is_not_terminal() {
    let s = state("rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2");
    assert!(s.in_check());
    assert_eq!(adjudicate(&s), None);
}

// =============================================================================
// Counter-based draws
// =============================================================================

#[test]
fn test_fifty_move_rule_at_100_halfmoves() {
    let s = state("8/8/8/4k3/8/4K3/8/R7 w - - 100 60");
    assert_eq!(
        adjudicate(&s),
        Some(Outcome::Draw {
            reason: DrawReason::FiftyMove
        })
    );
    assert_eq!(adjudicate(&state("8/8/8/4k3/8/4K3/8/R7 w - - 99 60")), None);
}

#[test]
fn test_pawn_move_resets_halfmove_clock() {
    let s = state("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60");
    let next = play(&s, "e2e3");
    assert_eq!(next.halfmove_clock(), 0);
    assert!(!next.position().is_fifty_move_draw());
}

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut s = BoardState::new();
    for _ in 0..2 {
        assert_eq!(adjudicate(&s), None);
        for uci in ["b1c3", "b8c6", "c3b1", "c6b8"] {
            s = play(&s, uci);
        }
    }
    assert_eq!(s.repetition_count(), 3);
    assert_eq!(
        adjudicate(&s),
        Some(Outcome::Draw {
            reason: DrawReason::Repetition
        })
    );
}

#[test]
fn test_repetition_ignores_move_counters() {
    let a = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
        .unwrap();
    let b = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 6 5")
        .unwrap();
    assert_eq!(a.position_hash(), b.position_hash());
}

#[test]
fn test_hash_tracks_side_and_castling() {
    let base = Position::startpos().position_hash();
    let black = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
        .unwrap();
    let fewer_rights =
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
    assert_ne!(base, black.position_hash());
    assert_ne!(base, fewer_rights.position_hash());
}

// =============================================================================
// Insufficient material
// =============================================================================

fn insufficient(fen: &str) -> bool {
    Position::from_fen(fen).unwrap().is_insufficient_material()
}

#[test]
fn test_insufficient_material_minor_piece_endings() {
    assert!(insufficient("8/8/8/4k3/8/4K3/8/8 w - - 0 1"));
    assert!(insufficient("8/8/8/4k3/8/4KB2/8/8 w - - 0 1"));
    assert!(insufficient("8/8/8/4k3/8/4KN2/8/8 w - - 0 1"));
    assert!(insufficient("8/8/4n3/4k3/8/4K3/8/8 w - - 0 1"));
}

#[test]
fn test_same_color_bishops_are_insufficient() {
    // f8 and c1 are both dark squares.
    assert!(insufficient("5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1"));
    assert!(!insufficient("2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1"));
}

#[test]
fn test_sufficient_material() {
    assert!(!insufficient("8/8/8/4k3/8/4K3/4P3/8 w - - 0 1"));
    assert!(!insufficient("8/8/8/4k3/8/4K3/8/4R3 w - - 0 1"));
    assert!(!insufficient("8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1"));
    assert!(!insufficient("8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1"));
}

#[test]
fn test_adjudicate_reports_dead_position() {
    assert_eq!(
        adjudicate(&state("8/8/8/4k3/8/4K3/8/8 w - - 0 1")),
        Some(Outcome::Draw {
            reason: DrawReason::InsufficientMaterial
        })
    );
    assert_eq!(adjudicate(&BoardState::new()), None);
}
