use super::*;
use crate::types::{Color, PieceKind};
use crate::Position;

#[test]
fn test_zobrist_keys_unique() {
    let mut seen = std::collections::HashSet::new();

    for piece in 0..12 {
        for sq in 0..64 {
            assert!(seen.insert(ZOBRIST.pieces[piece][sq]), "Duplicate piece key");
        }
    }
    assert!(seen.insert(ZOBRIST.side_to_move), "Side to move key collision");
    for key in ZOBRIST.castling {
        assert!(seen.insert(key), "Castling key collision");
    }
    for key in ZOBRIST.en_passant {
        assert!(seen.insert(key), "En passant key collision");
    }
}

#[test]
fn test_piece_key_depends_on_color_and_square() {
    let white = Piece::new(Color::White, PieceKind::Knight);
    let black = Piece::new(Color::Black, PieceKind::Knight);
    assert_ne!(ZOBRIST.piece_key(white, 6), ZOBRIST.piece_key(white, 21));
    assert_ne!(ZOBRIST.piece_key(white, 6), ZOBRIST.piece_key(black, 6));
}

#[test]
fn test_hash_ignores_move_counters() {
    let a = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
        .unwrap();
    let b = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 6 5")
        .unwrap();
    assert_eq!(a.position_hash(), b.position_hash());
}
