//! Rendering moves as text: standard algebraic notation and UCI coordinates.

use crate::board::Position;
use crate::movegen::legal_moves;
use crate::types::*;

pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(letter) = mv.promo.and_then(PieceKind::san_letter) {
        s.push(letter.to_ascii_lowercase());
    }
    s
}

/// SAN for `mv`, which must be legal in `pos`.
///
/// Disambiguates by file first, then rank, then both, and appends `+` or
/// `#` according to the position after the move.
pub fn to_san(pos: &Position, mv: Move) -> String {
    let mut san = match mv.castle {
        Some(CastleSide::Kingside) => "O-O".to_string(),
        Some(CastleSide::Queenside) => "O-O-O".to_string(),
        None => body(pos, mv),
    };

    let mut next = pos.clone();
    next.make_move(mv);
    if next.in_check(next.side_to_move) {
        if legal_moves(&next).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

fn body(pos: &Position, mv: Move) -> String {
    let mut san = String::with_capacity(7);

    match mv.piece.san_letter() {
        Some(letter) => {
            san.push(letter);
            san.push_str(&disambiguation(pos, mv));
            if mv.is_capture {
                san.push('x');
            }
        }
        None => {
            if mv.is_capture {
                san.push((b'a' + (mv.from % 8)) as char);
                san.push('x');
            }
        }
    }

    san.push_str(&sq_to_coord(mv.to));

    if let Some(letter) = mv.promo.and_then(PieceKind::san_letter) {
        san.push('=');
        san.push(letter);
    }
    san
}

fn disambiguation(pos: &Position, mv: Move) -> String {
    let rivals: Vec<u8> = legal_moves(pos)
        .into_iter()
        .filter(|o| o.piece == mv.piece && o.to == mv.to && o.from != mv.from)
        .map(|o| o.from)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }

    let coord = sq_to_coord(mv.from);
    let same_file = rivals.iter().any(|&s| file_of(s) == file_of(mv.from));
    let same_rank = rivals.iter().any(|&s| rank_of(s) == rank_of(mv.from));
    match (same_file, same_rank) {
        (false, _) => coord[..1].to_string(),
        (true, false) => coord[1..].to_string(),
        (true, true) => coord,
    }
}

#[cfg(test)]
#[path = "san_tests.rs"]
mod san_tests;
