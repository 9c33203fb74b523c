use crate::board::{
    DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, ORTHOGONALS, Position, castle_rook_squares,
};
use crate::types::*;

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the position only once.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_legal_moves_into(pos, out);

    let mover = pos.side_to_move;
    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

/// Moves that obey piece movement rules but may leave the mover's own king
/// attacked. Castling is already filtered for passing through check.
pub fn pseudo_legal_moves_into(pos: &Position, out: &mut Vec<Move>) {
    for from in 0..64u8 {
        let pc = match pos.piece_at(from) {
            Some(p) => p,
            None => continue,
        };
        if pc.color != pos.side_to_move {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, pc.color, out),
            PieceKind::Knight => gen_steps(pos, from, pc, &KNIGHT_DELTAS, out),
            PieceKind::Bishop => gen_slider(pos, from, pc, &DIAGONALS, out),
            PieceKind::Rook => gen_slider(pos, from, pc, &ORTHOGONALS, out),
            PieceKind::Queen => {
                gen_slider(pos, from, pc, &DIAGONALS, out);
                gen_slider(pos, from, pc, &ORTHOGONALS, out);
            }
            PieceKind::King => {
                gen_steps(pos, from, pc, &KING_DELTAS, out);
                gen_castle(pos, from, pc.color, out);
            }
        }
    }
}

fn push_pawn_move(mv: Move, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(mv.to) == promo_rank {
        for pk in PieceKind::PROMOTIONS {
            out.push(mv.promoting(pk));
        }
    } else {
        out.push(mv);
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);

    let (dir, start_rank, promo_rank): (i8, i8, i8) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(Move::new(from, to, PieceKind::Pawn), promo_rank, out);

        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2, PieceKind::Pawn));
        }
    }

    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != c => {
                push_pawn_move(Move::new(from, to, PieceKind::Pawn).capture(), promo_rank, out);
            }
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to, PieceKind::Pawn).capture();
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_steps(pos: &Position, from: u8, pc: Piece, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to, pc.kind)),
                Some(other) if other.color != pc.color => {
                    out.push(Move::new(from, to, pc.kind).capture())
                }
                _ => {}
            }
        }
    }
}

fn gen_slider(pos: &Position, from: u8, pc: Piece, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to, pc.kind)),
                Some(other) if other.color != pc.color => {
                    out.push(Move::new(from, to, pc.kind).capture());
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let home = match c {
        Color::White => 4u8,
        Color::Black => 60u8,
    };
    if from != home || pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if !pos.castling.allows(c, side) {
            continue;
        }
        let (rook_from, _) = castle_rook_squares(c, side);
        if pos.piece_at(rook_from) != Some(Piece::new(c, PieceKind::Rook)) {
            continue;
        }
        // Squares between king and rook must be empty; the king may not
        // pass through or land on an attacked square.
        let (to, mut between, mut king_path) = match side {
            CastleSide::Kingside => (home + 2, home + 1..=home + 2, home + 1..=home + 2),
            CastleSide::Queenside => (home - 2, home - 3..=home - 1, home - 2..=home - 1),
        };
        if between.any(|s| pos.piece_at(s).is_some()) {
            continue;
        }
        if king_path.any(|s| pos.is_square_attacked(s, enemy)) {
            continue;
        }
        let mut mv = Move::new(from, to, PieceKind::King);
        mv.castle = Some(side);
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
