//! Resolves a [`Candidate`] against the legal moves of a position.
//!
//! The move generator is the single source of truth: a candidate is accepted
//! only when it names exactly one member of [`legal_moves`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Position;
use crate::candidate::Candidate;
use crate::movegen::legal_moves;
use crate::types::{Move, PieceKind, file_of, rank_of};

/// Why a syntactically valid candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("no legal move matches")]
    NoMatchingLegalMove,
    #[error("several promotions match; name the promotion piece")]
    AmbiguousWithoutPromotionChoice,
    #[error("several pieces can make that move; disambiguate the origin")]
    AmbiguousOrigin,
    #[error("no piece of the side to move can make that move")]
    MovingPieceAbsent,
    #[error("that move belongs to the side not on move")]
    WrongSideToMove,
}

/// Matches `candidate` against the legal moves of `pos`.
pub fn validate(pos: &Position, candidate: &Candidate) -> Result<Move, Rejection> {
    let matches = matching_moves(pos, candidate);

    match matches.as_slice() {
        [] => Err(diagnose(pos, candidate)),
        [only] => Ok(*only),
        [first, rest @ ..] => {
            if rest
                .iter()
                .all(|m| m.from == first.from && m.to == first.to)
            {
                Err(Rejection::AmbiguousWithoutPromotionChoice)
            } else {
                Err(Rejection::AmbiguousOrigin)
            }
        }
    }
}

fn matching_moves(pos: &Position, candidate: &Candidate) -> Vec<Move> {
    legal_moves(pos)
        .into_iter()
        .filter(|mv| matches_candidate(candidate, mv))
        .collect()
}

fn matches_candidate(candidate: &Candidate, mv: &Move) -> bool {
    match *candidate {
        Candidate::Castle { side } => mv.castle == Some(side),
        Candidate::Coordinate {
            from,
            to,
            promotion,
        } => mv.from == from && mv.to == to && promotion_agrees(promotion, mv),
        Candidate::San {
            piece,
            from_file,
            from_rank,
            to,
            promotion,
            capture,
        } => {
            mv.piece == piece
                && mv.to == to
                && mv.castle.is_none()
                && from_file.is_none_or(|f| file_of(mv.from) == f as i8)
                && from_rank.is_none_or(|r| rank_of(mv.from) == r as i8)
                && promotion_agrees(promotion, mv)
                && (piece != PieceKind::Pawn || pawn_capture_agrees(from_file, capture, mv))
        }
    }
}

/// Pawns change file exactly when they capture, so a bare `d5` is a push
/// and only `xd5` or `exd5` (or the loose `ed5`) can name a capture.
fn pawn_capture_agrees(from_file: Option<u8>, capture: bool, mv: &Move) -> bool {
    if capture || from_file.is_some_and(|f| f as i8 != file_of(mv.to)) {
        mv.is_capture
    } else {
        !mv.is_capture
    }
}

/// A named promotion must match; an omitted one leaves the choice open,
/// which `validate` reports as ambiguous when it matters.
fn promotion_agrees(promotion: Option<PieceKind>, mv: &Move) -> bool {
    match promotion {
        Some(kind) => mv.promo == Some(kind),
        None => true,
    }
}

fn diagnose(pos: &Position, candidate: &Candidate) -> Rejection {
    let mut flipped = pos.clone();
    flipped.side_to_move = pos.side_to_move.other();
    flipped.en_passant = None;
    let legal_for_opponent = !matching_moves(&flipped, candidate).is_empty();

    match *candidate {
        Candidate::Coordinate { from, .. } => match pos.piece_at(from) {
            None => Rejection::MovingPieceAbsent,
            Some(pc) if pc.color != pos.side_to_move => Rejection::WrongSideToMove,
            Some(_) => Rejection::NoMatchingLegalMove,
        },
        Candidate::San {
            piece,
            from_file,
            from_rank,
            ..
        } => {
            if legal_for_opponent {
                return Rejection::WrongSideToMove;
            }
            let own_piece_exists = (0..64u8).any(|s| {
                pos.piece_at(s).is_some_and(|pc| {
                    pc.color == pos.side_to_move
                        && pc.kind == piece
                        && from_file.is_none_or(|f| file_of(s) == f as i8)
                        && from_rank.is_none_or(|r| rank_of(s) == r as i8)
                })
            });
            if own_piece_exists {
                Rejection::NoMatchingLegalMove
            } else {
                Rejection::MovingPieceAbsent
            }
        }
        Candidate::Castle { .. } => {
            if legal_for_opponent {
                Rejection::WrongSideToMove
            } else {
                Rejection::NoMatchingLegalMove
            }
        }
    }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod oracle_tests;
