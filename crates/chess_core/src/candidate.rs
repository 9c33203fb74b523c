//! Unvalidated move intentions, as read from text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CastleSide, PieceKind, sq_to_coord};

/// A move as some mover described it. Nothing about a candidate is known to
/// be legal; [`validate`](crate::validate) resolves it against a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "notation", rename_all = "snake_case")]
pub enum Candidate {
    /// `O-O` / `O-O-O` (or the `0-0` spelling).
    Castle { side: CastleSide },
    /// Coordinate notation such as `e2e4` or `e7e8q`.
    Coordinate {
        from: u8,
        to: u8,
        promotion: Option<PieceKind>,
    },
    /// Standard algebraic notation. `from_file` / `from_rank` hold the
    /// disambiguation hints, zero-based.
    San {
        piece: PieceKind,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        to: u8,
        promotion: Option<PieceKind>,
        capture: bool,
    },
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Candidate::Castle {
                side: CastleSide::Kingside,
            } => write!(f, "O-O"),
            Candidate::Castle {
                side: CastleSide::Queenside,
            } => write!(f, "O-O-O"),
            Candidate::Coordinate {
                from,
                to,
                promotion,
            } => {
                write!(f, "{}{}", sq_to_coord(from), sq_to_coord(to))?;
                if let Some(p) = promotion.and_then(PieceKind::san_letter) {
                    write!(f, "{}", p.to_ascii_lowercase())?;
                }
                Ok(())
            }
            Candidate::San {
                piece,
                from_file,
                from_rank,
                to,
                promotion,
                capture,
            } => {
                if let Some(letter) = piece.san_letter() {
                    write!(f, "{letter}")?;
                }
                if let Some(file) = from_file {
                    write!(f, "{}", (b'a' + file) as char)?;
                }
                if let Some(rank) = from_rank {
                    write!(f, "{}", (b'1' + rank) as char)?;
                }
                if capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", sq_to_coord(to))?;
                if let Some(p) = promotion.and_then(PieceKind::san_letter) {
                    write!(f, "={p}")?;
                }
                Ok(())
            }
        }
    }
}
