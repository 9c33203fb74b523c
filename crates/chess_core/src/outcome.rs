//! Game results and the adjudicator that detects them from a board state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::BoardState;
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    Checkmate,
    /// The loser used up its retry budget without producing a legal move.
    ForfeitByIllegalMoveExhaustion,
    Resignation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    FiftyMove,
    Repetition,
    InsufficientMaterial,
    /// The configured ply cap was reached.
    MoveLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    Cancelled,
    WallClockBudget,
}

/// How a game ended. `Aborted` sits outside the normal win/draw taxonomy:
/// the game was stopped, not decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Decisive { winner: Color, reason: WinReason },
    Draw { reason: DrawReason },
    Aborted { reason: AbortReason },
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// PGN result tag.
    pub fn result_tag(&self) -> &'static str {
        match self {
            Outcome::Decisive {
                winner: Color::White,
                ..
            } => "1-0",
            Outcome::Decisive {
                winner: Color::Black,
                ..
            } => "0-1",
            Outcome::Draw { .. } => "1/2-1/2",
            Outcome::Aborted { .. } => "*",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Decisive { winner, reason } => {
                let how = match reason {
                    WinReason::Checkmate => "checkmate",
                    WinReason::ForfeitByIllegalMoveExhaustion => "forfeit (illegal moves)",
                    WinReason::Resignation => "resignation",
                };
                write!(f, "{winner} wins by {how}")
            }
            Outcome::Draw { reason } => {
                let how = match reason {
                    DrawReason::Stalemate => "stalemate",
                    DrawReason::FiftyMove => "fifty-move rule",
                    DrawReason::Repetition => "threefold repetition",
                    DrawReason::InsufficientMaterial => "insufficient material",
                    DrawReason::MoveLimit => "move limit",
                };
                write!(f, "draw by {how}")
            }
            Outcome::Aborted { reason } => match reason {
                AbortReason::Cancelled => write!(f, "aborted (cancelled)"),
                AbortReason::WallClockBudget => write!(f, "aborted (time budget)"),
            },
        }
    }
}

/// Checks the position for a rules-based end of game.
///
/// Positions without legal moves are decided first: mate or stalemate ends
/// the game before any counter-based draw could be claimed.
pub fn adjudicate(state: &BoardState) -> Option<Outcome> {
    if state.legal_moves().is_empty() {
        return Some(if state.in_check() {
            Outcome::Decisive {
                winner: state.side_to_move().other(),
                reason: WinReason::Checkmate,
            }
        } else {
            Outcome::Draw {
                reason: DrawReason::Stalemate,
            }
        });
    }

    if state.is_terminal_by_counters() {
        let reason = if state.position().is_fifty_move_draw() {
            DrawReason::FiftyMove
        } else {
            DrawReason::Repetition
        };
        return Some(Outcome::Draw { reason });
    }

    if state.is_insufficient_material() {
        return Some(Outcome::Draw {
            reason: DrawReason::InsufficientMaterial,
        });
    }

    None
}
