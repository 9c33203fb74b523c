pub mod board;
pub mod candidate;
pub mod error;
pub mod movegen;
pub mod oracle;
pub mod outcome;
pub mod perft;
pub mod san;
pub mod state;
pub mod types;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use board::*;
pub use candidate::Candidate;
pub use error::{BoardError, EngineError, FenError};
pub use movegen::*;
pub use oracle::{Rejection, validate};
pub use outcome::*;
pub use perft::{perft, perft_divide};
pub use san::{move_to_uci, to_san};
pub use state::BoardState;
pub use types::*;
pub use zobrist::ZOBRIST;

use std::time::Instant;

use serde::{Deserialize, Serialize};

// =============================================================================
// Engine trait
// =============================================================================

/// Strength setting handed to an engine. In-process searchers read a depth;
/// UCI engines that support `UCI_LimitStrength` read an Elo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Depth(u8),
    Elo(u16),
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Depth(3)
    }
}

/// A chess engine used as an opponent or as a reference evaluator.
///
/// Implementations own their search; the referee only asks for a move or a
/// score and never looks inside.
pub trait Engine: Send {
    /// Best move for the side to move in `pos` at the requested strength.
    fn best_move(&mut self, pos: &Position, difficulty: Difficulty) -> Result<Move, EngineError>;

    /// Static or shallow evaluation in centipawns from the side to move's
    /// point of view.
    fn evaluate(&mut self, pos: &Position) -> Result<i32, EngineError>;

    /// Returns the engine's name for transcripts and logs
    fn name(&self) -> &str;

    /// Hashes of every position reached this game, current one last.
    /// Engines that do not track repetitions ignore it.
    fn set_history(&mut self, _hashes: &[u64]) {}

    /// The next `best_move` should return by `deadline`. `None` lifts it.
    fn set_deadline(&mut self, _deadline: Option<Instant>) {}

    /// Reset internal state for a new game (clear hash tables, history, etc.)
    fn new_game(&mut self) {}
}
