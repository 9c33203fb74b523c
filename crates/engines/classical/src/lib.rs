//! Classical Chess Engine
//!
//! Alpha-beta search with material-based evaluation. Serves as the in-process
//! opponent for refereed games and as a reference evaluator.

mod eval;
mod search;

use std::time::{Duration, Instant};

use chess_core::{Difficulty, Engine, EngineError, Move, Position};
use tracing::debug;

pub use eval::evaluate;
pub use search::{SearchOutcome, pick_best_move};

/// Depth used when a caller asks for an Elo rating instead of a depth.
pub fn depth_for_elo(elo: u16) -> u8 {
    match elo {
        0..1000 => 1,
        1000..1400 => 2,
        1400..1800 => 3,
        1800..2200 => 4,
        _ => 5,
    }
}

/// Classical chess engine using negamax with alpha-beta pruning.
#[derive(Debug, Clone, Default)]
pub struct ClassicalEngine {
    /// Optional wall-clock cap per move.
    move_time: Option<Duration>,
    /// Caller's deadline for the next move.
    deadline: Option<Instant>,
    /// Hashes of positions seen this game, for repetition-aware search.
    history: Vec<u64>,
    /// Node counter for statistics
    nodes: u64,
}

impl ClassicalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_move_time(move_time: Duration) -> Self {
        Self {
            move_time: Some(move_time),
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }
}

impl Engine for ClassicalEngine {
    fn best_move(&mut self, pos: &Position, difficulty: Difficulty) -> Result<Move, EngineError> {
        let depth = match difficulty {
            Difficulty::Depth(d) => d.max(1),
            Difficulty::Elo(elo) => depth_for_elo(elo),
        };
        let capped = self.move_time.map(|t| Instant::now() + t);
        let deadline = [capped, self.deadline].into_iter().flatten().min();

        self.nodes = 0;
        let outcome = pick_best_move(pos, depth, &self.history, deadline, &mut self.nodes);
        debug!(
            depth,
            nodes = self.nodes,
            stopped = outcome.stopped,
            "classical search finished"
        );

        outcome
            .best_move
            .map(|(mv, _)| mv)
            .ok_or(EngineError::NoLegalMoves)
    }

    fn evaluate(&mut self, pos: &Position) -> Result<i32, EngineError> {
        Ok(evaluate(pos))
    }

    fn name(&self) -> &str {
        "Classical v1.0"
    }

    fn set_history(&mut self, hashes: &[u64]) {
        self.history.clear();
        self.history.extend_from_slice(hashes);
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    fn new_game(&mut self) {
        self.nodes = 0;
        self.deadline = None;
        self.history.clear();
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
