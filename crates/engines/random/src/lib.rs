//! Random Move Chess Engine
//!
//! Selects moves uniformly at random from all legal moves. Any real mover
//! should beat it; it is mostly useful for exercising the referee loop.

use chess_core::{Difficulty, Engine, EngineError, Move, Position, legal_moves_into};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;

/// A chess engine that plays random legal moves.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible move sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn best_move(&mut self, pos: &Position, _difficulty: Difficulty) -> Result<Move, EngineError> {
        let mut pos_copy = pos.clone();
        let mut moves = Vec::with_capacity(64);
        legal_moves_into(&mut pos_copy, &mut moves);

        moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(EngineError::NoLegalMoves)
    }

    fn evaluate(&mut self, _pos: &Position) -> Result<i32, EngineError> {
        Ok(0)
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
