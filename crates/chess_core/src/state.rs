//! Game-level board state: a [`Position`] plus the hash history needed for
//! repetition detection.

use crate::board::Position;
use crate::error::{BoardError, FenError};
use crate::movegen::legal_moves;
use crate::san::move_to_uci;
use crate::types::{Color, Move};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    position: Position,
    /// Hash of every position reached so far, current one last.
    history: Vec<u64>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Position::from_fen(fen).map(Self::from_position)
    }

    pub fn from_position(position: Position) -> Self {
        let history = vec![position.position_hash()];
        Self { position, history }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position)
    }

    pub fn in_check(&self) -> bool {
        self.position.in_check(self.position.side_to_move)
    }

    /// Returns the state after `mv`. Only moves produced by the oracle for
    /// this state are accepted; anything else is a caller bug.
    pub fn apply(&self, mv: Move) -> Result<BoardState, BoardError> {
        if !self.legal_moves().contains(&mv) {
            return Err(BoardError::InvalidMoveApplication {
                uci: move_to_uci(mv),
                fen: self.to_fen(),
            });
        }
        let mut position = self.position.clone();
        position.make_move(mv);
        let mut history = self.history.clone();
        history.push(position.position_hash());
        Ok(BoardState { position, history })
    }

    pub fn hash(&self) -> u64 {
        self.history
            .last()
            .copied()
            .unwrap_or_else(|| self.position.position_hash())
    }

    /// How many times the current position has occurred, this time included.
    pub fn repetition_count(&self) -> usize {
        let current = self.hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    pub fn is_terminal_by_counters(&self) -> bool {
        self.position.is_fifty_move_draw() || self.repetition_count() >= 3
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
