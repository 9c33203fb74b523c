//! Error types for board setup and move application.

use thiserror::Error;

/// Errors produced while reading a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 FEN fields, found {0}")]
    MissingFields(usize),
    #[error("board section must have 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} describes {files} files")]
    FileCount { rank: usize, files: usize },
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),
    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),
    #[error("invalid en passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),
    #[error("{0:?} must have exactly one king")]
    KingCount(crate::types::Color),
    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Errors raised by [`BoardState`](crate::BoardState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// `apply` was handed a move that is not legal in the current position.
    /// Reaching this means the oracle and the board disagree.
    #[error("move {uci} is not legal in position {fen}")]
    InvalidMoveApplication { uci: String, fen: String },
}

/// Failures of an [`Engine`](crate::Engine) collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no legal moves in position")]
    NoLegalMoves,
    #[error("engine returned an unusable move: {0}")]
    BadMove(String),
    #[error("engine process failed: {0}")]
    Process(String),
}
