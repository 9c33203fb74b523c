//! The one capability the referee needs from a mover: turn a request into
//! text.

use std::time::Instant;

use chess_core::{BoardState, Color, EngineError, move_to_uci};
use thiserror::Error;

/// Everything a mover is shown for one attempt.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub side: Color,
    pub fen: String,
    /// Unicode board drawing with coordinates.
    pub diagram: String,
    /// Movetext of the game so far (`1. e4 e5 2. Nf3`).
    pub history: String,
    /// Zobrist hash of every position reached so far, current one last.
    pub position_hashes: Vec<u64>,
    pub legal_moves_uci: Vec<String>,
    /// Why the previous attempt this turn was refused.
    pub previous_failure: Option<String>,
    /// 1-based attempt number within the turn.
    pub attempt: u32,
    /// Replies after this instant are discarded.
    pub deadline: Option<Instant>,
}

impl MoveRequest {
    pub fn for_state(board: &BoardState, history: String) -> Self {
        Self {
            side: board.side_to_move(),
            fen: board.to_fen(),
            diagram: board.position().render_diagram(),
            history,
            position_hashes: board.history().to_vec(),
            legal_moves_uci: board.legal_moves().into_iter().map(move_to_uci).collect(),
            previous_failure: None,
            attempt: 1,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("agent did not answer in time")]
    Timeout,
    #[error("scripted agent has no replies left")]
    ScriptExhausted,
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("agent unavailable: {0}")]
    Unavailable(String),
    #[error("model client failed: {0}")]
    Client(String),
}

/// A move proposer. Implementations are independent types; the referee
/// trusts nothing they return.
pub trait Agent: Send {
    fn name(&self) -> &str;

    /// Raw text for the requested move. May be prose, notation, or nonsense.
    fn propose(&mut self, request: &MoveRequest) -> Result<String, AgentError>;

    /// Called once before the first request of a game.
    fn new_game(&mut self) {}
}
