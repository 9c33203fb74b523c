use std::time::Duration;

use chess_core::{Difficulty, Engine, Position, move_to_uci, to_san};

use crate::agent::{Agent, AgentError, MoveRequest};

/// Time kept back from the referee's deadline for rendering and hand-off.
const DEADLINE_MARGIN: Duration = Duration::from_millis(20);

/// How an engine-backed agent writes its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveNotation {
    #[default]
    San,
    Uci,
}

/// Adapts an [`Engine`] to the text boundary.
pub struct EngineAgent {
    engine: Box<dyn Engine>,
    difficulty: Difficulty,
    notation: MoveNotation,
}

impl EngineAgent {
    pub fn new(engine: Box<dyn Engine>, difficulty: Difficulty) -> Self {
        Self {
            engine,
            difficulty,
            notation: MoveNotation::default(),
        }
    }

    pub fn with_notation(mut self, notation: MoveNotation) -> Self {
        self.notation = notation;
        self
    }
}

impl Agent for EngineAgent {
    fn name(&self) -> &str {
        self.engine.name()
    }

    fn propose(&mut self, request: &MoveRequest) -> Result<String, AgentError> {
        let pos = Position::from_fen(&request.fen)
            .map_err(|e| AgentError::Unavailable(format!("unreadable position: {e}")))?;
        self.engine.set_history(&request.position_hashes);
        self.engine.set_deadline(
            request
                .deadline
                .map(|d| d.checked_sub(DEADLINE_MARGIN).unwrap_or(d)),
        );
        let mv = self.engine.best_move(&pos, self.difficulty)?;
        Ok(match self.notation {
            MoveNotation::San => to_san(&pos, mv),
            MoveNotation::Uci => move_to_uci(mv),
        })
    }

    fn new_game(&mut self) {
        self.engine.new_game();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
