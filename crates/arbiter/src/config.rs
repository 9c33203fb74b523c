//! Per-game settings.
//!
//! The retry limit, move timeout and resignation handling are left to the
//! caller; only the retry limit has a default because a game cannot run
//! without one.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use chess_core::{BoardState, FenError};

pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// What to do when a mover writes "I resign" instead of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResignationPolicy {
    /// The game ends; the opponent wins by resignation.
    Accept,
    /// The text is recorded as a failed attempt like any unparsable reply.
    #[default]
    TreatAsFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Failed attempts allowed per turn. The mover forfeits on the
    /// `retry_limit`-th failure.
    pub retry_limit: u32,
    /// Replies arriving later than this count as a timed-out attempt.
    pub move_timeout_ms: Option<u64>,
    /// Total wall-clock budget for the game.
    pub game_budget_secs: Option<u64>,
    /// Plies after which the game is drawn by move limit.
    pub max_plies: Option<u32>,
    pub resignation: ResignationPolicy,
    /// Starting position; the standard one when absent.
    pub start_fen: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            move_timeout_ms: None,
            game_budget_secs: None,
            max_plies: None,
            resignation: ResignationPolicy::default(),
            start_fen: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("retry_limit must be at least 1")]
    ZeroRetryLimit,
    #[error("move_timeout_ms must be positive")]
    ZeroMoveTimeout,
    #[error("max_plies must be positive")]
    ZeroMaxPlies,
    #[error("invalid start_fen: {0}")]
    StartFen(#[from] FenError),
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }
        if self.move_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroMoveTimeout);
        }
        if self.max_plies == Some(0) {
            return Err(ConfigError::ZeroMaxPlies);
        }
        self.initial_state()?;
        Ok(())
    }

    pub fn move_timeout(&self) -> Option<Duration> {
        self.move_timeout_ms.map(Duration::from_millis)
    }

    pub fn game_budget(&self) -> Option<Duration> {
        self.game_budget_secs.map(Duration::from_secs)
    }

    pub fn initial_state(&self) -> Result<BoardState, FenError> {
        match &self.start_fen {
            Some(fen) => BoardState::from_fen(fen),
            None => Ok(BoardState::new()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
