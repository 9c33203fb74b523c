//! Game-level cancellation: an external stop flag plus an optional
//! wall-clock budget, polled by the controller between transitions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chess_core::AbortReason;

/// Cloneable handle that stops a running game from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    stopped: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct GameClock {
    token: CancelToken,
    budget: Option<Duration>,
    started: Option<Instant>,
}

impl GameClock {
    pub fn new(budget: Option<Duration>) -> Self {
        Self::with_token(budget, CancelToken::new())
    }

    pub fn with_token(budget: Option<Duration>, token: CancelToken) -> Self {
        Self {
            token,
            budget,
            started: None,
        }
    }

    /// Starts the budget. Calling it again has no effect.
    pub fn start(&mut self) {
        self.started.get_or_insert_with(Instant::now);
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.started
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Remaining budget (None if no budget).
    pub fn remaining(&self) -> Option<Duration> {
        let budget = self.budget?;
        Some(budget.saturating_sub(self.elapsed()))
    }

    /// Why the game must stop now, if it must. Cancellation wins over an
    /// exhausted budget.
    pub fn check(&self) -> Option<AbortReason> {
        if self.token.is_cancelled() {
            return Some(AbortReason::Cancelled);
        }
        if let Some(budget) = self.budget
            && self.started.is_some()
            && self.elapsed() >= budget
        {
            return Some(AbortReason::WallClockBudget);
        }
        None
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
