//! The referee loop: asks the side to move for text, reads and validates
//! it, applies accepted moves and stops when the game is decided.
//!
//! Each call to [`GameController::step`] performs one transition of
//!
//! ```text
//! AwaitingMove(side) -> Validating -> Applying -> AwaitingMove(other)
//!                          |            |
//!                          |            +-> Terminal (mate, draw, move limit)
//!                          +-> AwaitingMove(side)   failed attempt, retry
//!                          +-> Terminal             forfeit or resignation
//! ```
//!
//! The board and transcript change only inside those transitions.

use std::time::{Duration, Instant};

use chess_core::{
    AbortReason, BoardError, BoardState, Candidate, Color, DrawReason, Move, Outcome, WinReason,
    adjudicate, move_to_uci, to_san, validate,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::agent::{Agent, AgentError, MoveRequest};
use crate::clock::{CancelToken, GameClock};
use crate::config::{ConfigError, GameConfig, ResignationPolicy};
use crate::interpreter::{Interpretation, interpret};
use crate::transcript::{AttemptFailure, PlayedMove, Transcript, TranscriptEntry, TranscriptFrozen};

/// A reply waiting to be read and checked.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub side: Color,
    pub attempt: u32,
    pub reply: Result<String, AgentError>,
    pub elapsed: Duration,
}

/// A reply that resolved to a legal move.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub side: Color,
    pub attempt: u32,
    pub raw: String,
    pub candidate: Candidate,
    pub mv: Move,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub enum LoopState {
    AwaitingMove(Color),
    Validating(Proposal),
    Applying(Accepted),
    Terminal(Outcome),
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Terminal(_))
    }
}

/// Failures that mean the referee itself is broken, never a mover's fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Internal(#[from] BoardError),
    #[error(transparent)]
    TranscriptFrozen(#[from] TranscriptFrozen),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    pub attempts: u32,
    pub moves: u32,
    /// Attempts that did not produce a legal move, timeouts included.
    pub failures: u32,
    pub timeouts: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub white: SideStats,
    pub black: SideStats,
    pub plies: u32,
    pub duration_ms: u64,
}

impl GameStats {
    pub fn side(&self, side: Color) -> &SideStats {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn side_mut(&mut self, side: Color) -> &mut SideStats {
        match side {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub id: Uuid,
    pub white: String,
    pub black: String,
    pub start_fen: String,
    pub final_fen: String,
    pub outcome: Outcome,
    pub transcript: Transcript,
    pub stats: GameStats,
}

impl GameReport {
    pub fn movetext(&self) -> String {
        self.transcript
            .movetext_with_result(self.outcome.result_tag())
    }
}

pub struct GameController<'a> {
    id: Uuid,
    config: GameConfig,
    white: &'a mut dyn Agent,
    black: &'a mut dyn Agent,
    board: BoardState,
    start_fen: String,
    transcript: Transcript,
    state: LoopState,
    clock: GameClock,
    stats: GameStats,
    started: bool,
    /// Failed attempts by the side to move in the current turn.
    turn_failures: u32,
    last_failure: Option<AttemptFailure>,
    span: tracing::Span,
}

impl<'a> GameController<'a> {
    pub fn new(
        config: GameConfig,
        white: &'a mut dyn Agent,
        black: &'a mut dyn Agent,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = config.initial_state()?;
        let id = Uuid::new_v4();
        let span = info_span!("game", game_id = %id, white = white.name(), black = black.name());
        let mut transcript = Transcript::new(board.fullmove_number(), board.side_to_move());

        let state = match adjudicate(&board) {
            Some(outcome) => {
                transcript.freeze();
                LoopState::Terminal(outcome)
            }
            None => LoopState::AwaitingMove(board.side_to_move()),
        };

        Ok(Self {
            id,
            clock: GameClock::new(config.game_budget()),
            config,
            white,
            black,
            start_fen: board.to_fen(),
            board,
            transcript,
            state,
            stats: GameStats::default(),
            started: false,
            turn_failures: 0,
            last_failure: None,
            span,
        })
    }

    /// Replaces the game clock, e.g. to share a cancel token with a batch.
    pub fn with_clock(mut self, clock: GameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.clock.token()
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            LoopState::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Performs one transition. Does nothing once the game is over.
    pub fn step(&mut self) -> Result<&LoopState, GameError> {
        let span = self.span.clone();
        let _enter = span.enter();

        if self.state.is_terminal() {
            return Ok(&self.state);
        }
        if let Some(reason) = self.clock.check() {
            self.abort(reason);
            return Ok(&self.state);
        }

        let current = std::mem::replace(&mut self.state, LoopState::AwaitingMove(Color::White));
        self.state = match current {
            LoopState::AwaitingMove(side) => self.request(side),
            LoopState::Validating(proposal) => self.check(proposal)?,
            LoopState::Applying(accepted) => self.play(accepted)?,
            terminal @ LoopState::Terminal(_) => terminal,
        };
        Ok(&self.state)
    }

    /// Steps until the game is decided or aborted.
    pub fn run(mut self) -> Result<GameReport, GameError> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        Ok(self.report())
    }

    /// The finished game, or `None` while it is still in progress.
    pub fn into_report(self) -> Option<GameReport> {
        self.state.is_terminal().then(|| self.report())
    }

    fn report(&self) -> GameReport {
        GameReport {
            id: self.id,
            white: self.white.name().to_string(),
            black: self.black.name().to_string(),
            start_fen: self.start_fen.clone(),
            final_fen: self.board.to_fen(),
            outcome: self.outcome().unwrap_or(Outcome::Aborted {
                reason: AbortReason::Cancelled,
            }),
            transcript: self.transcript.clone(),
            stats: self.stats,
        }
    }

    fn agent(&mut self, side: Color) -> &mut (dyn Agent + 'a) {
        match side {
            Color::White => &mut *self.white,
            Color::Black => &mut *self.black,
        }
    }

    fn request(&mut self, side: Color) -> LoopState {
        if !self.started {
            self.started = true;
            self.clock.start();
            self.white.new_game();
            self.black.new_game();
            info!(start_fen = %self.start_fen, "game started");
        }

        let mut request = MoveRequest::for_state(&self.board, self.transcript.movetext());
        request.attempt = self.turn_failures + 1;
        request.previous_failure = self.last_failure.as_ref().map(ToString::to_string);
        request.deadline = self.config.move_timeout().map(|t| Instant::now() + t);
        let attempt = request.attempt;

        let started = Instant::now();
        let reply = self.agent(side).propose(&request);
        let elapsed = started.elapsed();
        self.stats.side_mut(side).attempts += 1;

        debug!(%side, attempt, elapsed_ms = elapsed.as_millis() as u64, ok = reply.is_ok(), "reply received");
        LoopState::Validating(Proposal {
            side,
            attempt,
            reply,
            elapsed,
        })
    }

    fn check(&mut self, proposal: Proposal) -> Result<LoopState, GameError> {
        let Proposal {
            side,
            attempt,
            reply,
            elapsed,
        } = proposal;
        let elapsed_ms = elapsed.as_millis() as u64;
        let limit = self.config.move_timeout();

        let raw = match reply {
            Ok(raw) if limit.is_some_and(|l| elapsed > l) => {
                let failure = AttemptFailure::Timeout {
                    elapsed_ms,
                    limit_ms: self.config.move_timeout_ms,
                };
                return self.fail(side, attempt, raw, None, failure, elapsed);
            }
            Ok(raw) => raw,
            Err(AgentError::Timeout) => {
                let failure = AttemptFailure::Timeout {
                    elapsed_ms,
                    limit_ms: self.config.move_timeout_ms,
                };
                return self.fail(side, attempt, String::new(), None, failure, elapsed);
            }
            Err(err) => {
                let failure = AttemptFailure::Agent {
                    message: err.to_string(),
                };
                return self.fail(side, attempt, String::new(), None, failure, elapsed);
            }
        };

        let candidate = match interpret(&raw, self.board.position()) {
            Ok(Interpretation::Move(candidate)) => candidate,
            Ok(Interpretation::Resign) => return self.resign(side, attempt, raw, elapsed),
            Err(failure) => {
                let failure = AttemptFailure::Parse { failure };
                return self.fail(side, attempt, raw, None, failure, elapsed);
            }
        };

        match validate(self.board.position(), &candidate) {
            Ok(mv) => Ok(LoopState::Applying(Accepted {
                side,
                attempt,
                raw,
                candidate,
                mv,
                elapsed,
            })),
            Err(rejection) => {
                let failure = AttemptFailure::Rejected {
                    candidate,
                    rejection,
                };
                self.fail(side, attempt, raw, Some(candidate), failure, elapsed)
            }
        }
    }

    fn play(&mut self, accepted: Accepted) -> Result<LoopState, GameError> {
        let Accepted {
            side,
            attempt,
            raw,
            candidate,
            mv,
            elapsed,
        } = accepted;

        let san = to_san(self.board.position(), mv);
        let next = self.board.apply(mv)?;
        self.transcript.push(TranscriptEntry {
            ply: self.stats.plies + 1,
            mover: side,
            attempt,
            raw,
            candidate: Some(candidate),
            result: Ok(PlayedMove {
                mv,
                uci: move_to_uci(mv),
                san: san.clone(),
            }),
            fen_after: next.to_fen(),
            elapsed_ms: elapsed.as_millis() as u64,
        })?;
        self.board = next;
        self.stats.plies += 1;
        self.stats.side_mut(side).moves += 1;
        self.turn_failures = 0;
        self.last_failure = None;
        debug!(%side, %san, ply = self.stats.plies, "move played");

        if let Some(outcome) = adjudicate(&self.board) {
            return Ok(self.finish(outcome));
        }
        if self
            .config
            .max_plies
            .is_some_and(|max| self.stats.plies >= max)
        {
            return Ok(self.finish(Outcome::Draw {
                reason: DrawReason::MoveLimit,
            }));
        }
        Ok(LoopState::AwaitingMove(side.other()))
    }

    fn resign(
        &mut self,
        side: Color,
        attempt: u32,
        raw: String,
        elapsed: Duration,
    ) -> Result<LoopState, GameError> {
        match self.config.resignation {
            ResignationPolicy::TreatAsFailure => {
                self.fail(side, attempt, raw, None, AttemptFailure::Resigned, elapsed)
            }
            ResignationPolicy::Accept => {
                self.record_failure(side, attempt, raw, None, AttemptFailure::Resigned, elapsed)?;
                info!(%side, "resigned");
                Ok(self.finish(Outcome::Decisive {
                    winner: side.other(),
                    reason: WinReason::Resignation,
                }))
            }
        }
    }

    /// Records a failed attempt and either re-prompts the same side or
    /// forfeits the game once the retry limit is reached.
    fn fail(
        &mut self,
        side: Color,
        attempt: u32,
        raw: String,
        candidate: Option<Candidate>,
        failure: AttemptFailure,
        elapsed: Duration,
    ) -> Result<LoopState, GameError> {
        warn!(%side, attempt, reason = %failure, "attempt failed");
        self.record_failure(side, attempt, raw, candidate, failure.clone(), elapsed)?;

        let stats = self.stats.side_mut(side);
        stats.failures += 1;
        if matches!(failure, AttemptFailure::Timeout { .. }) {
            stats.timeouts += 1;
        }
        self.turn_failures += 1;
        self.last_failure = Some(failure);

        if self.turn_failures >= self.config.retry_limit {
            warn!(%side, failures = self.turn_failures, "retry limit reached, forfeiting");
            return Ok(self.finish(Outcome::Decisive {
                winner: side.other(),
                reason: WinReason::ForfeitByIllegalMoveExhaustion,
            }));
        }
        Ok(LoopState::AwaitingMove(side))
    }

    fn record_failure(
        &mut self,
        side: Color,
        attempt: u32,
        raw: String,
        candidate: Option<Candidate>,
        failure: AttemptFailure,
        elapsed: Duration,
    ) -> Result<(), TranscriptFrozen> {
        self.transcript.push(TranscriptEntry {
            ply: self.stats.plies + 1,
            mover: side,
            attempt,
            raw,
            candidate,
            result: Err(failure),
            fen_after: self.board.to_fen(),
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }

    fn abort(&mut self, reason: AbortReason) {
        warn!(?reason, plies = self.stats.plies, "game aborted");
        self.state = self.finish(Outcome::Aborted { reason });
    }

    fn finish(&mut self, outcome: Outcome) -> LoopState {
        self.transcript.freeze();
        self.stats.duration_ms = self.clock.elapsed().as_millis() as u64;
        info!(%outcome, plies = self.stats.plies, "game over");
        LoopState::Terminal(outcome)
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
