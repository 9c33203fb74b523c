//! Drives an external UCI engine (Stockfish and friends) over stdin/stdout.
//!
//! Strength is limited with `UCI_LimitStrength` / `UCI_Elo` when the caller
//! asks for an Elo, or with a fixed `go depth` when it asks for a depth.

mod protocol;

use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use chess_core::{Difficulty, Engine, EngineError, Move, Position, legal_moves, move_to_uci};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use protocol::{GoReply, Score, UciSession, bounded_move_time, clamp_elo};

/// Stockfish accepts `UCI_Elo` in this range.
pub const MIN_ELO: u16 = 1320;
pub const MAX_ELO: u16 = 3190;

#[derive(Debug, Error)]
pub enum UciError {
    #[error("failed to start engine {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("engine i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine closed its output")]
    Closed,
    #[error("unexpected engine reply: {0}")]
    Protocol(String),
}

impl From<UciError> for EngineError {
    fn from(err: UciError) -> Self {
        EngineError::Process(err.to_string())
    }
}

/// Per-engine settings.
#[derive(Debug, Clone)]
pub struct UciOptions {
    /// Time per move handed to `go movetime`.
    pub move_time: Duration,
    /// Strength applied at startup, if any.
    pub elo: Option<u16>,
}

impl Default for UciOptions {
    fn default() -> Self {
        Self {
            move_time: Duration::from_millis(100),
            elo: None,
        }
    }
}

/// A running UCI engine process.
pub struct UciEngine {
    child: Child,
    session: UciSession<ChildStdin, BufReader<ChildStdout>>,
    options: UciOptions,
    deadline: Option<Instant>,
}

impl UciEngine {
    /// Starts the engine at `path` and completes the `uci` / `isready`
    /// handshake.
    pub fn spawn(path: impl AsRef<Path>, options: UciOptions) -> Result<Self, UciError> {
        let path = path.as_ref();
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| UciError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(UciError::Closed);
        };

        let mut session = UciSession::new(stdin, BufReader::new(stdout));
        session.handshake()?;
        info!(engine = %session.name(), path = %path.display(), "UCI engine ready");

        let mut engine = Self {
            child,
            session,
            options,
            deadline: None,
        };
        if let Some(elo) = engine.options.elo {
            engine.configure_elo(elo)?;
        }
        Ok(engine)
    }

    fn configure_elo(&mut self, elo: u16) -> Result<(), UciError> {
        let elo = self.session.limit_strength(elo)?;
        debug!(elo, "engine strength in force");
        Ok(())
    }

    fn resolve(pos: &Position, uci: &str) -> Result<Move, EngineError> {
        legal_moves(pos)
            .into_iter()
            .find(|m| move_to_uci(*m) == uci)
            .ok_or_else(|| EngineError::BadMove(uci.to_string()))
    }
}

impl Engine for UciEngine {
    fn best_move(&mut self, pos: &Position, difficulty: Difficulty) -> Result<Move, EngineError> {
        let reply = match difficulty {
            Difficulty::Elo(elo) => {
                self.configure_elo(elo)?;
                let move_time =
                    bounded_move_time(self.options.move_time, self.deadline, Instant::now());
                self.session.go_movetime(&pos.to_fen(), move_time)?
            }
            Difficulty::Depth(depth) => self.session.go_depth(&pos.to_fen(), depth)?,
        };

        match reply.best_move {
            Some(uci) => Self::resolve(pos, &uci),
            None => Err(EngineError::NoLegalMoves),
        }
    }

    fn evaluate(&mut self, pos: &Position) -> Result<i32, EngineError> {
        let reply = self.session.go_depth(&pos.to_fen(), 8)?;
        match reply.score {
            Some(Score::Centipawns(cp)) => Ok(cp),
            Some(Score::Mate(n)) if n > 0 => Ok(100_000 - n),
            Some(Score::Mate(n)) => Ok(-100_000 - n),
            None => Err(EngineError::Process("engine reported no score".into())),
        }
    }

    fn name(&self) -> &str {
        self.session.name()
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    fn new_game(&mut self) {
        if let Err(err) = self.session.new_game() {
            warn!(error = %err, "ucinewgame failed");
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if self.session.quit().is_err() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

/// Writes a raw command line; exposed for engines that need extra options.
pub fn send_line<W: Write>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writeln!(writer, "{line}")?;
    writer.flush()
}
