//! Line-level UCI conversation, independent of the process plumbing.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::{MAX_ELO, MIN_ELO, UciError, send_line};

/// Engine evaluation as reported in `info ... score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// Mate in N moves; negative when the side to move is getting mated.
    Mate(i32),
}

/// What a `go` command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoReply {
    /// `None` when the engine answered `bestmove (none)` or `0000`.
    pub best_move: Option<String>,
    /// Last score seen in the `info` lines.
    pub score: Option<Score>,
}

pub fn clamp_elo(elo: u16) -> u16 {
    elo.clamp(MIN_ELO, MAX_ELO)
}

/// `move_time`, shortened so the search ends by `deadline`.
pub fn bounded_move_time(move_time: Duration, deadline: Option<Instant>, now: Instant) -> Duration {
    match deadline {
        Some(deadline) => move_time.min(deadline.saturating_duration_since(now)),
        None => move_time,
    }
}

pub struct UciSession<W, R> {
    writer: W,
    reader: R,
    name: String,
    /// `UCI_Elo` last sent, after clamping.
    strength: Option<u16>,
}

impl<W: Write, R: BufRead> UciSession<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            reader,
            name: "UCI engine".to_string(),
            strength: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, line: &str) -> Result<(), UciError> {
        trace!(line, "> engine");
        send_line(&mut self.writer, line)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, UciError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(UciError::Closed);
        }
        let line = line.trim_end().to_string();
        trace!(line = %line, "< engine");
        Ok(line)
    }

    /// `uci` until `uciok`, then `isready` until `readyok`.
    pub fn handshake(&mut self) -> Result<(), UciError> {
        self.send("uci")?;
        loop {
            let line = self.read_line()?;
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.trim().to_string();
            } else if line == "uciok" {
                break;
            }
        }
        self.sync()
    }

    pub fn sync(&mut self) -> Result<(), UciError> {
        self.send("isready")?;
        while self.read_line()? != "readyok" {}
        Ok(())
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), UciError> {
        self.send(&format!("setoption name {name} value {value}"))
    }

    /// Limits playing strength to `elo`, clamped to the accepted range.
    /// Repeating the current setting sends nothing. Returns the Elo in force.
    pub fn limit_strength(&mut self, elo: u16) -> Result<u16, UciError> {
        let elo = clamp_elo(elo);
        if self.strength == Some(elo) {
            return Ok(elo);
        }
        self.set_option("UCI_LimitStrength", "true")?;
        self.set_option("UCI_Elo", &elo.to_string())?;
        self.sync()?;
        self.strength = Some(elo);
        Ok(elo)
    }

    pub fn new_game(&mut self) -> Result<(), UciError> {
        self.send("ucinewgame")?;
        self.sync()
    }

    pub fn go_movetime(&mut self, fen: &str, move_time: Duration) -> Result<GoReply, UciError> {
        self.go(fen, &format!("go movetime {}", move_time.as_millis().max(1)))
    }

    pub fn go_depth(&mut self, fen: &str, depth: u8) -> Result<GoReply, UciError> {
        self.go(fen, &format!("go depth {}", depth.max(1)))
    }

    fn go(&mut self, fen: &str, go: &str) -> Result<GoReply, UciError> {
        self.send(&format!("position fen {fen}"))?;
        self.send(go)?;

        let mut score = None;
        loop {
            let line = self.read_line()?;
            if line.starts_with("info") {
                if let Some(s) = parse_score(&line) {
                    score = Some(s);
                }
            } else if line.starts_with("bestmove") {
                return Ok(GoReply {
                    best_move: parse_bestmove(&line)?,
                    score,
                });
            }
        }
    }

    pub fn quit(&mut self) -> Result<(), UciError> {
        self.send("quit")
    }
}

pub(crate) fn parse_bestmove(line: &str) -> Result<Option<String>, UciError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("bestmove") {
        return Err(UciError::Protocol(line.to_string()));
    }
    match parts.next() {
        None => Err(UciError::Protocol(line.to_string())),
        Some("(none)") | Some("0000") => Ok(None),
        Some(mv) => Ok(Some(mv.to_string())),
    }
}

pub(crate) fn parse_score(line: &str) -> Option<Score> {
    let mut parts = line.split_whitespace();
    while let Some(tok) = parts.next() {
        if tok == "score" {
            let kind = parts.next()?;
            let value: i32 = parts.next()?.parse().ok()?;
            return match kind {
                "cp" => Some(Score::Centipawns(value)),
                "mate" => Some(Score::Mate(value)),
                _ => None,
            };
        }
    }
    None
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
