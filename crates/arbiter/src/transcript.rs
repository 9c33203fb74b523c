//! Append-only record of every attempt in a game, accepted or not.

use std::fmt::Write as _;

use chess_core::{Candidate, Color, Move, Rejection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interpreter::ParseFailure;

/// A move that made it onto the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub mv: Move,
    pub uci: String,
    pub san: String,
}

/// Why an attempt did not produce a move. The display text is what the mover
/// sees on its next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptFailure {
    #[error("could not read a move from the reply: {failure}")]
    Parse { failure: ParseFailure },
    #[error("{candidate} was rejected: {rejection}")]
    Rejected {
        candidate: Candidate,
        rejection: Rejection,
    },
    #[error("no answer in time ({elapsed_ms} ms)")]
    Timeout {
        elapsed_ms: u64,
        limit_ms: Option<u64>,
    },
    #[error("the mover failed to answer: {message}")]
    Agent { message: String },
    #[error("resigning is not allowed in this game; play a move")]
    Resigned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Half-move this attempt was for, 1-based within the game.
    pub ply: u32,
    pub mover: Color,
    /// Attempt number within the turn, 1-based.
    pub attempt: u32,
    /// Reply text as received; empty when the mover produced none.
    pub raw: String,
    pub candidate: Option<Candidate>,
    pub result: Result<PlayedMove, AttemptFailure>,
    /// Position after the attempt. Unchanged from before on failure.
    pub fen_after: String,
    pub elapsed_ms: u64,
}

impl TranscriptEntry {
    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transcript is frozen")]
pub struct TranscriptFrozen;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    start_fullmove: u32,
    first_mover: Color,
    entries: Vec<TranscriptEntry>,
    frozen: bool,
}

impl Transcript {
    pub fn new(start_fullmove: u32, first_mover: Color) -> Self {
        Self {
            start_fullmove,
            first_mover,
            entries: Vec::new(),
            frozen: false,
        }
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) -> Result<(), TranscriptFrozen> {
        if self.frozen {
            return Err(TranscriptFrozen);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn played(&self) -> impl Iterator<Item = &PlayedMove> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    pub fn san_moves(&self) -> Vec<&str> {
        self.played().map(|p| p.san.as_str()).collect()
    }

    pub fn uci_moves(&self) -> Vec<&str> {
        self.played().map(|p| p.uci.as_str()).collect()
    }

    pub fn failures_for(&self, side: Color) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries
            .iter()
            .filter(move |e| e.mover == side && !e.is_accepted())
    }

    /// Numbered SAN movetext, e.g. `1. e4 e5 2. Nf3`. A game that starts
    /// with black to move opens with `N...`.
    pub fn movetext(&self) -> String {
        let offset = usize::from(self.first_mover == Color::Black);
        let mut text = String::new();
        for (i, san) in self.san_moves().into_iter().enumerate() {
            let half = i + offset;
            let number = self.start_fullmove as usize + half / 2;
            if !text.is_empty() {
                text.push(' ');
            }
            if half % 2 == 0 {
                let _ = write!(text, "{number}. {san}");
            } else if i == 0 {
                let _ = write!(text, "{number}... {san}");
            } else {
                text.push_str(san);
            }
        }
        text
    }

    pub fn movetext_with_result(&self, result_tag: &str) -> String {
        let moves = self.movetext();
        if moves.is_empty() {
            result_tag.to_string()
        } else {
            format!("{moves} {result_tag}")
        }
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod transcript_tests;
