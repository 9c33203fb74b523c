//! Experiment results: the per-game records, a win/loss/draw summary from
//! the first mover's point of view, and their files on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_core::{Outcome, WinReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::{Batch, GameFailure, GameRecord};
use crate::experiment::ExperimentConfig;
use crate::pgn;

/// Totals for the experiment's `white` mover ("first") against its `black`
/// mover ("second"), whatever colours they had in each game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub first: String,
    pub second: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub aborted: u32,
    /// Games the first mover lost by running out of retries.
    pub forfeits: u32,
    /// Games the second mover lost by running out of retries.
    pub opponent_forfeits: u32,
    /// Failed attempts by the first mover over all games.
    pub failed_attempts: u32,
    pub total_attempts: u32,
    /// Games that errored before reaching an outcome.
    #[serde(default)]
    pub errored: u32,
}

impl Summary {
    pub fn from_records(config: &ExperimentConfig, records: &[GameRecord]) -> Self {
        let mut summary = Summary {
            first: config.white.to_string(),
            second: config.black.to_string(),
            ..Summary::default()
        };

        for record in records {
            let first = record.first_color();
            let report = &record.report;
            summary.games += 1;

            let side = report.stats.side(first);
            summary.failed_attempts += side.failures;
            summary.total_attempts += side.attempts;

            match report.outcome {
                Outcome::Decisive { winner, reason } => {
                    let forfeit = reason == WinReason::ForfeitByIllegalMoveExhaustion;
                    if winner == first {
                        summary.wins += 1;
                        summary.opponent_forfeits += u32::from(forfeit);
                    } else {
                        summary.losses += 1;
                        summary.forfeits += u32::from(forfeit);
                    }
                }
                Outcome::Draw { .. } => summary.draws += 1,
                Outcome::Aborted { .. } => summary.aborted += 1,
            }
        }
        summary
    }

    /// Points scored by the first mover over decided and drawn games.
    pub fn score(&self) -> f64 {
        let played = self.wins + self.losses + self.draws;
        if played == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / played as f64
    }

    /// Share of the first mover's attempts that were refused.
    pub fn failure_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.failed_attempts as f64 / self.total_attempts as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResults {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config: ExperimentConfig,
    pub summary: Summary,
    pub games: Vec<GameRecord>,
    #[serde(default)]
    pub failures: Vec<GameFailure>,
}

impl ExperimentResults {
    pub fn new(config: &ExperimentConfig, started_at: DateTime<Utc>, batch: Batch) -> Self {
        let Batch { games, failures } = batch;
        let mut summary = Summary::from_records(config, &games);
        summary.errored = failures.len() as u32;
        Self {
            name: config.name.clone(),
            started_at,
            finished_at: Utc::now(),
            summary,
            config: config.clone(),
            games,
            failures,
        }
    }

    pub fn report(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();
        let _ = writeln!(out, "=== Experiment: {} ===", self.name);
        let _ = writeln!(out, "{} vs {}, {} games", s.first, s.second, s.games);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:<24} {:<24} {:>5}",
            "Game", "Result", "White", "Black", "Plies"
        );
        let _ = writeln!(out, "{}", "-".repeat(73));
        for record in &self.games {
            let r = &record.report;
            let _ = writeln!(
                out,
                "{:<6} {:<10} {:<24} {:<24} {:>5}",
                record.index + 1,
                r.outcome.result_tag(),
                r.white,
                r.black,
                r.stats.plies
            );
        }
        for failure in &self.failures {
            let _ = writeln!(out, "{:<6} {:<10} {}", failure.index + 1, "error", failure.error);
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}: {} wins, {} losses, {} draws, {} aborted",
            s.first, s.wins, s.losses, s.draws, s.aborted
        );
        let _ = writeln!(out, "Score: {:.1}%", s.score() * 100.0);
        let _ = writeln!(
            out,
            "Refused attempts: {}/{} ({:.1}%), forfeits {} (opponent {})",
            s.failed_attempts,
            s.total_attempts,
            s.failure_rate() * 100.0,
            s.forfeits,
            s.opponent_forfeits
        );
        if s.errored > 0 {
            let _ = writeln!(out, "Games that failed to run: {}", s.errored);
        }
        out
    }

    /// Writes `results.json` and `games.pgn` into a fresh directory under
    /// `dir` and returns that directory.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let slug: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let run_dir = dir.join(format!(
            "{slug}-{}",
            self.started_at.format("%Y%m%d-%H%M%S")
        ));
        std::fs::create_dir_all(&run_dir)
            .with_context(|| format!("creating {}", run_dir.display()))?;

        let json = serde_json::to_string_pretty(self).context("serializing results")?;
        let json_path = run_dir.join("results.json");
        std::fs::write(&json_path, json)
            .with_context(|| format!("writing {}", json_path.display()))?;

        let date = self.started_at.format("%Y.%m.%d").to_string();
        let pgn = pgn::render_all(self.games.iter().map(|g| &g.report), &self.name, &date);
        let pgn_path = run_dir.join("games.pgn");
        std::fs::write(&pgn_path, pgn)
            .with_context(|| format!("writing {}", pgn_path.display()))?;

        Ok(run_dir)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
