//! Plays the games of an experiment.

use anyhow::{Context, Result};
use arbiter::{CancelToken, GameClock, GameController, GameReport};
use chess_core::Color;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::experiment::ExperimentConfig;

/// One finished game of an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 0-based game number within the experiment.
    pub index: u32,
    /// Whether the experiment's `white` mover had the white pieces.
    pub first_is_white: bool,
    pub report: GameReport,
}

impl GameRecord {
    /// Colour played by the experiment's `white` mover.
    pub fn first_color(&self) -> Color {
        if self.first_is_white {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// A game that could not be played to an outcome, e.g. because a mover
/// failed to start or a UCI engine died mid-game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFailure {
    pub index: u32,
    pub first_is_white: bool,
    /// Full error chain.
    pub error: String,
}

/// Everything a batch produced, in game order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub games: Vec<GameRecord>,
    pub failures: Vec<GameFailure>,
}

fn opens_as_white(config: &ExperimentConfig, index: u32) -> bool {
    !config.alternate_colors || index % 2 == 0
}

/// Plays every game of `config`. Games are independent: each owns its
/// board, transcript and movers, and all of them share `token` so a
/// cancelled batch stops everywhere. A game that errors is recorded as a
/// [`GameFailure`] and the others still count.
pub fn run_batch(config: &ExperimentConfig, token: &CancelToken) -> Result<Batch> {
    config.validate()?;
    info!(
        experiment = %config.name,
        games = config.games,
        white = %config.white,
        black = %config.black,
        parallel = config.runs_in_parallel(),
        "starting experiment"
    );

    let results: Vec<(u32, Result<GameRecord>)> = if config.runs_in_parallel() {
        (0..config.games)
            .into_par_iter()
            .map(|index| (index, play_one(config, index, token)))
            .collect()
    } else {
        (0..config.games)
            .map(|index| (index, play_one(config, index, token)))
            .collect()
    };

    let mut batch = Batch::default();
    for (index, result) in results {
        match result {
            Ok(record) => batch.games.push(record),
            Err(err) => {
                let error = format!("{err:#}");
                warn!(game = index + 1, %error, "game failed");
                batch.failures.push(GameFailure {
                    index,
                    first_is_white: opens_as_white(config, index),
                    error,
                });
            }
        }
    }
    batch.games.sort_by_key(|r| r.index);
    batch.failures.sort_by_key(|f| f.index);
    Ok(batch)
}

fn play_one(config: &ExperimentConfig, index: u32, token: &CancelToken) -> Result<GameRecord> {
    let first_is_white = opens_as_white(config, index);
    let (white_spec, black_spec) = if first_is_white {
        (&config.white, &config.black)
    } else {
        (&config.black, &config.white)
    };

    let mut white = white_spec
        .build(index)
        .with_context(|| format!("game {index}: white mover"))?;
    let mut black = black_spec
        .build(index)
        .with_context(|| format!("game {index}: black mover"))?;

    let clock = GameClock::with_token(config.game.game_budget(), token.clone());
    let report = GameController::new(config.game.clone(), white.as_mut(), black.as_mut())?
        .with_clock(clock)
        .run()
        .with_context(|| format!("game {index}"))?;

    info!(
        game = index + 1,
        of = config.games,
        white = %report.white,
        black = %report.black,
        outcome = %report.outcome,
        plies = report.stats.plies,
        "game finished"
    );
    Ok(GameRecord {
        index,
        first_is_white,
        report,
    })
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod batch_tests;
