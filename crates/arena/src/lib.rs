//! Experiment harness around the referee.
//!
//! An experiment names two movers and a game configuration. The batch
//! runner plays the requested number of independent games, in parallel when
//! no human is involved, and the results are written as JSON and PGN.
//!
//! ```bash
//! arena run experiments/stockfish-vs-classical.toml --games 20
//! arena play random classical:2 --games 4 --max-plies 120
//! ```

pub mod batch;
pub mod experiment;
pub mod pgn;
pub mod results;

pub use batch::{Batch, GameFailure, GameRecord, run_batch};
pub use experiment::{AgentSpec, ExperimentConfig};
pub use results::{ExperimentResults, Summary};
