//! Experiment files and the movers they describe.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use arbiter::{Agent, EngineAgent, GameConfig, HumanAgent, MoveNotation, ScriptedAgent};
use chess_core::Difficulty;
use classical_engine::ClassicalEngine;
use random_engine::RandomEngine;
use serde::{Deserialize, Serialize};
use uci_engine::{UciEngine, UciOptions};

fn default_depth() -> u8 {
    3
}

fn default_move_time_ms() -> u64 {
    100
}

/// One side of an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentSpec {
    /// Uniform random legal moves. Seeded runs vary the seed per game.
    Random { seed: Option<u64> },
    /// In-process alpha-beta searcher. An Elo, when given, picks the depth.
    Classical {
        #[serde(default = "default_depth")]
        depth: u8,
        elo: Option<u16>,
        /// Wall-clock cap per move on top of the depth.
        #[serde(default)]
        move_time_ms: Option<u64>,
    },
    /// External UCI engine such as Stockfish.
    Uci {
        path: PathBuf,
        elo: Option<u16>,
        #[serde(default = "default_move_time_ms")]
        move_time_ms: u64,
    },
    /// Fixed replies, in order.
    Script { moves: Vec<String> },
    /// Moves typed on the terminal.
    Human,
}

impl AgentSpec {
    /// Human players need the terminal, so their games cannot run in
    /// parallel.
    pub fn is_interactive(&self) -> bool {
        matches!(self, AgentSpec::Human)
    }

    /// A fresh mover for game number `game`.
    pub fn build(&self, game: u32) -> Result<Box<dyn Agent>> {
        let agent: Box<dyn Agent> = match self {
            AgentSpec::Random { seed } => {
                let engine = match seed {
                    Some(seed) => RandomEngine::seeded(seed.wrapping_add(u64::from(game))),
                    None => RandomEngine::new(),
                };
                Box::new(
                    EngineAgent::new(Box::new(engine), Difficulty::Depth(1))
                        .with_notation(MoveNotation::Uci),
                )
            }
            AgentSpec::Classical {
                depth,
                elo,
                move_time_ms,
            } => {
                let difficulty = match elo {
                    Some(elo) => Difficulty::Elo(*elo),
                    None => Difficulty::Depth(*depth),
                };
                let engine = match move_time_ms {
                    Some(ms) => ClassicalEngine::with_move_time(Duration::from_millis(*ms)),
                    None => ClassicalEngine::new(),
                };
                Box::new(EngineAgent::new(Box::new(engine), difficulty))
            }
            AgentSpec::Uci {
                path,
                elo,
                move_time_ms,
            } => {
                let options = UciOptions {
                    move_time: Duration::from_millis(*move_time_ms),
                    elo: *elo,
                };
                let engine = UciEngine::spawn(path, options)
                    .with_context(|| format!("starting UCI engine {}", path.display()))?;
                let difficulty = match elo {
                    Some(elo) => Difficulty::Elo(*elo),
                    None => Difficulty::Depth(default_depth()),
                };
                Box::new(EngineAgent::new(Box::new(engine), difficulty))
            }
            AgentSpec::Script { moves } => {
                Box::new(ScriptedAgent::new(self.to_string(), moves.iter().cloned()))
            }
            AgentSpec::Human => Box::new(HumanAgent::stdio("human")),
        };
        Ok(agent)
    }
}

impl fmt::Display for AgentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentSpec::Random { seed: None } => write!(f, "random"),
            AgentSpec::Random { seed: Some(seed) } => write!(f, "random:{seed}"),
            AgentSpec::Classical { elo: Some(elo), .. } => write!(f, "classical@{elo}"),
            AgentSpec::Classical { depth, .. } => write!(f, "classical:{depth}"),
            AgentSpec::Uci { path, elo, .. } => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "uci".to_string());
                match elo {
                    Some(elo) => write!(f, "{name}@{elo}"),
                    None => write!(f, "{name}"),
                }
            }
            AgentSpec::Script { .. } => write!(f, "script"),
            AgentSpec::Human => write!(f, "human"),
        }
    }
}

/// Command-line shorthand: `random`, `random:SEED`, `classical`,
/// `classical:DEPTH`, `classical@ELO`, `uci:PATH`, `uci:PATH@ELO`,
/// `script:e4,Nf3,...` and `human`.
impl FromStr for AgentSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };

        match (kind.to_lowercase().as_str(), arg) {
            ("random", None) => Ok(AgentSpec::Random { seed: None }),
            ("random", Some(seed)) => Ok(AgentSpec::Random {
                seed: Some(seed.parse().with_context(|| format!("bad seed in '{s}'"))?),
            }),
            ("classical" | "classic", None) => Ok(AgentSpec::Classical {
                depth: default_depth(),
                elo: None,
                move_time_ms: None,
            }),
            ("classical" | "classic", Some(depth)) => Ok(AgentSpec::Classical {
                depth: depth.parse().with_context(|| format!("bad depth in '{s}'"))?,
                elo: None,
                move_time_ms: None,
            }),
            (with_elo, None) if with_elo.starts_with("classical@") => {
                let elo = &with_elo["classical@".len()..];
                Ok(AgentSpec::Classical {
                    depth: default_depth(),
                    elo: Some(elo.parse().with_context(|| format!("bad Elo in '{s}'"))?),
                    move_time_ms: None,
                })
            }
            ("uci", Some(rest)) => {
                let (path, elo) = match rest.rsplit_once('@') {
                    Some((path, elo)) => (
                        path,
                        Some(elo.parse().with_context(|| format!("bad Elo in '{s}'"))?),
                    ),
                    None => (rest, None),
                };
                if path.is_empty() {
                    bail!("'{s}' names no engine path");
                }
                Ok(AgentSpec::Uci {
                    path: PathBuf::from(path),
                    elo,
                    move_time_ms: default_move_time_ms(),
                })
            }
            ("script", Some(moves)) => Ok(AgentSpec::Script {
                moves: moves
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect(),
            }),
            ("human", None) => Ok(AgentSpec::Human),
            _ => Err(anyhow!("unknown agent '{s}'")),
        }
    }
}

fn default_games() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub name: String,
    #[serde(default = "default_games")]
    pub games: u32,
    /// Swap colours every other game.
    #[serde(default = "default_true")]
    pub alternate_colors: bool,
    /// Play games on the rayon pool. Forced off when a human plays.
    #[serde(default = "default_true")]
    pub parallel: bool,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub game: GameConfig,
    pub white: AgentSpec,
    pub black: AgentSpec,
}

impl ExperimentConfig {
    /// A single-game experiment between two movers with default settings.
    pub fn new(name: impl Into<String>, white: AgentSpec, black: AgentSpec) -> Self {
        Self {
            name: name.into(),
            games: default_games(),
            alternate_colors: true,
            parallel: true,
            output_dir: None,
            game: GameConfig::default(),
            white,
            black,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading experiment {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing experiment {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            bail!("experiment '{}' plays no games", self.name);
        }
        self.game
            .validate()
            .with_context(|| format!("game settings of experiment '{}'", self.name))?;
        Ok(())
    }

    pub fn runs_in_parallel(&self) -> bool {
        self.parallel && !self.white.is_interactive() && !self.black.is_interactive()
    }
}

#[cfg(test)]
#[path = "experiment_tests.rs"]
mod experiment_tests;
