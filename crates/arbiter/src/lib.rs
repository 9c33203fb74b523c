//! Referee between free-text move proposers and the chess rules.
//!
//! A [`GameController`] asks each side's [`Agent`] for text, reads a move
//! out of it with the [`interpreter`], checks it with the legal move oracle
//! and records every attempt in a [`Transcript`].

pub mod agent;
pub mod agents;
pub mod clock;
pub mod config;
pub mod controller;
pub mod interpreter;
pub mod transcript;

pub use agent::{Agent, AgentError, MoveRequest};
pub use agents::{
    ChatMessage, EngineAgent, HumanAgent, ModelAgent, ModelClient, MoveNotation, Role,
    ScriptedAgent, build_prompt,
};
pub use clock::{CancelToken, GameClock};
pub use config::{ConfigError, DEFAULT_RETRY_LIMIT, GameConfig, ResignationPolicy};
pub use controller::{
    Accepted, GameController, GameError, GameReport, GameStats, LoopState, Proposal, SideStats,
};
pub use interpreter::{Interpretation, ParseFailure, interpret, parse};
pub use transcript::{AttemptFailure, PlayedMove, Transcript, TranscriptEntry, TranscriptFrozen};
