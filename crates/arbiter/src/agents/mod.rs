//! Concrete movers.

mod engine;
mod human;
mod model;
mod scripted;

pub use engine::{EngineAgent, MoveNotation};
pub use human::HumanAgent;
pub use model::{ChatMessage, ModelAgent, ModelClient, Role, build_prompt};
pub use scripted::ScriptedAgent;
