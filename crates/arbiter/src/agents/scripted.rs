use std::collections::VecDeque;

use crate::agent::{Agent, AgentError, MoveRequest};

/// Replays fixed replies in order. Useful for tests and for replaying a
/// recorded game.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    name: String,
    replies: VecDeque<String>,
    repeat: Option<String>,
    feedback: Vec<Option<String>>,
}

impl ScriptedAgent {
    pub fn new<I, S>(name: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            replies: replies.into_iter().map(Into::into).collect(),
            repeat: None,
            feedback: Vec::new(),
        }
    }

    /// Answers every request with the same text.
    pub fn repeating(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            repeat: Some(reply.into()),
            ..Self::new(name, Vec::<String>::new())
        }
    }

    /// `previous_failure` of every request received, in order.
    pub fn feedback(&self) -> &[Option<String>] {
        &self.feedback
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, request: &MoveRequest) -> Result<String, AgentError> {
        self.feedback.push(request.previous_failure.clone());
        self.replies
            .pop_front()
            .or_else(|| self.repeat.clone())
            .ok_or(AgentError::ScriptExhausted)
    }
}
