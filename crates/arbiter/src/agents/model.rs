//! Language-model mover. Transport is abstract: anything that can complete
//! a chat plugs in through [`ModelClient`].

use std::fmt::Write as _;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::{Agent, AgentError, MoveRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Completes a conversation. Implementations should give up by `deadline`
/// when they can; late answers are thrown away by the referee anyway.
pub trait ModelClient: Send {
    fn model_name(&self) -> &str;

    fn complete(
        &mut self,
        messages: &[ChatMessage],
        deadline: Option<Instant>,
    ) -> Result<String, AgentError>;
}

const SYSTEM_PROMPT: &str = "You are a strong chess player competing in a rated game. \
Read the position carefully and only propose moves that are legal in it.";

/// Builds the user turn for one request.
pub fn build_prompt(request: &MoveRequest, show_legal_moves: bool) -> String {
    let mut prompt = String::new();
    let history = if request.history.is_empty() {
        "(no moves yet)"
    } else {
        request.history.as_str()
    };
    let _ = write!(
        prompt,
        "Moves so far:\n\n```move_history\n{history}\n```\n\n\
         Current position:\n\n```current_board\n{}\n```\n\nFEN: {}\n\n",
        request.diagram, request.fen
    );
    if show_legal_moves {
        let _ = writeln!(prompt, "Legal moves (UCI): {}\n", request.legal_moves_uci.join(" "));
    }
    if let Some(failure) = &request.previous_failure {
        let _ = writeln!(
            prompt,
            "Your previous answer was not accepted: {failure}. Try again.\n"
        );
    }
    let _ = write!(
        prompt,
        "{} to move. Think it through if you like, then finish with one line of the form \
         `Answer: <move>` in standard algebraic notation.",
        request.side.to_string().to_uppercase()
    );
    prompt
}

/// Keeps the conversation for one game and forwards it to a [`ModelClient`].
pub struct ModelAgent<C> {
    client: C,
    conversation: Vec<ChatMessage>,
    show_legal_moves: bool,
    /// Oldest exchanges are dropped beyond this many messages (system prompt
    /// excluded).
    max_messages: Option<usize>,
}

impl<C: ModelClient> ModelAgent<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            conversation: vec![ChatMessage::new(Role::System, SYSTEM_PROMPT)],
            show_legal_moves: false,
            max_messages: None,
        }
    }

    pub fn show_legal_moves(mut self, show: bool) -> Self {
        self.show_legal_moves = show;
        self
    }

    pub fn max_messages(mut self, max: usize) -> Self {
        self.max_messages = Some(max);
        self
    }

    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    fn trim(&mut self) {
        let Some(max) = self.max_messages else {
            return;
        };
        let excess = (self.conversation.len() - 1).saturating_sub(max);
        if excess > 0 {
            self.conversation.drain(1..1 + excess);
        }
    }
}

impl<C: ModelClient> Agent for ModelAgent<C> {
    fn name(&self) -> &str {
        self.client.model_name()
    }

    fn propose(&mut self, request: &MoveRequest) -> Result<String, AgentError> {
        self.conversation.push(ChatMessage::new(
            Role::User,
            build_prompt(request, self.show_legal_moves),
        ));
        self.trim();

        let reply = self.client.complete(&self.conversation, request.deadline)?;
        debug!(model = self.client.model_name(), chars = reply.len(), "model replied");

        self.conversation
            .push(ChatMessage::new(Role::Assistant, reply.clone()));
        self.trim();
        Ok(reply)
    }

    fn new_game(&mut self) {
        self.conversation.truncate(1);
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod model_tests;
