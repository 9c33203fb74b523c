use chess_core::BoardState;

use super::*;

struct CannedClient {
    replies: Vec<String>,
    seen: Vec<usize>,
}

impl ModelClient for CannedClient {
    fn model_name(&self) -> &str {
        "canned"
    }

    fn complete(
        &mut self,
        messages: &[ChatMessage],
        _deadline: Option<Instant>,
    ) -> Result<String, AgentError> {
        self.seen.push(messages.len());
        if self.replies.is_empty() {
            return Err(AgentError::Client("quota exceeded".into()));
        }
        Ok(self.replies.remove(0))
    }
}

fn request() -> MoveRequest {
    MoveRequest::for_state(&BoardState::new(), String::new())
}

#[test]
fn prompt_shows_board_history_and_feedback() {
    let mut req = request();
    req.history = "1. e4 e5".into();
    req.previous_failure = Some("that move belongs to the side not on move".into());

    let prompt = build_prompt(&req, true);
    assert!(prompt.contains("```move_history\n1. e4 e5\n```"));
    assert!(prompt.contains("8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜"));
    assert!(prompt.contains("Legal moves (UCI): "));
    assert!(prompt.contains("g1f3"));
    assert!(prompt.contains("not accepted: that move belongs"));
    assert!(prompt.contains("WHITE to move"));
    assert!(prompt.contains("Answer: <move>"));
}

#[test]
fn prompt_for_first_move() {
    let prompt = build_prompt(&request(), false);
    assert!(prompt.contains("(no moves yet)"));
    assert!(!prompt.contains("Legal moves"));
    assert!(!prompt.contains("not accepted"));
}

#[test]
fn conversation_accumulates_and_resets() {
    let client = CannedClient {
        replies: vec!["Answer: e4".into(), "Answer: Nf3".into()],
        seen: Vec::new(),
    };
    let mut agent = ModelAgent::new(client);

    assert_eq!(agent.propose(&request()).unwrap(), "Answer: e4");
    assert_eq!(agent.propose(&request()).unwrap(), "Answer: Nf3");
    assert_eq!(agent.client.seen, vec![2, 4]);
    assert_eq!(agent.conversation().len(), 5);
    assert_eq!(agent.conversation()[4].role, Role::Assistant);

    assert!(matches!(
        agent.propose(&request()),
        Err(AgentError::Client(_))
    ));

    agent.new_game();
    assert_eq!(agent.conversation().len(), 1);
    assert_eq!(agent.conversation()[0].role, Role::System);
}

#[test]
fn old_exchanges_are_trimmed() {
    let client = CannedClient {
        replies: vec!["a".into(), "b".into(), "c".into()],
        seen: Vec::new(),
    };
    let mut agent = ModelAgent::new(client).max_messages(2);
    for _ in 0..3 {
        agent.propose(&request()).unwrap();
    }
    let conversation = agent.conversation();
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation[0].role, Role::System);
    assert_eq!(conversation[2].content, "c");
}
