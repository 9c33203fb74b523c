use std::io::Cursor;

use chess_core::BoardState;

use super::*;

#[test]
fn reads_one_line_per_request() {
    let input = Cursor::new(b"e4\n  Nf3  \n".to_vec());
    let mut agent = HumanAgent::new("you", input, Vec::new());
    let mut request = MoveRequest::for_state(&BoardState::new(), String::new());

    assert_eq!(agent.propose(&request).unwrap(), "e4");
    request.previous_failure = Some("no legal move matches".into());
    assert_eq!(agent.propose(&request).unwrap(), "Nf3");
    assert!(matches!(
        agent.propose(&request),
        Err(AgentError::Unavailable(_))
    ));

    let shown = String::from_utf8(agent.output).unwrap();
    assert!(shown.contains("  a b c d e f g h"));
    assert!(shown.contains("Not accepted: no legal move matches"));
    assert!(shown.contains("white to move> "));
}
