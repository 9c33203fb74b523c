use chess_core::{BoardState, PieceKind, coord_to_sq, move_to_uci, to_san};

use super::*;

fn played(state: &BoardState, uci: &str) -> PlayedMove {
    let mv = state
        .legal_moves()
        .into_iter()
        .find(|m| move_to_uci(*m) == uci)
        .unwrap();
    PlayedMove {
        mv,
        uci: uci.to_string(),
        san: to_san(state.position(), mv),
    }
}

/// Plays `moves` from `state`, recording each as an accepted entry.
fn record(transcript: &mut Transcript, mut state: BoardState, moves: &[&str]) {
    for (i, uci) in moves.iter().enumerate() {
        let mover = state.side_to_move();
        let play = played(&state, uci);
        state = state.apply(play.mv).unwrap();
        transcript
            .push(TranscriptEntry {
                ply: i as u32 + 1,
                mover,
                attempt: 1,
                raw: uci.to_string(),
                candidate: None,
                result: Ok(play),
                fen_after: state.to_fen(),
                elapsed_ms: 0,
            })
            .unwrap();
    }
}

fn failure(mover: Color, ply: u32) -> TranscriptEntry {
    TranscriptEntry {
        ply,
        mover,
        attempt: 1,
        raw: "Qh5".into(),
        candidate: Some(Candidate::San {
            piece: PieceKind::Queen,
            from_file: None,
            from_rank: None,
            to: coord_to_sq("h5").unwrap(),
            promotion: None,
            capture: false,
        }),
        result: Err(AttemptFailure::Rejected {
            candidate: Candidate::San {
                piece: PieceKind::Queen,
                from_file: None,
                from_rank: None,
                to: coord_to_sq("h5").unwrap(),
                promotion: None,
                capture: false,
            },
            rejection: Rejection::NoMatchingLegalMove,
        }),
        fen_after: BoardState::new().to_fen(),
        elapsed_ms: 3,
    }
}

#[test]
fn movetext_numbers_moves() {
    let mut t = Transcript::new(1, Color::White);
    assert_eq!(t.movetext(), "");
    assert_eq!(t.movetext_with_result("*"), "*");

    record(&mut t, BoardState::new(), &["e2e4", "e7e5", "g1f3"]);
    assert_eq!(t.movetext(), "1. e4 e5 2. Nf3");
    assert_eq!(t.movetext_with_result("1-0"), "1. e4 e5 2. Nf3 1-0");
    assert_eq!(t.uci_moves(), vec!["e2e4", "e7e5", "g1f3"]);
}

#[test]
fn movetext_from_black_to_move() {
    let state = BoardState::from_fen(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 7",
    )
    .unwrap();
    let mut t = Transcript::new(7, Color::Black);
    record(&mut t, state, &["e7e5", "g1f3", "b8c6"]);
    assert_eq!(t.movetext(), "7... e5 8. Nf3 Nc6");
}

#[test]
fn failures_are_kept_but_not_in_movetext() {
    let mut t = Transcript::new(1, Color::White);
    t.push(failure(Color::White, 1)).unwrap();
    record(&mut t, BoardState::new(), &["e2e4"]);

    assert_eq!(t.entries().len(), 2);
    assert_eq!(t.san_moves(), vec!["e4"]);
    assert_eq!(t.failures_for(Color::White).count(), 1);
    assert_eq!(t.failures_for(Color::Black).count(), 0);
}

#[test]
fn frozen_transcript_refuses_entries() {
    let mut t = Transcript::new(1, Color::White);
    t.freeze();
    assert!(t.is_frozen());
    assert_eq!(t.push(failure(Color::White, 1)), Err(TranscriptFrozen));
    assert!(t.entries().is_empty());
}

#[test]
fn failure_text_names_the_problem() {
    let entry = failure(Color::White, 1);
    let text = entry.result.unwrap_err().to_string();
    assert_eq!(text, "Qh5 was rejected: no legal move matches");

    let timeout = AttemptFailure::Timeout {
        elapsed_ms: 1500,
        limit_ms: Some(1000),
    };
    assert_eq!(timeout.to_string(), "no answer in time (1500 ms)");
}

#[test]
fn entries_serialize_with_failure_kind() {
    let json = serde_json::to_value(failure(Color::Black, 2)).unwrap();
    assert_eq!(json["mover"], "black");
    assert_eq!(json["result"]["Err"]["kind"], "rejected");
    assert_eq!(json["result"]["Err"]["rejection"], "no_matching_legal_move");
}
