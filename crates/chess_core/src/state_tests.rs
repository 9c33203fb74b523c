use super::*;
use crate::types::PieceKind;

fn play(state: &BoardState, uci: &str) -> BoardState {
    let mv = state
        .legal_moves()
        .into_iter()
        .find(|m| move_to_uci(*m) == uci)
        .unwrap_or_else(|| panic!("{uci} not legal"));
    state.apply(mv).unwrap()
}

#[test]
fn apply_rejects_illegal_move() {
    let state = BoardState::new();
    let bogus = Move::new(12, 36, PieceKind::Pawn); // e2e5
    let err = state.apply(bogus).unwrap_err();
    assert!(matches!(err, BoardError::InvalidMoveApplication { ref uci, .. } if uci == "e2e5"));
}

#[test]
fn apply_leaves_original_untouched() {
    let state = BoardState::new();
    let next = play(&state, "e2e4");
    assert_eq!(state.to_fen(), crate::board::START_FEN);
    assert_eq!(next.side_to_move(), Color::Black);
    assert_eq!(next.history().len(), 2);
}

#[test]
fn knight_shuffle_repeats_on_third_occurrence() {
    let mut state = BoardState::new();
    assert_eq!(state.repetition_count(), 1);
    for round in 0..2 {
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            state = play(&state, uci);
        }
        assert_eq!(state.repetition_count(), round + 2);
    }
    assert!(state.is_terminal_by_counters());
}

#[test]
fn fifty_move_counter_terminates() {
    let state = BoardState::from_fen("8/8/8/4k3/8/4K3/8/R7 w - - 99 80").unwrap();
    assert!(!state.is_terminal_by_counters());
    let next = play(&state, "a1a2");
    assert_eq!(next.halfmove_clock(), 100);
    assert!(next.is_terminal_by_counters());
}
