use super::*;

fn san_of(fen: &str, uci: &str) -> String {
    let pos = Position::from_fen(fen).unwrap();
    let mv = legal_moves(&pos)
        .into_iter()
        .find(|m| move_to_uci(*m) == uci)
        .unwrap_or_else(|| panic!("{uci} is not legal in {fen}"));
    to_san(&pos, mv)
}

#[test]
fn renders_simple_moves() {
    let start = crate::board::START_FEN;
    assert_eq!(san_of(start, "e2e4"), "e4");
    assert_eq!(san_of(start, "g1f3"), "Nf3");
}

#[test]
fn renders_pawn_capture_with_file() {
    let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
    assert_eq!(san_of(fen, "e4d5"), "exd5");
}

#[test]
fn renders_castling() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    assert_eq!(san_of(fen, "e1g1"), "O-O");
    assert_eq!(san_of(fen, "e1c1"), "O-O-O");
}

#[test]
fn disambiguates_by_file_then_rank() {
    // Knights on b1 and f1 can both reach d2.
    let fen = "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1";
    assert_eq!(san_of(fen, "b1d2"), "Nbd2");
    // Rooks on a1 and a5 share the file: use the rank.
    let fen = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
    assert_eq!(san_of(fen, "a1a3"), "R1a3");
}

#[test]
fn disambiguates_by_full_square() {
    // Queens on a1, a3 and c1 all reach b2.
    let fen = "4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1";
    assert_eq!(san_of(fen, "a1b2"), "Qa1b2");
}

#[test]
fn renders_promotion_and_check() {
    let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
    assert_eq!(san_of(fen, "e7e8q"), "e8=Q");
    assert_eq!(san_of(fen, "e7e8n"), "e8=N");
    let fen = "k7/4P3/8/8/8/8/8/4K3 w - - 0 1";
    assert_eq!(san_of(fen, "e7e8q"), "e8=Q+");
}

#[test]
fn renders_mate_suffix() {
    let fen = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2";
    assert_eq!(san_of(fen, "d8h4"), "Qh4#");
}

#[test]
fn uci_includes_promotion_letter() {
    let mv = Move::new(52, 60, PieceKind::Pawn).promoting(PieceKind::Knight);
    assert_eq!(move_to_uci(mv), "e7e8n");
}
