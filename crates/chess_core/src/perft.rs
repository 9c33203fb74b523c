use crate::{board::Position, movegen::legal_moves_into, san::move_to_uci, types::Move};

/// Counts all legal move sequences of exactly `depth` plies.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    count(pos, depth, &mut layers[..])
}

/// Per-root-move node counts, sorted by UCI string. Handy for bisecting a
/// mismatch against a reference engine's `go perft` output.
pub fn perft_divide(pos: &mut Position, depth: u8) -> Vec<(String, u64)> {
    let mut roots = Vec::with_capacity(64);
    legal_moves_into(pos, &mut roots);

    let mut layers = vec![Vec::with_capacity(64); depth.saturating_sub(1) as usize];
    let mut out: Vec<(String, u64)> = roots
        .into_iter()
        .map(|mv| {
            let undo = pos.make_move(mv);
            let nodes = count(pos, depth.saturating_sub(1), &mut layers[..]);
            pos.unmake_move(mv, undo);
            (move_to_uci(mv), nodes)
        })
        .collect();
    out.sort();
    out
}

fn count(pos: &mut Position, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
    let Some((buf, rest)) = layers.split_first_mut() else {
        return 1;
    };
    if depth == 0 {
        return 1;
    }

    legal_moves_into(pos, buf);
    if depth == 1 {
        return buf.len() as u64;
    }

    let mut nodes = 0u64;
    for i in 0..buf.len() {
        let mv = buf[i];
        let undo = pos.make_move(mv);
        nodes += count(pos, depth - 1, rest);
        pos.unmake_move(mv, undo);
    }
    nodes
}
