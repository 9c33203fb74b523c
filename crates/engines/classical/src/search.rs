//! Negamax search with alpha-beta pruning

use std::time::Instant;

use chess_core::{Move, Position, legal_moves_into};

use crate::eval::evaluate;

const MATE_SCORE: i32 = 100_000;
/// How often (in nodes) the deadline is polled.
const CHECK_INTERVAL: u64 = 1024;

/// Result of a root search.
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    /// Best move found (if any legal moves exist) and its score
    pub best_move: Option<(Move, i32)>,
    /// True if the deadline cut the search short
    pub stopped: bool,
}

struct Limits {
    deadline: Option<Instant>,
    stopped: bool,
}

impl Limits {
    fn expired(&mut self, nodes: u64) -> bool {
        if !self.stopped
            && nodes.is_multiple_of(CHECK_INTERVAL)
            && let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            self.stopped = true;
        }
        self.stopped
    }
}

/// Searches `pos` to `depth` plies and returns the best move with its score.
///
/// `history` holds the zobrist hashes of the game so far (current position
/// last) so that repetition draws are scored as zero inside the tree.
/// If `deadline` passes mid-search the best fully searched root move is kept.
pub fn pick_best_move(
    pos: &Position,
    depth: u8,
    history: &[u64],
    deadline: Option<Instant>,
    nodes: &mut u64,
) -> SearchOutcome {
    let mut tmp = pos.clone();
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut moves);

    if moves.is_empty() {
        return SearchOutcome {
            best_move: None,
            stopped: false,
        };
    }

    let mut limits = Limits {
        deadline,
        stopped: false,
    };
    let mut best = moves[0];
    let mut best_score = i32::MIN + 1;

    let mut keys = Vec::with_capacity(history.len() + depth as usize + 1);
    keys.extend_from_slice(history);
    if keys.last() != Some(&tmp.position_hash()) {
        keys.push(tmp.position_hash());
    }

    for mv in moves {
        let undo = tmp.make_move(mv);
        keys.push(tmp.position_hash());
        *nodes += 1;

        let score = -negamax(
            &mut tmp,
            depth.saturating_sub(1),
            1,
            -MATE_SCORE * 2,
            MATE_SCORE * 2,
            &mut keys,
            nodes,
            &mut limits,
        );

        keys.pop();
        tmp.unmake_move(mv, undo);

        if limits.stopped {
            break;
        }

        if score > best_score {
            best_score = score;
            best = mv;
        }
    }

    SearchOutcome {
        best_move: Some((best, best_score)),
        stopped: limits.stopped,
    }
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    pos: &mut Position,
    depth: u8,
    ply: i32,
    mut alpha: i32,
    beta: i32,
    keys: &mut Vec<u64>,
    nodes: &mut u64,
    limits: &mut Limits,
) -> i32 {
    if limits.expired(*nodes) {
        return 0;
    }

    if pos.is_fifty_move_draw() || pos.is_insufficient_material() {
        return 0;
    }

    if let Some(&current) = keys.last()
        && keys.iter().filter(|&&k| k == current).count() >= 3
    {
        return 0;
    }

    let mut moves = Vec::with_capacity(64);
    legal_moves_into(pos, &mut moves);

    if moves.is_empty() {
        if pos.in_check(pos.side_to_move) {
            // Prefer the shortest mate.
            return -MATE_SCORE + ply;
        }
        return 0;
    }

    if depth == 0 {
        return evaluate(pos);
    }

    let mut best = i32::MIN + 1;

    for mv in moves {
        let undo = pos.make_move(mv);
        keys.push(pos.position_hash());
        *nodes += 1;

        let score = -negamax(pos, depth - 1, ply + 1, -beta, -alpha, keys, nodes, limits);

        keys.pop();
        pos.unmake_move(mv, undo);

        if limits.stopped {
            return best;
        }

        if score > best {
            best = score;
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }

    best
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
