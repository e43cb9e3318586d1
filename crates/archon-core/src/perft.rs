//! Perft (performance test) for move generation correctness verification.

use crate::board::Board;
use crate::movegen::{MoveList, legal_moves_into};

/// Count the number of leaf nodes at the given depth.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the number
/// of legal moves without playing them.
pub fn perft(board: &Board, depth: usize) -> u64 {
    let mut scratch = board.clone();
    perft_inner(&mut scratch, depth)
}

fn perft_inner(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    legal_moves_into(board, &mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &mv in &moves {
        let undo = board.make_move(mv);
        nodes += perft_inner(board, depth - 1);
        board.undo_move(mv, undo);
    }
    nodes
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns a vector of `(move notation, node_count)` pairs sorted alphabetically.
pub fn divide(board: &Board, depth: usize) -> Vec<(String, u64)> {
    let mut scratch = board.clone();
    let mut moves = MoveList::new();
    legal_moves_into(&mut scratch, &mut moves);

    let size = board.size();
    let mut results: Vec<(String, u64)> = moves
        .as_slice()
        .iter()
        .map(|&mv| {
            let undo = scratch.make_move(mv);
            let count = if depth <= 1 {
                1
            } else {
                perft_inner(&mut scratch, depth - 1)
            };
            scratch.undo_move(mv, undo);
            (mv.notation(size), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
