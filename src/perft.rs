//! Leaf counting over the legal move tree, used to certify move generation.

use crate::board::{Board, Move};
use crate::rules::legal_moves;

/// Number of leaves `depth` plies below `board`. Depth 0 counts the position itself.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        let undo = board.apply_move(mv);
        nodes += perft(board, depth - 1);
        board.undo_move(undo);
    }
    nodes
}

/// Leaf count contributed by each root move, in generator order.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut scratch = board.clone();
    legal_moves(board)
        .into_iter()
        .map(|mv| {
            let undo = scratch.apply_move(mv);
            let count = perft(&mut scratch, depth - 1);
            scratch.undo_move(undo);
            (mv, count)
        })
        .collect()
}
