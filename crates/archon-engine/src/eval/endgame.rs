//! Mop-up: drive the losing king to the edge once one side is clearly ahead.

use archon_core::{Board, Color};

use crate::eval::material::side_material;
use crate::eval::pst::{CENTER_STEPS, centrality};
use crate::eval::score::{S, Score};

/// Material lead (centipawns) from which mop-up applies.
pub const MOP_UP_THRESHOLD: i32 = 200;

/// Bonus per step the losing king stands away from the center.
const EDGE_PUSH: i32 = 10;

/// Bonus per step the winning king closes in on the losing king.
const KING_APPROACH: i32 = 4;

/// Mop-up bonus from White's perspective, endgame half only.
///
/// Zero unless one side leads by at least [`MOP_UP_THRESHOLD`] of material.
pub fn mop_up(board: &Board) -> Score {
    let lead = side_material(board, Color::White) - side_material(board, Color::Black);
    if lead.abs() < MOP_UP_THRESHOLD {
        return Score::ZERO;
    }
    let (winner, loser) = if lead > 0 {
        (Color::White, Color::Black)
    } else {
        (Color::Black, Color::White)
    };
    let (Some(ours), Some(theirs)) = (board.king_square(winner), board.king_square(loser)) else {
        return Score::ZERO;
    };

    let size = board.size();
    let edge = CENTER_STEPS - centrality(theirs.row(size), theirs.col(size), size);
    let closeness = size as i32 - 1 - ours.distance(theirs, size) as i32;
    let bonus = S(0, edge * EDGE_PUSH + closeness * KING_APPROACH);

    match winner {
        Color::White => bonus,
        Color::Black => -bonus,
    }
}
