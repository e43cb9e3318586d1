//! Piece-square bonuses for every piece kind on any board size.
//!
//! Fixed 64-entry tables do not fit boards from 5×5 to 16×16, so each bonus
//! is computed from two size-independent coordinates: how central a square
//! is and how far it lies from the owner's back row. Both are measured
//! relative to the owner, which keeps the terms mirror-symmetric.

use archon_core::{Board, Color, PieceKind, Square};

use crate::eval::score::{S, Score};

/// Centrality buckets run from 0 (edge) to this value (center).
pub(crate) const CENTER_STEPS: i32 = 6;

/// Centrality of `(row, col)`: 0 on the outer ring, [`CENTER_STEPS`] in the middle.
#[inline]
pub(crate) fn centrality(row: u8, col: u8, size: u8) -> i32 {
    let n = size as i32 - 1;
    let dr = (2 * row as i32 - n).abs();
    let dc = (2 * col as i32 - n).abs();
    (n - dr.max(dc)) * CENTER_STEPS / n
}

/// Column centrality only, same scale as [`centrality`].
#[inline]
fn file_centrality(col: u8, size: u8) -> i32 {
    let n = size as i32 - 1;
    (n - (2 * col as i32 - n).abs()) * CENTER_STEPS / n
}

/// Piece-square bonus for a `color` piece of `kind` standing on `sq`.
pub fn pst_value(kind: PieceKind, color: Color, sq: Square, size: u8) -> Score {
    let row = sq.row(size);
    let col = sq.col(size);
    let c = centrality(row, col, size);
    // 0 on the owner's back row, size - 1 on the far edge.
    let rank = color.relative_row(row, size) as i32;
    let last = size as i32 - 1;

    match kind {
        PieceKind::Pawn => {
            // Pawns start one row up; the promotion row itself never holds a pawn.
            let advance = (rank - 1).max(0);
            S(advance * 5 + file_centrality(col, size) * 3, advance * 10)
        }
        PieceKind::Knight | PieceKind::Archbishop => S(c * 8 - 20, c * 6 - 15),
        PieceKind::Nightrider => S(c * 5 - 10, c * 4 - 8),
        PieceKind::Bishop => S(c * 4 - 8, c * 4 - 8),
        PieceKind::Rook | PieceKind::Chancellor => {
            let seventh = if rank == last - 1 { 20 } else { 0 };
            S(c + seventh, c + seventh / 2)
        }
        PieceKind::Queen | PieceKind::Angel => S(c * 2 - 5, c * 4 - 10),
        PieceKind::King => {
            // Shelter on the back row in the middlegame, centralize in the ending.
            let shelter = if rank == 0 { 20 } else { -10 * rank.min(4) };
            let corner = (CENTER_STEPS - file_centrality(col, size)) * 3;
            S(shelter + corner, c * 8 - 24)
        }
    }
}

/// Sum of piece-square bonuses from White's perspective.
pub fn psqt(board: &Board) -> Score {
    let size = board.size();
    let mut score = Score::ZERO;
    for (sq, piece) in board.occupied_squares() {
        let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
            continue;
        };
        let value = pst_value(kind, color, sq, size);
        match color {
            Color::White => score += value,
            Color::Black => score -= value,
        }
    }
    score
}
