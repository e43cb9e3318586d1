//! Piece mobility evaluation.
//!
//! Mobility measures how many safe squares each piece can reach. Pieces with
//! greater freedom of movement receive a bonus proportional to their mobility.
//! Safe squares exclude friendly-occupied squares and squares controlled by
//! enemy pawns.

use archon_core::{Board, Color, Piece, PieceKind, Square, offsets};

use crate::eval::score::{S, Score};

/// Per-square mobility bonus for `kind`. Pawns and kings earn none.
const fn mobility_weight(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Knight => S(4, 4),
        PieceKind::Bishop => S(3, 5),
        PieceKind::Rook => S(2, 3),
        PieceKind::Queen => S(1, 2),
        PieceKind::Archbishop | PieceKind::Chancellor => S(2, 3),
        PieceKind::Angel => S(1, 2),
        PieceKind::Nightrider => S(2, 2),
        PieceKind::Pawn | PieceKind::King => S(0, 0),
    }
}

/// Return `true` if a pawn of `by` attacks `sq`.
fn pawn_guards(board: &Board, sq: Square, by: Color) -> bool {
    let pawn = Piece::new(PieceKind::Pawn, by);
    [-1, 1].into_iter().any(|dc| {
        board
            .step(sq, -by.forward(), dc)
            .is_some_and(|from| board.piece_at(from) == pawn)
    })
}

/// Count safe destinations of the piece of `kind` on `from`.
fn count_moves(board: &Board, from: Square, kind: PieceKind, color: Color) -> i32 {
    let mut count = 0;
    let mut consider = |to: Square| {
        let target = board.piece_at(to);
        if !target.is_color(color) && !pawn_guards(board, to, color.flip()) {
            count += 1;
        }
        target.is_none()
    };

    if kind.leaps_like_knight() {
        for (dr, dc) in offsets::KNIGHT {
            if let Some(to) = board.step(from, dr, dc) {
                consider(to);
            }
        }
    }

    let mut rays: Vec<(i8, i8)> = Vec::with_capacity(16);
    if kind.slides_orthogonally() {
        rays.extend(offsets::ORTHOGONAL);
    }
    if kind.slides_diagonally() {
        rays.extend(offsets::DIAGONAL);
    }
    if kind.rides_knight() {
        rays.extend(offsets::KNIGHT);
    }
    for (dr, dc) in rays {
        let mut cur = from;
        while let Some(to) = board.step(cur, dr, dc) {
            if !consider(to) {
                break;
            }
            cur = to;
        }
    }

    count
}

/// Evaluate piece mobility for one side.
fn evaluate_mobility_for_side(board: &Board, color: Color) -> Score {
    board
        .pieces_of(color)
        .filter(|&(_, kind)| !matches!(kind, PieceKind::Pawn | PieceKind::King))
        .fold(Score::ZERO, |acc, (sq, kind)| {
            acc + mobility_weight(kind) * count_moves(board, sq, kind, color)
        })
}

/// Evaluate piece mobility from White's perspective.
pub fn evaluate_mobility(board: &Board) -> Score {
    evaluate_mobility_for_side(board, Color::White) - evaluate_mobility_for_side(board, Color::Black)
}
