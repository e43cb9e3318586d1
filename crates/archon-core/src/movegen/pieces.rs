//! Leaper, slider, and rider move generation for every non-pawn piece.

use crate::board::Board;
use crate::offsets;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::{GenMode, MoveList, push_target};

/// Walk from `from` along `(dr, dc)` until the edge, a blocked square, or a piece.
fn gen_ray(board: &Board, from: Square, (dr, dc): (i8, i8), mode: GenMode, list: &mut MoveList) {
    let mut cur = from;
    while let Some(to) = board.step(cur, dr, dc) {
        if !push_target(board, from, to, mode, list) {
            break;
        }
        cur = to;
    }
}

/// Generate pseudo-legal moves for knights, kings, sliders, hybrids, and riders.
pub(super) fn gen_pieces(board: &Board, mode: GenMode, list: &mut MoveList) {
    let us = board.side_to_move();
    let pieces: Vec<(Square, PieceKind)> = board
        .pieces_of(us)
        .filter(|&(_, kind)| kind != PieceKind::Pawn)
        .collect();

    for (from, kind) in pieces {
        if kind.leaps_like_knight() {
            for (dr, dc) in offsets::KNIGHT {
                if let Some(to) = board.step(from, dr, dc) {
                    push_target(board, from, to, mode, list);
                }
            }
        }
        if kind == PieceKind::King {
            for (dr, dc) in offsets::KING {
                if let Some(to) = board.step(from, dr, dc) {
                    push_target(board, from, to, mode, list);
                }
            }
        }
        if kind.slides_orthogonally() {
            for dir in offsets::ORTHOGONAL {
                gen_ray(board, from, dir, mode, list);
            }
        }
        if kind.slides_diagonally() {
            for dir in offsets::DIAGONAL {
                gen_ray(board, from, dir, mode, list);
            }
        }
        if kind.rides_knight() {
            for dir in offsets::KNIGHT {
                gen_ray(board, from, dir, mode, list);
            }
        }
    }
}
