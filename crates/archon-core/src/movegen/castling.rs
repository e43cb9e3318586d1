//! Castling generation for any board size.

use crate::board::Board;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;

use super::MoveList;

/// Generate castling moves for the side to move.
///
/// The king moves two columns toward the corner rook and the rook lands on
/// the square the king crossed. Every square between them must be empty and
/// playable; the king may not be in check or cross or land on an attacked square.
pub(super) fn gen_castling(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    let size = board.size();

    for side in CastleSide::ALL {
        let Some((king, rook)) = board.castle_squares(us, side) else {
            continue;
        };
        if king.row(size) != us.back_row(size) {
            continue;
        }
        let dir = side.direction();

        let Some(dest) = king.offset(0, 2 * dir, size) else {
            continue;
        };
        let dest_col = dest.col(size);
        if dest_col == 0 || dest_col >= size - 1 {
            continue;
        }

        let mut path_clear = true;
        let mut cur = king;
        loop {
            match board.step(cur, 0, dir) {
                Some(next) if next == rook => break,
                Some(next) if board.piece_at(next).is_none() => cur = next,
                _ => {
                    path_clear = false;
                    break;
                }
            }
        }
        if !path_clear {
            continue;
        }

        if board.is_square_attacked(king, them) {
            return;
        }
        let crossed = king.offset(0, dir, size);
        let safe = crossed.is_some_and(|sq| !board.is_square_attacked(sq, them))
            && !board.is_square_attacked(dest, them);
        if safe {
            list.push(Move::new_castle(king, dest));
        }
    }
}
