//! Pawn move generation.

use crate::board::Board;
use crate::chess_move::Move;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::{GenMode, MoveList, is_enemy_non_king};

fn push_promotions(from: Square, to: Square, list: &mut MoveList) {
    for promo in PieceKind::PROMOTIONS {
        list.push(Move::new_promotion(from, to, promo));
    }
}

/// Generate pseudo-legal pawn moves for the side to move.
pub(super) fn gen_pawns(board: &Board, mode: GenMode, list: &mut MoveList) {
    let us = board.side_to_move();
    let size = board.size();
    let fwd = us.forward();
    let promo_row = us.promotion_row(size);
    let home_row = us.pawn_home_row(size);

    let pawns: Vec<Square> = board
        .pieces_of(us)
        .filter(|&(_, kind)| kind == PieceKind::Pawn)
        .map(|(sq, _)| sq)
        .collect();

    for from in pawns {
        // Pushes
        if mode == GenMode::All {
            if let Some(one) = board.step(from, fwd, 0) {
                if board.piece_at(one).is_none() {
                    if one.row(size) == promo_row {
                        push_promotions(from, one, list);
                    } else {
                        list.push(Move::new(from, one));
                        if from.row(size) == home_row {
                            if let Some(two) = board.step(one, fwd, 0) {
                                if board.piece_at(two).is_none() {
                                    list.push(Move::new(from, two));
                                }
                            }
                        }
                    }
                }
            }
        }

        // Captures
        for dc in [-1, 1] {
            let Some(to) = board.step(from, fwd, dc) else {
                continue;
            };
            let target = board.piece_at(to);
            if is_enemy_non_king(board, target) {
                if to.row(size) == promo_row {
                    push_promotions(from, to, list);
                } else {
                    list.push(Move::new(from, to));
                }
            } else if target.is_none() && board.en_passant() == Some(to) {
                list.push(Move::new_en_passant(from, to));
            }
        }
    }
}
