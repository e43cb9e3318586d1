//! Static Exchange Evaluation (SEE).
//!
//! Determines the material outcome of a sequence of captures on a single square,
//! assuming both sides use their least valuable attacker at each step.

use archon_core::{Board, Color, Move, PieceKind, Square};

use crate::eval::material::piece_value;

/// Longest exchange tracked; each step removes a piece, so this is never reached
/// on a legal board of up to 16×16 with two full armies.
const MAX_EXCHANGE: usize = 64;

/// Find the least valuable piece of `side` attacking `sq`, ignoring `removed`.
fn least_valuable_attacker(
    board: &Board,
    sq: Square,
    side: Color,
    removed: &[Square],
) -> Option<(Square, PieceKind)> {
    let mut best: Option<(Square, PieceKind)> = None;
    board.for_each_attacker(sq, side, removed, |from, kind| {
        if best.is_none_or(|(_, b)| piece_value(kind) < piece_value(b)) {
            best = Some((from, kind));
        }
    });
    best
}

/// Value of `kind` once it stands on `dst`: a pawn reaching the last row
/// counts as the piece it promotes to.
fn value_on(
    board: &Board,
    kind: PieceKind,
    side: Color,
    dst: Square,
    promo: Option<PieceKind>,
) -> i32 {
    let size = board.size();
    if kind == PieceKind::Pawn && dst.row(size) == side.promotion_row(size) {
        return piece_value(promo.unwrap_or(PieceKind::Angel));
    }
    piece_value(kind)
}

/// Full Static Exchange Evaluation.
///
/// Returns the material gain/loss from the side-to-move's perspective
/// after all profitable recaptures on the target square. Non-captures
/// score zero.
pub fn see(board: &Board, mv: Move) -> i32 {
    let src = mv.source();
    let dst = mv.dest();
    let us = board.side_to_move();
    let size = board.size();

    let Some(attacker_kind) = board.piece_at(src).kind() else {
        return 0;
    };

    let mut removed: Vec<Square> = Vec::with_capacity(16);
    removed.push(src);

    let victim_value = if mv.is_en_passant() {
        // The captured pawn stands beside the source, on the destination column.
        if let Some(victim) = Square::from_coords(src.row(size), dst.col(size), size) {
            removed.push(victim);
        }
        piece_value(PieceKind::Pawn)
    } else {
        match board.piece_at(dst).kind() {
            Some(victim) if !board.piece_at(dst).is_color(us) => piece_value(victim),
            _ => return 0,
        }
    };

    let mut gain = [0i32; MAX_EXCHANGE];
    let mut depth = 0usize;
    gain[0] = victim_value;

    // The piece now standing on dst, and thus the next victim.
    let mut next_victim_value = value_on(board, attacker_kind, us, dst, mv.promotion());
    let mut side = us.flip();

    while let Some((sq, kind)) = least_valuable_attacker(board, dst, side, &removed) {
        depth += 1;
        if depth >= MAX_EXCHANGE {
            depth -= 1;
            break;
        }

        gain[depth] = next_victim_value - gain[depth - 1];
        next_victim_value = value_on(board, kind, side, dst, None);

        // Removing the attacker uncovers any slider or rider behind it.
        removed.push(sq);
        side = side.flip();
    }

    // Back-propagate: each side only continues the exchange if it pays.
    while depth > 0 {
        depth -= 1;
        gain[depth] = -((-gain[depth]).max(gain[depth + 1]));
    }

    gain[0]
}

/// Threshold version of SEE: returns true if the SEE score >= threshold.
pub fn see_ge(board: &Board, mv: Move, threshold: i32) -> bool {
    see(board, mv) >= threshold
}
