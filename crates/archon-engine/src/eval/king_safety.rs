//! King safety: the pawn shield in front of each king, and the attacking
//! pressure each side's pieces put on the enemy king.

use archon_core::{Board, Color, Piece, PieceKind};

use crate::eval::score::{S, Score};

/// Bonus for each friendly pawn in the king's shield (middlegame only).
const SHIELD_PAWN_BONUS: Score = S(15, 0);

/// Bonus per step of closeness to the enemy king, within [`ATTACK_RANGE`].
const ATTACK_PROXIMITY: i32 = 6;

/// Chebyshev distance beyond which a piece exerts no king pressure.
const ATTACK_RANGE: i32 = 4;

/// Bonus for a piece standing in the enemy half of the board.
const FORWARD_PLACEMENT: i32 = 5;

/// Count friendly pawns on the up-to-three squares directly in front of the king.
fn shield_pawns(board: &Board, color: Color) -> i32 {
    let Some(king) = board.king_square(color) else {
        return 0;
    };
    let pawn = Piece::new(PieceKind::Pawn, color);
    (-1..=1)
        .filter_map(|dc| board.step(king, color.forward(), dc))
        .filter(|&sq| board.piece_at(sq) == pawn)
        .count() as i32
}

/// Evaluate pawn-shield coverage from White's perspective.
pub fn evaluate_king_safety(board: &Board) -> Score {
    let white = shield_pawns(board, Color::White);
    let black = shield_pawns(board, Color::Black);
    SHIELD_PAWN_BONUS * (white - black)
}

/// Attacking pressure of one side's pieces, from that side's perspective.
fn pressure_for_side(board: &Board, color: Color) -> i32 {
    let size = board.size();
    let enemy_king = board.king_square(color.flip());
    let half = size as i32 / 2;

    board
        .pieces_of(color)
        .filter(|&(_, kind)| !matches!(kind, PieceKind::Pawn | PieceKind::King))
        .map(|(sq, _)| {
            let near = enemy_king.map_or(0, |king| {
                (ATTACK_RANGE + 1 - sq.distance(king, size) as i32).max(0) * ATTACK_PROXIMITY
            });
            let forward = if color.relative_row(sq.row(size), size) as i32 >= half {
                FORWARD_PLACEMENT
            } else {
                0
            };
            near + forward
        })
        .sum()
}

/// King-proximity and forward-placement pressure from White's perspective.
///
/// Middlegame only: in the ending king proximity is handled by mop-up.
pub fn attack_pressure(board: &Board) -> Score {
    let white = pressure_for_side(board, Color::White);
    let black = pressure_for_side(board, Color::Black);
    S(white - black, 0)
}

#[cfg(test)]
mod tests {
    use archon_core::Board;

    use super::{SHIELD_PAWN_BONUS, attack_pressure, evaluate_king_safety};
    use crate::eval::score::Score;

    #[test]
    fn starting_positions_are_balanced() {
        assert_eq!(evaluate_king_safety(&Board::standard()), Score::ZERO);
        assert_eq!(attack_pressure(&Board::standard()), Score::ZERO);
        assert_eq!(evaluate_king_safety(&Board::classic()), Score::ZERO);
        assert_eq!(attack_pressure(&Board::classic()), Score::ZERO);
    }

    #[test]
    fn missing_white_shield_pawn() {
        // White king g1 with f2 and h2 only; Black king e8 with d7, e7, f7.
        let board: Board = "4k3/3ppp2/8/8/8/8/5P1P/6K1 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_king_safety(&board), SHIELD_PAWN_BONUS * (2 - 3));
    }

    #[test]
    fn edge_king_has_two_shield_squares() {
        let board: Board = "4k3/8/8/8/8/8/PP6/K7 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_king_safety(&board), SHIELD_PAWN_BONUS * 2);
    }

    #[test]
    fn piece_near_enemy_king_adds_pressure() {
        let near: Board = "4k3/8/4Q3/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let far: Board = "4k3/8/8/8/8/8/Q7/4K3 w - - 0 1".parse().unwrap();
        assert!(attack_pressure(&near).mg() > attack_pressure(&far).mg());
        assert!(attack_pressure(&near).mg() > 0);
        assert_eq!(attack_pressure(&near).eg(), 0);
    }

    #[test]
    fn mirror_negates() {
        let board: Board = "4k3/3pp3/8/2N5/8/8/5PPP/1r4K1 w - - 0 1".parse().unwrap();
        let mirrored = board.mirrored();
        assert_eq!(attack_pressure(&board), -attack_pressure(&mirrored));
        assert_eq!(evaluate_king_safety(&board), -evaluate_king_safety(&mirrored));
    }
}
