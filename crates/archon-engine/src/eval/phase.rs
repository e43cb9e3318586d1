//! Game phase calculation based on remaining non-pawn material.

use archon_core::{Board, PieceKind};

/// Maximum game phase value, corresponding to a full complement of
/// non-pawn material in an orthodox setup.
pub const MAX_PHASE: i32 = 24;

/// Phase weight of a single piece of `kind`.
///
/// | Piece      | Weight |
/// |------------|--------|
/// | Knight     | 1      |
/// | Bishop     | 1      |
/// | Rook       | 2      |
/// | Nightrider | 2      |
/// | Archbishop | 3      |
/// | Chancellor | 3      |
/// | Queen      | 4      |
/// | Angel      | 4      |
#[inline]
pub const fn phase_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn | PieceKind::King => 0,
        PieceKind::Knight | PieceKind::Bishop => 1,
        PieceKind::Rook | PieceKind::Nightrider => 2,
        PieceKind::Archbishop | PieceKind::Chancellor => 3,
        PieceKind::Queen | PieceKind::Angel => 4,
    }
}

/// Calculate the game phase from non-pawn, non-king material on the board.
///
/// Returns a value in `0..=MAX_PHASE`. The larger boards carry more pieces
/// than the orthodox set, so the sum is clamped: any position at least as
/// rich as the orthodox opening counts as a full middlegame.
pub fn game_phase(board: &Board) -> i32 {
    let phase: i32 = board
        .occupied_squares()
        .filter_map(|(_, piece)| piece.kind())
        .map(phase_weight)
        .sum();
    phase.min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use archon_core::Board;

    use super::{MAX_PHASE, game_phase};

    #[test]
    fn starting_position_is_max_phase() {
        assert_eq!(game_phase(&Board::standard()), MAX_PHASE);
        assert_eq!(game_phase(&Board::classic()), MAX_PHASE);
    }

    #[test]
    fn bare_kings_is_zero_phase() {
        let board: Board = "8/8/4k3/8/8/4K3/8/8 w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), 0);
    }

    #[test]
    fn missing_one_queen_is_20() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(game_phase(&board), 20);
    }

    #[test]
    fn compound_pieces_count() {
        let board: Board = "4k3/8/8/8/8/8/8/AC2K1EJ w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), 3 + 3 + 4 + 2);
    }
}
