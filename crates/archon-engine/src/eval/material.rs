//! Material balance evaluation.
//!
//! Counts weighted piece material for each side and adds a bishop-pair bonus.
//! All scores are returned from White's perspective (positive = White ahead).

use archon_core::{Board, Color, PieceKind};

use crate::eval::score::{S, Score};

/// Exchange value of a king in static exchange evaluation. Large enough that
/// no sequence ever trades into it.
pub const KING_VALUE: i32 = 20_000;

/// Base material values indexed by [`PieceKind::index()`].
///
/// | Piece      | mg   | eg   |
/// |------------|------|------|
/// | Pawn       | 100  | 120  |
/// | Knight     | 320  | 310  |
/// | Bishop     | 330  | 340  |
/// | Rook       | 500  | 520  |
/// | Queen      | 900  | 950  |
/// | King       | 0    | 0    |
/// | Archbishop | 600  | 620  |
/// | Chancellor | 700  | 740  |
/// | Angel      | 1000 | 1060 |
/// | Nightrider | 600  | 560  |
pub const MATERIAL_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 120),   // Pawn
    S(320, 310),   // Knight
    S(330, 340),   // Bishop
    S(500, 520),   // Rook
    S(900, 950),   // Queen
    S(0, 0),       // King
    S(600, 620),   // Archbishop
    S(700, 740),   // Chancellor
    S(1000, 1060), // Angel
    S(600, 560),   // Nightrider
];

/// Bonus awarded to a side that has two or more bishops.
pub const BISHOP_PAIR_BONUS: Score = S(50, 50);

/// Flat centipawn value of a piece, used by exchange evaluation and ordering.
#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => KING_VALUE,
        PieceKind::Archbishop => 600,
        PieceKind::Chancellor => 700,
        PieceKind::Angel => 1000,
        PieceKind::Nightrider => 600,
    }
}

/// Sum of flat piece values for `color`, kings excluded.
pub fn side_material(board: &Board, color: Color) -> i32 {
    board
        .pieces_of(color)
        .filter(|&(_, kind)| kind != PieceKind::King)
        .map(|(_, kind)| piece_value(kind))
        .sum()
}

/// Return `true` if `color` has any piece other than pawns and its king.
pub fn has_non_pawn_material(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(_, kind)| !matches!(kind, PieceKind::Pawn | PieceKind::King))
}

/// Evaluate material balance from White's perspective.
///
/// Returns a positive score when White has more material, negative when
/// Black does. Either side owning two or more bishops earns
/// [`BISHOP_PAIR_BONUS`].
pub fn material(board: &Board) -> Score {
    let mut score = Score::ZERO;
    let mut bishops = [0u8; Color::COUNT];

    for (_, piece) in board.occupied_squares() {
        let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
            continue;
        };
        let value = MATERIAL_VALUE[kind.index()];
        match color {
            Color::White => score += value,
            Color::Black => score -= value,
        }
        if kind == PieceKind::Bishop {
            bishops[color.index()] += 1;
        }
    }

    if bishops[Color::White.index()] >= 2 {
        score += BISHOP_PAIR_BONUS;
    }
    if bishops[Color::Black.index()] >= 2 {
        score -= BISHOP_PAIR_BONUS;
    }

    score
}
