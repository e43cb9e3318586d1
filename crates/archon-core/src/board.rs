//! The board: packed squares, shape, side to move, castling, en passant, and counters.

use std::fmt;

use crate::castle_rights::{CastleRights, CastleSide};
use crate::color::Color;
use crate::error::BoardError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Smallest supported board side.
pub const MIN_SIZE: u8 = 5;

/// Outline of the playable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardShape {
    /// Every square is playable.
    #[default]
    Standard,
    /// The four corner blocks of side `size / 3` are cut away.
    Cross,
}

impl BoardShape {
    /// Return `true` if `(row, col)` is cut away on a board of `size`.
    pub const fn is_blocked(self, row: u8, col: u8, size: u8) -> bool {
        match self {
            BoardShape::Standard => false,
            BoardShape::Cross => {
                let corner = size / 3;
                let row_out = row < corner || row >= size - corner;
                let col_out = col < corner || col >= size - corner;
                row_out && col_out
            }
        }
    }
}

/// Complete position state over a flat array of packed piece codes.
///
/// A board is owned by exactly one search at a time and mutated in place
/// through paired [`make_move`](Board::make_move) / [`undo_move`](Board::undo_move)
/// calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    shape: BoardShape,
    /// One packed code per square, row-major from the top-left corner.
    squares: Vec<Piece>,
    /// Cut-away squares; never occupied, never crossed.
    blocked: Vec<bool>,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    halfmove_clock: u16,
    /// Starts at 1, incremented after Black moves.
    fullmove_number: u16,
    hash: u64,
    /// King square per color, kept in sync by every mutation.
    kings: [Option<Square>; Color::COUNT],
}

impl Board {
    /// Create an empty board of the given size and shape, White to move.
    pub fn empty(size: usize, shape: BoardShape) -> Result<Board, BoardError> {
        if !(MIN_SIZE as usize..=Square::MAX_SIZE as usize).contains(&size) {
            return Err(BoardError::UnsupportedSize { size });
        }
        let size = size as u8;
        let count = size as usize * size as usize;
        let blocked = (0..count)
            .map(|i| {
                let sq = Square::new(i as u8);
                shape.is_blocked(sq.row(size), sq.col(size), size)
            })
            .collect();

        let mut board = Board {
            size,
            shape,
            squares: vec![Piece::NONE; count],
            blocked,
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            kings: [None; Color::COUNT],
        };
        board.hash = zobrist::hash_from_scratch(&board);
        Ok(board)
    }

    /// The 9×9 classic setup: `R N B A K C B N R` behind a full pawn row.
    pub fn classic() -> Board {
        use PieceKind::*;
        Self::from_back_rank(&[Rook, Knight, Bishop, Archbishop, King, Chancellor, Bishop, Knight, Rook])
    }

    /// The orthodox 8×8 setup.
    pub fn standard() -> Board {
        use PieceKind::*;
        Self::from_back_rank(&[Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook])
    }

    /// Mirror-symmetric setup with `back_rank` on rows 0 and N-1 and pawns in front.
    fn from_back_rank(back_rank: &[PieceKind]) -> Board {
        let size = back_rank.len() as u8;
        let mut board = Board {
            size,
            shape: BoardShape::Standard,
            squares: vec![Piece::NONE; size as usize * size as usize],
            blocked: vec![false; size as usize * size as usize],
            side_to_move: Color::White,
            castling: CastleRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            kings: [None; Color::COUNT],
        };
        for color in Color::ALL {
            for (col, &kind) in back_rank.iter().enumerate() {
                let col = col as u8;
                if let Some(sq) = Square::from_coords(color.back_row(size), col, size) {
                    board.put_piece(sq, Piece::new(kind, color));
                }
                if let Some(sq) = Square::from_coords(color.pawn_home_row(size), col, size) {
                    board.put_piece(sq, Piece::new(PieceKind::Pawn, color));
                }
            }
        }
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Board side length.
    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Board outline.
    #[inline]
    pub fn shape(&self) -> BoardShape {
        self.shape
    }

    /// Number of squares, playable or not.
    #[inline]
    pub fn square_count(&self) -> usize {
        self.squares.len()
    }

    /// Packed code on `sq`.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.squares[sq.index()]
    }

    /// Return `true` if `sq` is cut away.
    #[inline]
    pub fn is_blocked(&self, sq: Square) -> bool {
        self.blocked[sq.index()]
    }

    /// Step from `sq` by `(dr, dc)`; `None` off the board or onto a blocked square.
    #[inline]
    pub fn step(&self, sq: Square, dr: i8, dc: i8) -> Option<Square> {
        let to = sq.offset(dr, dc, self.size)?;
        if self.blocked[to.index()] { None } else { Some(to) }
    }

    /// Square at `(row, col)` if it exists on this board.
    #[inline]
    pub fn square(&self, row: u8, col: u8) -> Option<Square> {
        Square::from_coords(row, col, self.size)
    }

    /// Iterate over every playable square.
    pub fn playable_squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.squares.len())
            .filter(|&i| !self.blocked[i])
            .map(|i| Square::new(i as u8))
    }

    /// Iterate over occupied squares with their pieces.
    pub fn occupied_squares(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_some())
            .map(|(i, &p)| (Square::new(i as u8), p))
    }

    /// Iterate over the squares and pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, PieceKind)> + '_ {
        self.occupied_squares().filter_map(move |(sq, p)| {
            if p.is_color(color) { p.kind().map(|k| (sq, k)) } else { None }
        })
    }

    /// King square for `color`, if that side has a king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Return the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Return the en passant target square, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Return the halfmove clock.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Return the fullmove number.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Return the Zobrist hash of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Place `piece` on `sq`, replacing whatever stood there.
    ///
    /// Setup helper: keeps the hash and king cache in sync but does not touch
    /// castling rights or en passant.
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.clear(sq);
        if piece.is_some() {
            self.place(sq, piece);
        }
    }

    /// Remove and return whatever stands on `sq`.
    pub fn remove_piece(&mut self, sq: Square) -> Piece {
        self.clear(sq)
    }

    /// Put `piece` on the empty square `sq`, updating hash and king cache.
    #[inline]
    pub(crate) fn place(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.squares[sq.index()].is_none());
        self.squares[sq.index()] = piece;
        self.hash ^= zobrist::piece_key(piece, sq);
        if let (Some(PieceKind::King), Some(color)) = (piece.kind(), piece.color()) {
            self.kings[color.index()] = Some(sq);
        }
    }

    /// Empty `sq`, updating hash and king cache. Returns the old content.
    #[inline]
    pub(crate) fn clear(&mut self, sq: Square) -> Piece {
        let piece = std::mem::take(&mut self.squares[sq.index()]);
        if piece.is_some() {
            self.hash ^= zobrist::piece_key(piece, sq);
            if let (Some(PieceKind::King), Some(color)) = (piece.kind(), piece.color()) {
                if self.kings[color.index()] == Some(sq) {
                    self.kings[color.index()] = None;
                }
            }
        }
        piece
    }

    /// Set the side to move, keeping the hash in sync.
    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.hash ^= zobrist::SIDE_TO_MOVE;
            self.side_to_move = color;
        }
    }

    /// Set the castling rights, keeping the hash in sync.
    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::CASTLING[self.castling.bits() as usize];
        self.castling = rights;
        self.hash ^= zobrist::CASTLING[rights.bits() as usize];
    }

    /// Set the en passant target, keeping the hash in sync.
    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= zobrist::EN_PASSANT_COL[old.col(self.size) as usize];
        }
        self.en_passant = sq;
        if let Some(new) = sq {
            self.hash ^= zobrist::EN_PASSANT_COL[new.col(self.size) as usize];
        }
    }

    /// Restore saved state verbatim, hash included. Used by undo.
    #[inline]
    pub(crate) fn restore_state(
        &mut self,
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
        hash: u64,
    ) {
        self.side_to_move = side_to_move;
        self.castling = castling;
        self.en_passant = en_passant;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.hash = hash;
    }

    #[inline]
    pub(crate) fn set_counters(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    /// Home square of the `color` king when it still has a castling right,
    /// paired with the rook's corner for `side`.
    pub fn castle_squares(&self, color: Color, side: CastleSide) -> Option<(Square, Square)> {
        if !self.castling.has(color, side) {
            return None;
        }
        let king = self.king_square(color)?;
        let row = color.back_row(self.size);
        let rook = self.square(row, side.rook_col(self.size))?;
        Some((king, rook))
    }

    /// Validate the structural integrity of the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self
                .pieces_of(color)
                .filter(|&(_, kind)| kind == PieceKind::King)
                .count();
            if count > 1 {
                let color = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(BoardError::TooManyKings { color, count });
            }
        }

        for (sq, piece) in self.occupied_squares() {
            if self.is_blocked(sq) {
                return Err(BoardError::PieceOnBlockedSquare {
                    square: sq.notation(self.size),
                });
            }
            if let (Some(PieceKind::Pawn), Some(color)) = (piece.kind(), piece.color()) {
                if sq.row(self.size) == color.promotion_row(self.size) {
                    return Err(BoardError::PawnOnPromotionRow {
                        square: sq.notation(self.size),
                    });
                }
            }
        }

        let letters = [
            (Color::White, CastleSide::KingSide, 'K'),
            (Color::White, CastleSide::QueenSide, 'Q'),
            (Color::Black, CastleSide::KingSide, 'k'),
            (Color::Black, CastleSide::QueenSide, 'q'),
        ];
        for (color, side, right) in letters {
            if !self.castling.has(color, side) {
                continue;
            }
            let in_place = self.castle_squares(color, side).is_some_and(|(king, rook)| {
                let row = color.back_row(self.size);
                let king_col = king.col(self.size) as i16;
                let target = king_col + 2 * side.direction() as i16;
                king.row(self.size) == row
                    && self.piece_at(rook).is(PieceKind::Rook, color)
                    && target > 0
                    && target < self.size as i16 - 1
            });
            if !in_place {
                return Err(BoardError::InconsistentCastling { right });
            }
        }

        Ok(())
    }

    /// The same position with rows flipped and colors swapped.
    pub fn mirrored(&self) -> Board {
        let size = self.size;
        let mut squares = vec![Piece::NONE; self.squares.len()];
        let mut blocked = vec![false; self.blocked.len()];
        for i in 0..self.squares.len() {
            let sq = Square::new(i as u8);
            let to = sq.mirrored(size).index();
            squares[to] = self.squares[i].flipped();
            blocked[to] = self.blocked[i];
        }

        let mut castling = CastleRights::NONE;
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if self.castling.has(color, side) {
                    castling = castling.with(color.flip(), side);
                }
            }
        }

        let mut board = Board {
            size,
            shape: self.shape,
            squares,
            blocked,
            side_to_move: self.side_to_move.flip(),
            castling,
            en_passant: self.en_passant.map(|sq| sq.mirrored(size)),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: 0,
            kings: [
                self.kings[Color::Black.index()].map(|sq| sq.mirrored(size)),
                self.kings[Color::White.index()].map(|sq| sq.mirrored(size)),
            ],
        };
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Return a pretty-printable wrapper for this board.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}

/// Wrapper for pretty-printing a board as a grid with coordinates.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        let size = board.size();
        for row in 0..size {
            write!(f, "{:>2}  ", size - row)?;
            for col in 0..size {
                let sq = Square::new(row * size + col);
                let c = if board.is_blocked(sq) {
                    ' '
                } else {
                    board.piece_at(sq).symbol()
                };
                if col + 1 < size {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "    ")?;
        for col in 0..size {
            let file = (b'a' + col) as char;
            if col + 1 < size {
                write!(f, "{file} ")?;
            } else {
                write!(f, "{file}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, BoardShape};
    use crate::color::Color;
    use crate::error::BoardError;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn sq(board: &Board, name: &str) -> Square {
        Square::parse(name, board.size()).unwrap()
    }

    #[test]
    fn classic_setup_validates() {
        let board = Board::classic();
        board.validate().unwrap();
        assert_eq!(board.size(), 9);
        assert_eq!(board.occupied_squares().count(), 36);
        assert_eq!(
            board.piece_at(sq(&board, "d1")),
            Piece::new(PieceKind::Archbishop, Color::White)
        );
        assert_eq!(
            board.piece_at(sq(&board, "f9")),
            Piece::new(PieceKind::Chancellor, Color::Black)
        );
        assert_eq!(board.king_square(Color::White), Some(sq(&board, "e1")));
        assert_eq!(board.king_square(Color::Black), Some(sq(&board, "e9")));
    }

    #[test]
    fn standard_setup_validates() {
        let board = Board::standard();
        board.validate().unwrap();
        assert_eq!(board.size(), 8);
        assert_eq!(board.occupied_squares().count(), 32);
    }

    #[test]
    fn empty_rejects_bad_sizes() {
        assert_eq!(
            Board::empty(4, BoardShape::Standard),
            Err(BoardError::UnsupportedSize { size: 4 })
        );
        assert!(Board::empty(17, BoardShape::Standard).is_err());
        assert!(Board::empty(16, BoardShape::Standard).is_ok());
    }

    #[test]
    fn cross_shape_blocks_corners() {
        let board = Board::empty(9, BoardShape::Cross).unwrap();
        assert_eq!(board.playable_squares().count(), 81 - 4 * 9);
        assert!(board.is_blocked(sq(&board, "a1")));
        assert!(board.is_blocked(sq(&board, "c3")));
        assert!(!board.is_blocked(sq(&board, "d1")));
        assert!(!board.is_blocked(sq(&board, "a4")));
    }

    #[test]
    fn step_stops_at_blocked_and_edges() {
        let board = Board::empty(9, BoardShape::Cross).unwrap();
        let d1 = sq(&board, "d1");
        assert_eq!(board.step(d1, 0, -1), None);
        assert_eq!(board.step(d1, -1, 0), Some(sq(&board, "d2")));
        assert_eq!(board.step(d1, 1, 0), None);
    }

    #[test]
    fn put_and_remove_keep_hash_and_kings_in_sync() {
        let mut board = Board::empty(8, BoardShape::Standard).unwrap();
        let e1 = sq(&board, "e1");
        board.put_piece(e1, Piece::new(PieceKind::King, Color::White));
        assert_eq!(board.king_square(Color::White), Some(e1));
        assert_eq!(board.hash(), crate::zobrist::hash_from_scratch(&board));

        assert_eq!(board.remove_piece(e1), Piece::new(PieceKind::King, Color::White));
        assert_eq!(board.king_square(Color::White), None);
        assert_eq!(board.hash(), crate::zobrist::hash_from_scratch(&board));
    }

    #[test]
    fn validate_rejects_piece_on_blocked_square() {
        let mut board = Board::empty(9, BoardShape::Cross).unwrap();
        let a1 = sq(&board, "a1");
        board.put_piece(a1, Piece::new(PieceKind::Rook, Color::White));
        assert!(matches!(
            board.validate(),
            Err(BoardError::PieceOnBlockedSquare { .. })
        ));
    }

    #[test]
    fn mirrored_swaps_sides() {
        let board = Board::classic();
        let mirror = board.mirrored();
        assert_eq!(mirror.side_to_move(), Color::Black);
        assert_eq!(
            mirror.king_square(Color::White),
            Some(sq(&board, "e1"))
        );
        assert_eq!(mirror.hash(), crate::zobrist::hash_from_scratch(&mirror));
        assert_eq!(mirror.mirrored().hash(), board.hash());
    }

    #[test]
    fn pretty_print() {
        let output = format!("{}", Board::classic().pretty());
        assert!(output.contains("r n b a k c b n r"));
        assert!(output.contains("R N B A K C B N R"));
        assert!(output.contains("a b c d e f g h i"));
    }
}
