//! Adapter between [`Board`] and a row-major grid of optional piece objects.
//!
//! Front ends describe a position as `grid[row][col]` with a `has_moved`
//! flag per piece. Castling rights and the en passant target are derived
//! from those flags and the last move played.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, BoardShape};
use crate::castle_rights::{CastleRights, CastleSide};
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::BoardError;
use crate::movegen::generate_legal_moves;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// One occupied cell of the object grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPiece {
    pub kind: PieceKind,
    pub color: Color,
    #[serde(default)]
    pub has_moved: bool,
}

/// A move in grid coordinates `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMove {
    pub from: (u8, u8),
    pub to: (u8, u8),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

/// Row-major object grid, `None` for empty or cut-away squares.
pub type Grid = Vec<Vec<Option<GridPiece>>>;

impl GridMove {
    /// Grid coordinates of `mv` on a board of `size`.
    pub fn from_move(mv: Move, size: u8) -> GridMove {
        let (src, dst) = (mv.source(), mv.dest());
        GridMove {
            from: (src.row(size), src.col(size)),
            to: (dst.row(size), dst.col(size)),
            promotion: mv.promotion(),
        }
    }

    /// Resolve this grid move to a legal move on `board`.
    ///
    /// A promotion without an explicit kind resolves to the angel.
    pub fn to_move(&self, board: &Board) -> Option<Move> {
        let size = board.size();
        let src = Square::from_coords(self.from.0, self.from.1, size)?;
        let dst = Square::from_coords(self.to.0, self.to.1, size)?;
        let promo = self.promotion.unwrap_or(PieceKind::Angel);
        generate_legal_moves(board).into_iter().find(|mv| {
            mv.source() == src
                && mv.dest() == dst
                && mv.promotion().is_none_or(|kind| kind == promo)
        })
    }
}

impl Board {
    /// Build a board from an object grid.
    ///
    /// A castling right exists when an unmoved king and an unmoved rook stand
    /// on their back-rank home squares. En passant is set when `last_move`
    /// was a pawn double push by the side not to move.
    pub fn from_grid(
        grid: &[Vec<Option<GridPiece>>],
        side_to_move: Color,
        shape: BoardShape,
        last_move: Option<GridMove>,
    ) -> Result<Board, BoardError> {
        let size = grid.len();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != size {
                return Err(BoardError::RaggedGrid {
                    row,
                    found: cells.len(),
                    expected: size,
                });
            }
        }

        let mut board = Board::empty(size, shape)?;
        let size = board.size();
        let mut unmoved = Vec::new();

        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let Some(gp) = cell else { continue };
                let sq = Square::new((row * size as usize + col) as u8);
                board.put_piece(sq, Piece::new(gp.kind, gp.color));
                if !gp.has_moved {
                    unmoved.push(sq);
                }
            }
        }

        let mut rights = CastleRights::NONE;
        for color in Color::ALL {
            let Some(king) = board.king_square(color) else {
                continue;
            };
            let row = color.back_row(size);
            if !unmoved.contains(&king) || king.row(size) != row {
                continue;
            }
            for side in CastleSide::ALL {
                let Some(rook) = board.square(row, side.rook_col(size)) else {
                    continue;
                };
                let target = king.col(size) as i16 + 2 * side.direction() as i16;
                if unmoved.contains(&rook)
                    && board.piece_at(rook).is(PieceKind::Rook, color)
                    && target > 0
                    && target < size as i16 - 1
                {
                    rights = rights.with(color, side);
                }
            }
        }

        let en_passant = last_move.and_then(|lm| {
            let from = board.square(lm.from.0, lm.from.1)?;
            let to = board.square(lm.to.0, lm.to.1)?;
            let mover = side_to_move.flip();
            let is_double = board.piece_at(to).is(PieceKind::Pawn, mover)
                && from.col(size) == to.col(size)
                && from.row(size).abs_diff(to.row(size)) == 2;
            if is_double {
                from.offset(mover.forward(), 0, size)
            } else {
                None
            }
        });

        board.set_side_to_move(side_to_move);
        board.set_castling(rights);
        board.set_en_passant(en_passant);
        debug!(castling = %rights, en_passant = ?en_passant.map(|sq| sq.notation(size)), "grid imported");

        board.validate()?;
        Ok(board)
    }

    /// Export the position as an object grid.
    ///
    /// `has_moved` is reconstructed: kings and corner rooks are unmoved while
    /// they keep a castling right, pawns while they stand on their home row.
    /// Other pieces report `false`.
    pub fn to_grid(&self) -> Grid {
        let size = self.size();
        (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| {
                        let sq = Square::new(row * size + col);
                        let piece = self.piece_at(sq);
                        let (kind, color) = (piece.kind()?, piece.color()?);
                        let has_moved = match kind {
                            PieceKind::Pawn => row != color.pawn_home_row(size),
                            PieceKind::King => CastleSide::ALL
                                .iter()
                                .all(|&side| !self.castling().has(color, side)),
                            PieceKind::Rook => !CastleSide::ALL.iter().any(|&side| {
                                self.castling().has(color, side)
                                    && row == color.back_row(size)
                                    && col == side.rook_col(size)
                            }),
                            _ => false,
                        };
                        Some(GridPiece {
                            kind,
                            color,
                            has_moved,
                        })
                    })
                    .collect()
            })
            .collect()
    }
}
