//! In-place move execution with paired undo, and attack detection.

use std::ops::ControlFlow;

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::offsets;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// State needed to take back one [`Board::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    captured: Piece,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

impl Undo {
    /// The piece removed by the move, or [`Piece::NONE`].
    #[inline]
    pub fn captured(&self) -> Piece {
        self.captured
    }
}

/// State needed to take back one [`Board::make_null_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullUndo {
    en_passant: Option<Square>,
    halfmove_clock: u16,
    hash: u64,
}

impl Board {
    /// Apply `mv` in place and return the record that reverses it.
    ///
    /// `mv` must be pseudo-legal for the side to move. Every call must be
    /// paired with [`undo_move`](Board::undo_move) on the same board.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let mut undo = Undo {
            captured: Piece::NONE,
            castling: self.castling(),
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
            hash: self.hash(),
        };

        let size = self.size();
        let us = self.side_to_move();
        let src = mv.source();
        let dst = mv.dest();

        let moving = self.clear(src);
        debug_assert!(moving.is_color(us), "no piece of the side to move on {src:?}");

        match mv.kind() {
            MoveKind::Normal => {
                undo.captured = self.clear(dst);
                self.place(dst, moving);
            }
            MoveKind::Promotion => {
                undo.captured = self.clear(dst);
                let promo = mv.promotion().unwrap_or(PieceKind::Queen);
                self.place(dst, Piece::new(promo, us));
            }
            MoveKind::EnPassant => {
                self.place(dst, moving);
                if let Some(victim) = dst.offset(-us.forward(), 0, size) {
                    undo.captured = self.clear(victim);
                }
            }
            MoveKind::Castling => {
                self.place(dst, moving);
                if let Some((rook_src, rook_dst)) = castle_rook_squares(src, dst, size) {
                    let rook = self.clear(rook_src);
                    self.place(rook_dst, rook);
                }
            }
        }

        let mut rights = self
            .castling()
            .touch_corner(src, size)
            .touch_corner(dst, size);
        if moving.kind() == Some(PieceKind::King) {
            rights = rights.without_color(us);
        }
        if rights != self.castling() {
            self.set_castling(rights);
        }

        let is_pawn = moving.kind() == Some(PieceKind::Pawn);
        let double_push = is_pawn && src.row(size).abs_diff(dst.row(size)) == 2;
        let ep = if double_push {
            src.offset(us.forward(), 0, size)
        } else {
            None
        };
        self.set_en_passant(ep);

        let halfmove = if is_pawn || undo.captured.is_some() {
            0
        } else {
            undo.halfmove_clock.saturating_add(1)
        };
        let fullmove = match us {
            Color::White => undo.fullmove_number,
            Color::Black => undo.fullmove_number.saturating_add(1),
        };
        self.set_counters(halfmove, fullmove);
        self.set_side_to_move(us.flip());

        undo
    }

    /// Take back `mv`, which must be the last move made on this board.
    pub fn undo_move(&mut self, mv: Move, undo: Undo) {
        let size = self.size();
        let us = self.side_to_move().flip();
        let src = mv.source();
        let dst = mv.dest();

        match mv.kind() {
            MoveKind::Normal => {
                let moving = self.clear(dst);
                self.place(src, moving);
                if undo.captured.is_some() {
                    self.place(dst, undo.captured);
                }
            }
            MoveKind::Promotion => {
                self.clear(dst);
                self.place(src, Piece::new(PieceKind::Pawn, us));
                if undo.captured.is_some() {
                    self.place(dst, undo.captured);
                }
            }
            MoveKind::EnPassant => {
                let moving = self.clear(dst);
                self.place(src, moving);
                if let Some(victim) = dst.offset(-us.forward(), 0, size) {
                    if undo.captured.is_some() {
                        self.place(victim, undo.captured);
                    }
                }
            }
            MoveKind::Castling => {
                let king = self.clear(dst);
                self.place(src, king);
                if let Some((rook_src, rook_dst)) = castle_rook_squares(src, dst, size) {
                    let rook = self.clear(rook_dst);
                    self.place(rook_src, rook);
                }
            }
        }

        self.restore_state(
            us,
            undo.castling,
            undo.en_passant,
            undo.halfmove_clock,
            undo.fullmove_number,
            undo.hash,
        );
    }

    /// Pass the turn without moving. Clears en passant.
    pub fn make_null_move(&mut self) -> NullUndo {
        let undo = NullUndo {
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            hash: self.hash(),
        };
        self.set_en_passant(None);
        self.set_counters(
            undo.halfmove_clock.saturating_add(1),
            self.fullmove_number(),
        );
        self.set_side_to_move(self.side_to_move().flip());
        undo
    }

    /// Take back the last [`make_null_move`](Board::make_null_move).
    pub fn undo_null_move(&mut self, undo: NullUndo) {
        self.restore_state(
            self.side_to_move().flip(),
            self.castling(),
            undo.en_passant,
            undo.halfmove_clock,
            self.fullmove_number(),
            undo.hash,
        );
    }

    /// Return `true` if `sq` is attacked by any piece of `by`.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.scan_attackers(sq, by, &[], |_, _| ControlFlow::Break(()))
    }

    /// Return `true` if the king of `color` is attacked. A side without a king
    /// is never in check.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.flip()))
    }

    /// Visit every piece of `by` attacking `sq`, treating `removed` squares as empty.
    ///
    /// Pieces behind a removed square are seen through it, which is what an
    /// exchange sequence needs to find x-ray attackers.
    pub fn for_each_attacker(
        &self,
        sq: Square,
        by: Color,
        removed: &[Square],
        mut visit: impl FnMut(Square, PieceKind),
    ) {
        self.scan_attackers(sq, by, removed, |from, kind| {
            visit(from, kind);
            ControlFlow::Continue(())
        });
    }

    /// Walk attack lines out of `sq`. Returns `true` if `visit` broke early.
    fn scan_attackers(
        &self,
        sq: Square,
        by: Color,
        removed: &[Square],
        mut visit: impl FnMut(Square, PieceKind) -> ControlFlow<()>,
    ) -> bool {
        let present = |at: Square| -> Option<PieceKind> {
            if removed.contains(&at) {
                return None;
            }
            let piece = self.piece_at(at);
            if piece.is_color(by) { piece.kind() } else { None }
        };
        let occupied = |at: Square| self.piece_at(at).is_some() && !removed.contains(&at);

        // A pawn of `by` attacks diagonally forward, so look one row behind `sq`.
        for dc in [-1, 1] {
            if let Some(from) = self.step(sq, -by.forward(), dc) {
                if present(from) == Some(PieceKind::Pawn) && visit(from, PieceKind::Pawn).is_break() {
                    return true;
                }
            }
        }

        for (dr, dc) in offsets::KNIGHT {
            if let Some(from) = self.step(sq, dr, dc) {
                if let Some(kind) = present(from) {
                    if kind.leaps_like_knight() && visit(from, kind).is_break() {
                        return true;
                    }
                }
            }
        }

        for (dr, dc) in offsets::KING {
            if let Some(from) = self.step(sq, dr, dc) {
                if present(from) == Some(PieceKind::King) && visit(from, PieceKind::King).is_break() {
                    return true;
                }
            }
        }

        let rays = offsets::ORTHOGONAL
            .iter()
            .map(|&d| (d, PieceKind::slides_orthogonally as fn(PieceKind) -> bool))
            .chain(
                offsets::DIAGONAL
                    .iter()
                    .map(|&d| (d, PieceKind::slides_diagonally as fn(PieceKind) -> bool)),
            )
            .chain(
                offsets::KNIGHT
                    .iter()
                    .map(|&d| (d, PieceKind::rides_knight as fn(PieceKind) -> bool)),
            );

        for ((dr, dc), moves_along) in rays {
            let mut cur = sq;
            while let Some(next) = self.step(cur, dr, dc) {
                if occupied(next) {
                    if let Some(kind) = present(next) {
                        if moves_along(kind) && visit(next, kind).is_break() {
                            return true;
                        }
                    }
                    break;
                }
                cur = next;
            }
        }

        false
    }
}

/// Rook source and destination for a castling king move `king_src -> king_dst`.
pub(crate) fn castle_rook_squares(
    king_src: Square,
    king_dst: Square,
    size: u8,
) -> Option<(Square, Square)> {
    let row = king_src.row(size);
    let dir: i8 = if king_dst.col(size) > king_src.col(size) { 1 } else { -1 };
    let rook_col = if dir > 0 { size - 1 } else { 0 };
    let rook_src = Square::from_coords(row, rook_col, size)?;
    let rook_dst = king_src.offset(0, dir, size)?;
    Some((rook_src, rook_dst))
}
