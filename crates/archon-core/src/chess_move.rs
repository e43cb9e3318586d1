//! Move representation, bit-packed into a u32.

use std::fmt;

use crate::piece_kind::PieceKind;
use crate::square::Square;

const SRC_MASK: u32 = 0x0000_00FF;
const DST_MASK: u32 = 0x0000_FF00;
const PROMO_MASK: u32 = 0x000F_0000;
const KIND_MASK: u32 = 0x0030_0000;
const DST_SHIFT: u32 = 8;
const PROMO_SHIFT: u32 = 16;
const KIND_SHIFT: u32 = 20;

/// The category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
}

impl MoveKind {
    const fn bits(self) -> u32 {
        (self as u32) << KIND_SHIFT
    }
}

/// A move encoded in 32 bits.
///
/// ```text
/// bits  0-7:  source square       (0-255)
/// bits  8-15: destination square  (0-255)
/// bits 16-19: promotion kind code (0 = none)
/// bits 20-21: move kind           (Normal=0, Promotion=1, EnPassant=2, Castling=3)
/// ```
///
/// Castling moves are encoded with the king's source and destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// Null move sentinel (square 0 to square 0). Never a legal move.
    pub const NULL: Move = Move(0);

    /// Create a normal (quiet or capture) move.
    #[inline]
    pub const fn new(source: Square, dest: Square) -> Move {
        Move(source.index() as u32 | (dest.index() as u32) << DST_SHIFT)
    }

    /// Create a promotion move.
    #[inline]
    pub const fn new_promotion(source: Square, dest: Square, promo: PieceKind) -> Move {
        Move(
            source.index() as u32
                | (dest.index() as u32) << DST_SHIFT
                | (promo.code() as u32) << PROMO_SHIFT
                | MoveKind::Promotion.bits(),
        )
    }

    /// Create an en passant capture.
    #[inline]
    pub const fn new_en_passant(source: Square, dest: Square) -> Move {
        Move(source.index() as u32 | (dest.index() as u32) << DST_SHIFT | MoveKind::EnPassant.bits())
    }

    /// Create a castling move from the king's source and destination squares.
    #[inline]
    pub const fn new_castle(king_src: Square, king_dst: Square) -> Move {
        Move(king_src.index() as u32 | (king_dst.index() as u32) << DST_SHIFT | MoveKind::Castling.bits())
    }

    /// Extract the source square.
    #[inline]
    pub const fn source(self) -> Square {
        Square::new((self.0 & SRC_MASK) as u8)
    }

    /// Extract the destination square.
    #[inline]
    pub const fn dest(self) -> Square {
        Square::new(((self.0 & DST_MASK) >> DST_SHIFT) as u8)
    }

    /// Extract the move kind.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        match (self.0 & KIND_MASK) >> KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    /// Promotion kind, if this is a promotion.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        PieceKind::from_code(((self.0 & PROMO_MASK) >> PROMO_SHIFT) as u8)
    }

    /// Return `true` if this is the null move sentinel.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if this is an en passant capture.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    /// Return `true` if this is a castling move.
    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    /// Return `true` if this is a promotion.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    /// Return the raw packed bits.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Coordinate notation on a board of `size`, e.g. `e2e4` or `e8e9e`.
    pub fn notation(self, size: u8) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        let mut s = format!("{}{}", self.source().notation(size), self.dest().notation(size));
        if let Some(promo) = self.promotion() {
            s.push(promo.symbol());
        }
        s
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({}->{} {:?}",
            self.source().index(),
            self.dest().index(),
            self.kind()
        )?;
        if let Some(promo) = self.promotion() {
            write!(f, "={promo}")?;
        }
        write!(f, ")")
    }
}
