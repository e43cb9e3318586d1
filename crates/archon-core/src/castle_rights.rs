//! Castling rights stored as a 4-bit field within a `u8`.

use std::fmt;

use crate::color::Color;
use crate::error::LayoutError;
use crate::square::Square;

/// Which corner rook the king castles with.
///
/// King side is toward the last column, queen side toward column 0,
/// whatever the board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// Both sides, king side first.
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// Column of the castling rook's home corner.
    #[inline]
    pub const fn rook_col(self, size: u8) -> u8 {
        match self {
            CastleSide::KingSide => size - 1,
            CastleSide::QueenSide => 0,
        }
    }

    /// Column step from the king toward the rook.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            CastleSide::KingSide => 1,
            CastleSide::QueenSide => -1,
        }
    }
}

/// Castling rights encoded as a 4-bit field: bit 0 = WK, 1 = WQ, 2 = BK, 3 = BQ.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    /// No castling rights.
    pub const NONE: CastleRights = CastleRights(0);
    /// All castling rights.
    pub const ALL: CastleRights = CastleRights(0b1111);

    /// Create castling rights from a raw `u8`, masking to the lower 4 bits.
    #[inline]
    pub const fn new(bits: u8) -> CastleRights {
        CastleRights(bits & 0b1111)
    }

    /// Return the raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return `true` if no castling rights remain.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if `color` may still castle toward `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Grant the right for `color` and `side`.
    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::flag(color, side))
    }

    /// Revoke the right for `color` and `side`.
    #[inline]
    pub const fn without(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 & !Self::flag(color, side))
    }

    /// Revoke both rights for `color`.
    #[inline]
    pub const fn without_color(self, color: Color) -> CastleRights {
        self.without(color, CastleSide::KingSide)
            .without(color, CastleSide::QueenSide)
    }

    /// Revoke any right whose rook corner is `sq`.
    ///
    /// Called with the source and destination of every move, so a rook that
    /// leaves its corner or is captured there loses its right.
    pub fn touch_corner(self, sq: Square, size: u8) -> CastleRights {
        let mut rights = self;
        for color in Color::ALL {
            if sq.row(size) != color.back_row(size) {
                continue;
            }
            for side in CastleSide::ALL {
                if sq.col(size) == side.rook_col(size) {
                    rights = rights.without(color, side);
                }
            }
        }
        rights
    }

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => 0b0001,
            (Color::White, CastleSide::QueenSide) => 0b0010,
            (Color::Black, CastleSide::KingSide) => 0b0100,
            (Color::Black, CastleSide::QueenSide) => 0b1000,
        }
    }

    /// Parse the castling field of the layout notation (e.g. "KQkq", "Kq", "-").
    pub fn parse(s: &str) -> Result<CastleRights, LayoutError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }

        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            rights = match c {
                'K' => rights.with(Color::White, CastleSide::KingSide),
                'Q' => rights.with(Color::White, CastleSide::QueenSide),
                'k' => rights.with(Color::Black, CastleSide::KingSide),
                'q' => rights.with(Color::Black, CastleSide::QueenSide),
                _ => return Err(LayoutError::InvalidCastlingChar { character: c }),
            };
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let letters = [
            (Color::White, CastleSide::KingSide, 'K'),
            (Color::White, CastleSide::QueenSide, 'Q'),
            (Color::Black, CastleSide::KingSide, 'k'),
            (Color::Black, CastleSide::QueenSide, 'q'),
        ];
        for (color, side, letter) in letters {
            if self.has(color, side) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}
