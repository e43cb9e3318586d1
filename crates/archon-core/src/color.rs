//! Piece colors and their direction of travel.

use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};

/// A piece color: White or Black.
///
/// White starts on the bottom rows (high row indices) and moves toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Total number of colors.
    pub const COUNT: usize = 2;

    /// All colors in index order.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Return the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opposite color.
    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Packed color bits used in a [`Piece`](crate::Piece) code.
    #[inline]
    pub const fn bits(self) -> u8 {
        match self {
            Color::White => 16,
            Color::Black => 32,
        }
    }

    /// Row delta of a forward pawn step.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this side's pieces in the initial setup.
    #[inline]
    pub const fn back_row(self, size: u8) -> u8 {
        match self {
            Color::White => size - 1,
            Color::Black => 0,
        }
    }

    /// Row from which this side's pawns may advance two squares.
    #[inline]
    pub const fn pawn_home_row(self, size: u8) -> u8 {
        match self {
            Color::White => size - 2,
            Color::Black => 1,
        }
    }

    /// Row on which this side's pawns promote.
    #[inline]
    pub const fn promotion_row(self, size: u8) -> u8 {
        self.flip().back_row(size)
    }

    /// Distance of `row` from this side's back row (0 on the back row).
    #[inline]
    pub const fn relative_row(self, row: u8, size: u8) -> u8 {
        match self {
            Color::White => size - 1 - row,
            Color::Black => row,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "w"),
            Color::Black => write!(f, "b"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn flip_roundtrip() {
        assert_eq!(Color::White.flip(), Color::Black);
        assert_eq!(!Color::Black, Color::White);
        assert_eq!(Color::White.flip().flip(), Color::White);
    }

    #[test]
    fn bits_do_not_overlap_kind_mask() {
        for color in Color::ALL {
            assert_eq!(color.bits() & 0x0F, 0);
        }
        assert_ne!(Color::White.bits(), Color::Black.bits());
    }

    #[test]
    fn rows_on_nine_by_nine() {
        assert_eq!(Color::White.back_row(9), 8);
        assert_eq!(Color::Black.back_row(9), 0);
        assert_eq!(Color::White.pawn_home_row(9), 7);
        assert_eq!(Color::Black.pawn_home_row(9), 1);
        assert_eq!(Color::White.promotion_row(9), 0);
        assert_eq!(Color::Black.promotion_row(9), 8);
    }

    #[test]
    fn relative_row_mirrors() {
        assert_eq!(Color::White.relative_row(8, 9), 0);
        assert_eq!(Color::Black.relative_row(0, 9), 0);
        assert_eq!(Color::White.relative_row(2, 9), 6);
        assert_eq!(Color::Black.relative_row(6, 9), 6);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "w");
        assert_eq!(format!("{}", Color::Black), "b");
    }
}
