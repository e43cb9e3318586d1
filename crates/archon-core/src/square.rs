//! Board square as a flat index over an N×N grid.

use std::fmt;

/// A square index `0..N²` on an N×N board.
///
/// `row = index / N`, `col = index % N`. Row 0 is Black's back rank.
/// The board size is not stored in the square; every coordinate
/// conversion takes it explicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square(u8);

impl Square {
    /// Largest supported board side.
    pub const MAX_SIZE: u8 = 16;

    /// Create a square from a raw index. The caller guarantees it is on the board.
    #[inline]
    pub const fn new(index: u8) -> Square {
        Square(index)
    }

    /// Create a square from a row and column, or `None` when off the board.
    #[inline]
    pub const fn from_coords(row: u8, col: u8, size: u8) -> Option<Square> {
        if row < size && col < size {
            Some(Square(row * size + col))
        } else {
            None
        }
    }

    /// Return the flat index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Row of this square on a board of `size`.
    #[inline]
    pub const fn row(self, size: u8) -> u8 {
        self.0 / size
    }

    /// Column of this square on a board of `size`.
    #[inline]
    pub const fn col(self, size: u8) -> u8 {
        self.0 % size
    }

    /// Step by `(dr, dc)`; `None` when the step leaves the board.
    ///
    /// Coordinates are bounds-checked separately, so a step can never wrap
    /// from one edge of a row onto the next row.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8, size: u8) -> Option<Square> {
        let row = (self.0 / size) as i16 + dr as i16;
        let col = (self.0 % size) as i16 + dc as i16;
        if row < 0 || col < 0 || row >= size as i16 || col >= size as i16 {
            return None;
        }
        Some(Square((row * size as i16 + col) as u8))
    }

    /// The same column on the row mirrored across the board's middle.
    #[inline]
    pub const fn mirrored(self, size: u8) -> Square {
        let row = size - 1 - self.0 / size;
        Square(row * size + self.0 % size)
    }

    /// Chebyshev (king-step) distance to `other`.
    #[inline]
    pub fn distance(self, other: Square, size: u8) -> u8 {
        let dr = self.row(size).abs_diff(other.row(size));
        let dc = self.col(size).abs_diff(other.col(size));
        dr.max(dc)
    }

    /// Algebraic name: column letter `a..` then rank counted from White's side.
    pub fn notation(self, size: u8) -> String {
        let file = (b'a' + self.col(size)) as char;
        let rank = size - self.row(size);
        format!("{file}{rank}")
    }

    /// Parse an algebraic name such as `"e2"` or `"c10"`.
    pub fn parse(s: &str, size: u8) -> Option<Square> {
        let mut chars = s.chars();
        let file = chars.next()?;
        if !file.is_ascii_lowercase() {
            return None;
        }
        let col = file as u8 - b'a';
        let rank: u8 = chars.as_str().parse().ok()?;
        if rank == 0 || rank > size {
            return None;
        }
        Square::from_coords(size - rank, col, size)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Square;

    #[test]
    fn coords_roundtrip() {
        for size in [5u8, 8, 9, 16] {
            for row in 0..size {
                for col in 0..size {
                    let sq = Square::from_coords(row, col, size).unwrap();
                    assert_eq!(sq.row(size), row);
                    assert_eq!(sq.col(size), col);
                }
            }
            assert!(Square::from_coords(size, 0, size).is_none());
        }
    }

    #[test]
    fn offset_never_wraps_rows() {
        let size = 9;
        let right_edge = Square::from_coords(4, 8, size).unwrap();
        assert_eq!(right_edge.offset(0, 1, size), None);
        assert_eq!(right_edge.offset(-1, 2, size), None);
        let left_edge = Square::from_coords(4, 0, size).unwrap();
        assert_eq!(left_edge.offset(0, -1, size), None);
        assert_eq!(left_edge.offset(1, -2, size), None);
        assert_eq!(
            left_edge.offset(-2, 1, size),
            Square::from_coords(2, 1, size)
        );
    }

    #[test]
    fn notation_roundtrip() {
        let size = 9;
        let e2 = Square::parse("e2", size).unwrap();
        assert_eq!(e2.row(size), 7);
        assert_eq!(e2.col(size), 4);
        assert_eq!(e2.notation(size), "e2");

        let big = Square::parse("p16", 16).unwrap();
        assert_eq!(big.index(), 15);
        assert_eq!(big.notation(16), "p16");

        assert!(Square::parse("e10", 9).is_none());
        assert!(Square::parse("j1", 9).is_none());
        assert!(Square::parse("", 9).is_none());
    }

    #[test]
    fn mirrored_flips_rows() {
        let size = 8;
        let sq = Square::from_coords(1, 3, size).unwrap();
        assert_eq!(sq.mirrored(size), Square::from_coords(6, 3, size).unwrap());
        assert_eq!(sq.mirrored(size).mirrored(size), sq);
    }

    #[test]
    fn chebyshev_distance() {
        let size = 9;
        let a = Square::from_coords(0, 0, size).unwrap();
        let b = Square::from_coords(3, 5, size).unwrap();
        assert_eq!(a.distance(b, size), 5);
    }
}
