//! Colored piece packed into a single byte.

use std::fmt;

use crate::color::Color;
use crate::piece_kind::PieceKind;

const KIND_MASK: u8 = 0x0F;
const COLOR_MASK: u8 = 0x30;

/// A square's content packed into one byte.
///
/// Bit layout:
/// - bits 0-3: [`PieceKind`] code (1-10, 0 = empty)
/// - bit 4: White
/// - bit 5: Black
///
/// Type and color bits never overlap and the empty code carries no color bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    /// The empty square.
    pub const NONE: Piece = Piece(0);

    /// Number of distinct colored pieces (for key tables).
    pub const COUNT: usize = PieceKind::COUNT * Color::COUNT;

    /// Create a piece from a kind and a color.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece(color.bits() | kind.code())
    }

    /// Decode a raw packed byte. Returns `None` for invalid codes.
    pub const fn from_raw(raw: u8) -> Option<Piece> {
        if raw == 0 {
            return Some(Piece::NONE);
        }
        let color_ok = matches!(raw & COLOR_MASK, 16 | 32);
        let kind_ok = PieceKind::from_code(raw & KIND_MASK).is_some();
        if color_ok && kind_ok && raw & !(KIND_MASK | COLOR_MASK) == 0 {
            Some(Piece(raw))
        } else {
            None
        }
    }

    /// Parse a layout character. Uppercase is White, lowercase is Black.
    pub fn from_symbol(c: char) -> Option<Piece> {
        let kind = PieceKind::from_symbol(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    /// Return `true` for the empty code.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Return `true` for any occupied code.
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// Return the piece kind, or `None` on an empty square.
    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        PieceKind::from_code(self.0 & KIND_MASK)
    }

    /// Return the color, or `None` on an empty square.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self.0 & COLOR_MASK {
            16 => Some(Color::White),
            32 => Some(Color::Black),
            _ => None,
        }
    }

    /// Return `true` if this is a piece of `color`.
    #[inline]
    pub const fn is_color(self, color: Color) -> bool {
        self.0 & color.bits() != 0
    }

    /// Return `true` if this is a `kind` of `color`.
    #[inline]
    pub const fn is(self, kind: PieceKind, color: Color) -> bool {
        self.0 == color.bits() | kind.code()
    }

    /// Contiguous index 0-19 (White kinds first). Empty maps to 0; callers
    /// must check [`is_some`](Self::is_some) first.
    #[inline]
    pub const fn index(self) -> usize {
        let color = if self.0 & 32 != 0 { 1 } else { 0 };
        let kind = (self.0 & KIND_MASK) as usize;
        color * PieceKind::COUNT + kind.saturating_sub(1)
    }

    /// Return the raw packed byte.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Return the same kind in the opposite color.
    #[inline]
    pub const fn flipped(self) -> Piece {
        match self.0 & COLOR_MASK {
            16 => Piece((self.0 & KIND_MASK) | 32),
            32 => Piece((self.0 & KIND_MASK) | 16),
            _ => self,
        }
    }

    /// Layout character, uppercase for White, or `'.'` for empty.
    pub fn symbol(self) -> char {
        match (self.kind(), self.color()) {
            (Some(kind), Some(Color::White)) => kind.symbol().to_ascii_uppercase(),
            (Some(kind), Some(Color::Black)) => kind.symbol(),
            _ => '.',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.color(), self.kind()) {
            (Some(color), Some(kind)) => {
                let prefix = match color {
                    Color::White => 'W',
                    Color::Black => 'B',
                };
                write!(f, "{}{}", prefix, kind.symbol().to_ascii_uppercase())
            }
            _ => write!(f, "--"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Piece;
    use crate::color::Color;
    use crate::piece_kind::PieceKind;

    #[test]
    fn new_roundtrip() {
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let piece = Piece::new(kind, color);
                assert_eq!(piece.kind(), Some(kind));
                assert_eq!(piece.color(), Some(color));
                assert!(piece.is(kind, color));
            }
        }
    }

    #[test]
    fn none_has_no_color_bits() {
        assert_eq!(Piece::NONE.raw(), 0);
        assert_eq!(Piece::NONE.color(), None);
        assert_eq!(Piece::NONE.kind(), None);
        assert!(!Piece::NONE.is_color(Color::White));
        assert!(!Piece::NONE.is_color(Color::Black));
    }

    #[test]
    fn raw_codes_match_packing() {
        assert_eq!(Piece::new(PieceKind::Pawn, Color::White).raw(), 17);
        assert_eq!(Piece::new(PieceKind::Angel, Color::White).raw(), 25);
        assert_eq!(Piece::new(PieceKind::King, Color::Black).raw(), 38);
        assert_eq!(Piece::new(PieceKind::Nightrider, Color::Black).raw(), 42);
    }

    #[test]
    fn from_raw_rejects_garbage() {
        assert_eq!(Piece::from_raw(0), Some(Piece::NONE));
        assert_eq!(Piece::from_raw(17), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert_eq!(Piece::from_raw(16), None);
        assert_eq!(Piece::from_raw(48 | 1), None);
        assert_eq!(Piece::from_raw(5), None);
        assert_eq!(Piece::from_raw(64 | 16 | 1), None);
    }

    #[test]
    fn index_is_contiguous() {
        let mut seen = [false; Piece::COUNT];
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let idx = Piece::new(kind, color).index();
                assert!(!seen[idx], "duplicate index {idx}");
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&v| v));
    }

    #[test]
    fn symbol_roundtrip() {
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let piece = Piece::new(kind, color);
                assert_eq!(Piece::from_symbol(piece.symbol()), Some(piece));
            }
        }
        assert_eq!(Piece::NONE.symbol(), '.');
    }

    #[test]
    fn flipped_swaps_color_only() {
        let wa = Piece::new(PieceKind::Archbishop, Color::White);
        assert_eq!(wa.flipped(), Piece::new(PieceKind::Archbishop, Color::Black));
        assert_eq!(Piece::NONE.flipped(), Piece::NONE);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Piece::new(PieceKind::Chancellor, Color::White)), "WC");
        assert_eq!(format!("{:?}", Piece::new(PieceKind::Nightrider, Color::Black)), "BJ");
        assert_eq!(format!("{:?}", Piece::NONE), "--");
    }
}
