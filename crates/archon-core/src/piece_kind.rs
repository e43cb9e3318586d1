//! Piece kinds, including the compound pieces, and their movement classes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a piece, without color information.
///
/// Discriminants are the packed type codes stored in the low four bits
/// of a [`Piece`](crate::Piece); 0 is reserved for the empty square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
    /// Knight + bishop.
    Archbishop = 7,
    /// Knight + rook.
    Chancellor = 8,
    /// Knight + queen.
    Angel = 9,
    /// Slides along knight offsets.
    Nightrider = 10,
}

impl PieceKind {
    /// Total number of piece kinds.
    pub const COUNT: usize = 10;

    /// All piece kinds in index order.
    pub const ALL: [PieceKind; 10] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Archbishop,
        PieceKind::Chancellor,
        PieceKind::Angel,
        PieceKind::Nightrider,
    ];

    /// Kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 8] = [
        PieceKind::Angel,
        PieceKind::Queen,
        PieceKind::Chancellor,
        PieceKind::Archbishop,
        PieceKind::Nightrider,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Return a contiguous index (0..10).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Return the packed type code (1..=10).
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a packed type code. Returns `None` for 0 and unknown codes.
    #[inline]
    pub const fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            7 => Some(PieceKind::Archbishop),
            8 => Some(PieceKind::Chancellor),
            9 => Some(PieceKind::Angel),
            10 => Some(PieceKind::Nightrider),
            _ => None,
        }
    }

    /// Return the layout character for this piece kind (lowercase).
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Archbishop => 'a',
            PieceKind::Chancellor => 'c',
            PieceKind::Angel => 'e',
            PieceKind::Nightrider => 'j',
        }
    }

    /// Parse a layout character (case-insensitive) into a piece kind.
    #[inline]
    pub fn from_symbol(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            'a' => Some(PieceKind::Archbishop),
            'c' => Some(PieceKind::Chancellor),
            'e' => Some(PieceKind::Angel),
            'j' => Some(PieceKind::Nightrider),
            _ => None,
        }
    }

    /// Single knight leaps (knight, archbishop, chancellor, angel).
    #[inline]
    pub const fn leaps_like_knight(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Archbishop | PieceKind::Chancellor | PieceKind::Angel
        )
    }

    /// Orthogonal rays (rook, queen, chancellor, angel).
    #[inline]
    pub const fn slides_orthogonally(self) -> bool {
        matches!(
            self,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Chancellor | PieceKind::Angel
        )
    }

    /// Diagonal rays (bishop, queen, archbishop, angel).
    #[inline]
    pub const fn slides_diagonally(self) -> bool {
        matches!(
            self,
            PieceKind::Bishop | PieceKind::Queen | PieceKind::Archbishop | PieceKind::Angel
        )
    }

    /// Rays along knight offsets.
    #[inline]
    pub const fn rides_knight(self) -> bool {
        matches!(self, PieceKind::Nightrider)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
