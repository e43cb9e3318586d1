//! Error types for layout parsing and board validation.

/// Errors that occur when parsing the textual board layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout does not have exactly 6 space-separated fields.
    #[error("expected 6 layout fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// A row describes more or fewer squares than there are rows.
    #[error("row {row} describes {length} squares, expected {expected}")]
    BadRowLength {
        /// Zero-based row index from the top.
        row: usize,
        /// Number of squares described.
        length: usize,
        /// Board size implied by the row count.
        expected: usize,
    },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },
    /// A `*` marks a playable square, or a cut-away square is not marked `*`.
    #[error("blocked-square marking does not match the cross shape at {square}")]
    BlockMismatch {
        /// Square name.
        square: String,
    },
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },
    /// An unrecognized character appeared in the castling field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar {
        /// The invalid character.
        character: char,
    },
    /// The en passant field is not "-" or a square on this board.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant {
        /// The invalid en passant string.
        found: String,
    },
    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// The field name ("halfmove clock" or "fullmove number").
        field: &'static str,
        /// The invalid string.
        found: String,
    },
    /// The parsed board fails structural validation.
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Errors from structural validation of a [`Board`](crate::board::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The board side is outside the supported range.
    #[error("board size {size} outside supported range 5..=16")]
    UnsupportedSize {
        /// Requested size.
        size: usize,
    },
    /// A side has more than one king.
    #[error("expected at most 1 king for {color}, found {count}")]
    TooManyKings {
        /// Which side has the extra king.
        color: &'static str,
        /// Number of kings found.
        count: usize,
    },
    /// A pawn stands on its own promotion row.
    #[error("pawn on promotion row at {square}")]
    PawnOnPromotionRow {
        /// Square name.
        square: String,
    },
    /// A piece occupies a blocked square.
    #[error("piece on blocked square {square}")]
    PieceOnBlockedSquare {
        /// Square name.
        square: String,
    },
    /// A castling right is set without the king and rook on their home squares.
    #[error("castling right {right} without king and rook in place")]
    InconsistentCastling {
        /// The offending right letter.
        right: char,
    },
    /// The object grid is not square or does not match the requested size.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        /// Offending row.
        row: usize,
        /// Cells found.
        found: usize,
        /// Cells expected.
        expected: usize,
    },
}
