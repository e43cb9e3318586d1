//! Layout text notation for [`Board`].
//!
//! `<rows top to bottom separated by '/'> <w|b> <castling> <en passant> <halfmove> <fullmove>`.
//! Digits (possibly several in a row) count empty squares and `*` marks a
//! cut-away square of a cross-shaped board.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, BoardShape};
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::LayoutError;
use crate::piece::Piece;
use crate::square::Square;

/// Layout of the 9×9 classic starting position.
pub const CLASSIC_LAYOUT: &str =
    "rnbakcbnr/ppppppppp/9/9/9/9/9/PPPPPPPPP/RNBAKCBNR w KQkq - 0 1";

/// Layout of the orthodox 8×8 starting position.
pub const STANDARD_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One parsed cell of a placement row.
#[derive(Clone, Copy)]
enum Cell {
    Empty,
    Blocked,
    Occupied(Piece),
}

fn parse_row(text: &str) -> Result<Vec<Cell>, LayoutError> {
    // Longer runs are rejected by the row-length check anyway.
    const RUN_CAP: usize = Square::MAX_SIZE as usize + 1;

    let mut cells = Vec::new();
    let mut run = 0usize;
    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            run = (run * 10 + digit as usize).min(RUN_CAP);
            continue;
        }
        cells.extend(std::iter::repeat_n(Cell::Empty, run));
        run = 0;
        if c == '*' {
            cells.push(Cell::Blocked);
        } else {
            let piece =
                Piece::from_symbol(c).ok_or(LayoutError::InvalidPieceChar { character: c })?;
            cells.push(Cell::Occupied(piece));
        }
    }
    cells.extend(std::iter::repeat_n(Cell::Empty, run));
    Ok(cells)
}

impl FromStr for Board {
    type Err = LayoutError;

    fn from_str(layout: &str) -> Result<Board, LayoutError> {
        let fields: Vec<&str> = layout.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(LayoutError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let rows = fields[0]
            .split('/')
            .map(parse_row)
            .collect::<Result<Vec<_>, _>>()?;
        let size = rows.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(LayoutError::BadRowLength {
                    row,
                    length: cells.len(),
                    expected: size,
                });
            }
        }

        let shape = if rows.iter().flatten().any(|c| matches!(c, Cell::Blocked)) {
            BoardShape::Cross
        } else {
            BoardShape::Standard
        };
        let mut board = Board::empty(size, shape)?;
        let size = board.size();

        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let sq = Square::new((row * size as usize + col) as u8);
                match *cell {
                    Cell::Blocked if !board.is_blocked(sq) => {
                        return Err(LayoutError::BlockMismatch {
                            square: sq.notation(size),
                        });
                    }
                    Cell::Empty if board.is_blocked(sq) => {
                        return Err(LayoutError::BlockMismatch {
                            square: sq.notation(size),
                        });
                    }
                    Cell::Occupied(piece) => board.put_piece(sq, piece),
                    _ => {}
                }
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(LayoutError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let castling = CastleRights::parse(fields[2])?;

        let en_passant = if fields[3] == "-" {
            None
        } else {
            let sq = Square::parse(fields[3], size)
                .filter(|&sq| !board.is_blocked(sq))
                .ok_or_else(|| LayoutError::InvalidEnPassant {
                    found: fields[3].to_string(),
                })?;
            Some(sq)
        };

        let halfmove_clock = fields[4].parse::<u16>().map_err(|_| LayoutError::InvalidMoveCounter {
            field: "halfmove clock",
            found: fields[4].to_string(),
        })?;

        let fullmove_number =
            fields[5]
                .parse::<u16>()
                .map_err(|_| LayoutError::InvalidMoveCounter {
                    field: "fullmove number",
                    found: fields[5].to_string(),
                })?;

        board.set_side_to_move(side_to_move);
        board.set_castling(castling);
        board.set_en_passant(en_passant);
        board.set_counters(halfmove_clock, fullmove_number);

        board.validate()?;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        for row in 0..size {
            let mut empty_count = 0u8;
            for col in 0..size {
                let sq = Square::new(row * size + col);
                let piece = self.piece_at(sq);
                if piece.is_none() && !self.is_blocked(sq) {
                    empty_count += 1;
                    continue;
                }
                if empty_count > 0 {
                    write!(f, "{empty_count}")?;
                    empty_count = 0;
                }
                if self.is_blocked(sq) {
                    write!(f, "*")?;
                } else {
                    write!(f, "{piece}")?;
                }
            }
            if empty_count > 0 {
                write!(f, "{empty_count}")?;
            }
            if row + 1 < size {
                write!(f, "/")?;
            }
        }

        let ep = match self.en_passant() {
            Some(sq) => sq.notation(size),
            None => "-".to_string(),
        };

        write!(
            f,
            " {} {} {} {} {}",
            self.side_to_move(),
            self.castling(),
            ep,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CLASSIC_LAYOUT, STANDARD_LAYOUT};
    use crate::board::{Board, BoardShape};
    use crate::color::Color;
    use crate::error::{BoardError, LayoutError};
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn classic_layout_matches_constructor() {
        let parsed: Board = CLASSIC_LAYOUT.parse().unwrap();
        assert_eq!(parsed, Board::classic());
        assert_eq!(Board::classic().to_string(), CLASSIC_LAYOUT);
    }

    #[test]
    fn standard_layout_matches_constructor() {
        let parsed: Board = STANDARD_LAYOUT.parse().unwrap();
        assert_eq!(parsed, Board::standard());
        assert_eq!(parsed.to_string(), STANDARD_LAYOUT);
    }

    #[test]
    fn multi_digit_empty_runs() {
        let layout = "k11/12/12/12/12/12/12/12/12/12/12/11K w - - 0 1";
        let board: Board = layout.parse().unwrap();
        assert_eq!(board.size(), 12);
        assert_eq!(board.to_string(), layout);
        assert_eq!(
            board.piece_at(Square::parse("l1", 12).unwrap()),
            Piece::new(PieceKind::King, Color::White)
        );
    }

    #[test]
    fn cross_shape_from_stars() {
        let layout = "***rkr***/***ppp***/***3***/9/9/9/***3***/***PPP***/***RKR*** w - - 0 1";
        let board: Board = layout.parse().unwrap();
        assert_eq!(board.shape(), BoardShape::Cross);
        assert_eq!(board.to_string(), layout);
    }

    #[test]
    fn star_on_playable_square_rejected() {
        let layout = "k4/5/2*2/5/4K w - - 0 1";
        assert!(matches!(
            layout.parse::<Board>(),
            Err(LayoutError::BlockMismatch { .. })
        ));
    }

    #[test]
    fn en_passant_and_counters_roundtrip() {
        let layout = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3";
        let board: Board = layout.parse().unwrap();
        assert_eq!(board.en_passant(), Square::parse("d6", 8));
        assert_eq!(board.fullmove_number(), 3);
        assert_eq!(board.to_string(), layout);
        assert_eq!(board.hash(), crate::zobrist::hash_from_scratch(&board));
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(
            "8/8/8/8/8/8/8/8 w".parse::<Board>(),
            Err(LayoutError::WrongFieldCount { found: 2 })
        );
    }

    #[test]
    fn ragged_row() {
        let result = "k4/5/6/5/4K w - - 0 1".parse::<Board>();
        assert_eq!(
            result,
            Err(LayoutError::BadRowLength {
                row: 2,
                length: 6,
                expected: 5
            })
        );
    }

    #[test]
    fn invalid_piece_char() {
        assert_eq!(
            "k3x/5/5/5/4K w - - 0 1".parse::<Board>(),
            Err(LayoutError::InvalidPieceChar { character: 'x' })
        );
    }

    #[test]
    fn size_out_of_range() {
        assert_eq!(
            "k3/4/4/3K w - - 0 1".parse::<Board>(),
            Err(LayoutError::InvalidBoard(BoardError::UnsupportedSize { size: 4 }))
        );
    }

    #[test]
    fn two_kings_rejected() {
        let result = "kk3/5/5/5/4K w - - 0 1".parse::<Board>();
        assert!(matches!(
            result,
            Err(LayoutError::InvalidBoard(BoardError::TooManyKings { .. }))
        ));
    }

    #[test]
    fn castling_without_rook_rejected() {
        let result = "4k3/8/8/8/8/8/8/4K3 w K - 0 1".parse::<Board>();
        assert_eq!(
            result,
            Err(LayoutError::InvalidBoard(BoardError::InconsistentCastling { right: 'K' }))
        );
    }

    #[test]
    fn invalid_color() {
        assert!(matches!(
            "k4/5/5/5/4K x - - 0 1".parse::<Board>(),
            Err(LayoutError::InvalidColor { .. })
        ));
    }
}
