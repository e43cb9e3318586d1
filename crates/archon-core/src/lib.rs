//! Core board types: encoding, move generation, and game rules for N×N boards
//! with the extended piece set.

mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod grid;
mod layout;
mod make_move;
mod movegen;
pub mod offsets;
mod perft;
mod piece;
mod piece_kind;
mod square;
mod zobrist;

pub use board::{Board, BoardShape, MIN_SIZE, PrettyBoard};
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind};
pub use color::Color;
pub use error::{BoardError, LayoutError};
pub use grid::{Grid, GridMove, GridPiece};
pub use layout::{CLASSIC_LAYOUT, STANDARD_LAYOUT};
pub use make_move::{NullUndo, Undo};
pub use movegen::{
    MoveList, generate_legal_captures, generate_legal_moves, legal_captures_into,
    legal_moves_into,
};
pub use perft::{divide, perft};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use square::Square;
pub use zobrist::hash_from_scratch;
