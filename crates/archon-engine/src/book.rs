//! Opening book: position hash to weighted candidate moves.
//!
//! The JSON layout is
//! `{"positions": {"<hash>": {"moves": [{"from": {"r", "c"}, "to": {"r", "c"}, "weight", "games"}], "seenCount"}}}`
//! where `<hash>` is the decimal Zobrist key of the position.

use std::collections::BTreeMap;
use std::path::Path;

use archon_core::{Board, Move, Square, generate_legal_moves};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BookError;

/// The book is only consulted before this fullmove number.
pub const BOOK_MOVE_LIMIT: u16 = 12;

/// A board coordinate as stored in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub r: u8,
    pub c: u8,
}

/// One candidate move with its selection weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMove {
    pub from: Coord,
    pub to: Coord,
    pub weight: f64,
    pub games: u32,
}

/// Every candidate recorded for one position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPosition {
    pub moves: Vec<BookMove>,
    #[serde(rename = "seenCount", default)]
    pub seen_count: u32,
}

impl BookPosition {
    fn find_mut(&mut self, from: Coord, to: Coord) -> Option<&mut BookMove> {
        self.moves.iter_mut().find(|m| m.from == from && m.to == to)
    }
}

/// Weighted opening moves keyed by position hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningBook {
    positions: BTreeMap<String, BookPosition>,
}

impl OpeningBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a book from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let book: OpeningBook = serde_json::from_str(json)?;
        if let Some(key) = book.positions.keys().find(|k| k.parse::<u64>().is_err()) {
            return Err(BookError::InvalidKey { key: key.clone() });
        }
        Ok(book)
    }

    /// Encode the book as JSON.
    pub fn to_json(&self) -> Result<String, BookError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read and decode a book file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Number of positions in the book.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Return `true` if the book holds no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The entry for a position hash.
    pub fn position(&self, hash: u64) -> Option<&BookPosition> {
        self.positions.get(&hash.to_string())
    }

    /// Pick a weighted-random book move for `board`.
    ///
    /// Returns `None` past the opening, when the position is unknown, or when
    /// the chosen entry is not a legal move here.
    pub fn lookup<R: Rng>(&self, board: &Board, rng: &mut R) -> Option<Move> {
        if board.fullmove_number() >= BOOK_MOVE_LIMIT {
            return None;
        }
        let entry = self.position(board.hash())?;
        let chosen = pick_weighted(&entry.moves, rng)?;

        let size = board.size();
        let from = Square::from_coords(chosen.from.r, chosen.from.c, size)?;
        let to = Square::from_coords(chosen.to.r, chosen.to.c, size)?;
        let legal = generate_legal_moves(board);
        // Promotion candidates are generated angel first.
        let found = legal
            .as_slice()
            .iter()
            .copied()
            .find(|mv| mv.source() == from && mv.dest() == to);
        match found {
            Some(mv) => {
                debug!(mv = %mv.notation(size), weight = chosen.weight, "book move");
                Some(mv)
            }
            None => {
                warn!(hash = board.hash(), "illegal book move rejected");
                None
            }
        }
    }

    /// Record one game that played `from -> to` in the position `hash`.
    pub fn add_move(&mut self, hash: u64, from: Coord, to: Coord) {
        let entry = self.positions.entry(hash.to_string()).or_default();
        entry.seen_count += 1;
        match entry.find_mut(from, to) {
            Some(existing) => {
                existing.games += 1;
                existing.weight += 1.0;
            }
            None => entry.moves.push(BookMove {
                from,
                to,
                weight: 1.0,
                games: 1,
            }),
        }
    }

    /// Fold `other` into this book: seen counts, weights, and games add up.
    pub fn merge(&mut self, other: &OpeningBook) {
        for (key, theirs) in &other.positions {
            let ours = self.positions.entry(key.clone()).or_default();
            ours.seen_count += theirs.seen_count;
            for mv in &theirs.moves {
                match ours.find_mut(mv.from, mv.to) {
                    Some(existing) => {
                        existing.weight += mv.weight;
                        existing.games += mv.games;
                    }
                    None => ours.moves.push(mv.clone()),
                }
            }
        }
    }
}

/// Weighted choice; non-positive weights are never picked unless all are.
fn pick_weighted<'a, R: Rng>(moves: &'a [BookMove], rng: &mut R) -> Option<&'a BookMove> {
    let total: f64 = moves.iter().map(|m| m.weight.max(0.0)).sum();
    if total <= 0.0 {
        return moves.first();
    }
    let mut roll = rng.random_range(0.0..total);
    for mv in moves {
        let w = mv.weight.max(0.0);
        if roll < w {
            return Some(mv);
        }
        roll -= w;
    }
    moves.last()
}
