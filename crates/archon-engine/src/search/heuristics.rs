//! Killer moves, history credit, and counter-moves for quiet move ordering.

use archon_core::{Move, Piece};

use crate::search::negamax::MAX_PLY;

/// Largest square count on any supported board.
const SQUARES: usize = 256;

/// Two killer moves per ply: quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    /// Create an empty killer table.
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    /// Slot of `mv` at `ply`: `Some(0)` for the first killer, `Some(1)` for the second.
    pub fn slot(&self, ply: usize, mv: Move) -> Option<usize> {
        if ply >= MAX_PLY || mv.is_null() {
            return None;
        }
        self.slots[ply].iter().position(|&k| k == mv)
    }

    /// Check if a move is a killer at the given ply.
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.slot(ply, mv).is_some()
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Ceiling for accumulated history credit; keeps history below killer scores.
pub const HISTORY_MAX: i32 = 600;

/// History heuristic table, indexed by `[colored piece][to_square]`.
pub struct HistoryTable {
    table: Vec<[i32; SQUARES]>,
}

impl HistoryTable {
    /// Create a zeroed history table.
    pub fn new() -> Self {
        Self {
            table: vec![[0; SQUARES]; Piece::COUNT],
        }
    }

    /// Credit a quiet move that caused a beta cutoff with `depth²`.
    pub fn update_good(&mut self, piece: Piece, to: usize, depth: u8) {
        let bonus = (depth as i32) * (depth as i32);
        if let Some(entry) = self.entry(piece, to) {
            *entry = (*entry + bonus).min(HISTORY_MAX);
        }
    }

    /// Get the history score for a quiet move.
    pub fn score(&self, piece: Piece, to: usize) -> i32 {
        if piece.is_none() || to >= SQUARES {
            return 0;
        }
        self.table[piece.index()][to]
    }

    fn entry(&mut self, piece: Piece, to: usize) -> Option<&mut i32> {
        if piece.is_none() || to >= SQUARES {
            return None;
        }
        Some(&mut self.table[piece.index()][to])
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Quiet replies that refuted a given previous move, indexed by its from/to pair.
pub struct CounterMoveTable {
    table: Vec<Move>,
}

impl CounterMoveTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            table: vec![Move::NULL; SQUARES * SQUARES],
        }
    }

    fn index(prev: Move) -> usize {
        prev.source().index() * SQUARES + prev.dest().index()
    }

    /// Record `reply` as the refutation of `prev`.
    pub fn store(&mut self, prev: Move, reply: Move) {
        if !prev.is_null() {
            self.table[Self::index(prev)] = reply;
        }
    }

    /// Return `true` if `mv` is the recorded refutation of `prev`.
    pub fn is_counter(&self, prev: Move, mv: Move) -> bool {
        !prev.is_null() && !mv.is_null() && self.table[Self::index(prev)] == mv
    }
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::{Color, Move, Piece, PieceKind, Square};

    fn mv(name: &str) -> Move {
        let from = Square::parse(&name[..2], 9).unwrap();
        let to = Square::parse(&name[2..], 9).unwrap();
        Move::new(from, to)
    }

    #[test]
    fn killer_store_and_check() {
        let mut kt = KillerTable::new();
        let mv1 = mv("e2e4");
        let mv2 = mv("d2d4");

        kt.store(5, mv1);
        assert_eq!(kt.slot(5, mv1), Some(0));
        assert!(!kt.is_killer(5, mv2));

        // Store a second killer; mv1 should shift to slot 1
        kt.store(5, mv2);
        assert_eq!(kt.slot(5, mv2), Some(0));
        assert_eq!(kt.slot(5, mv1), Some(1));
    }

    #[test]
    fn killer_same_move_no_shift() {
        let mut kt = KillerTable::new();
        let mv1 = mv("e2e4");
        let mv2 = mv("d2d4");

        kt.store(0, mv1);
        kt.store(0, mv2);
        kt.store(0, mv2);
        assert!(kt.is_killer(0, mv1));
        assert!(kt.is_killer(0, mv2));
    }

    #[test]
    fn killer_different_plies_independent() {
        let mut kt = KillerTable::new();
        let m = mv("e2e4");
        kt.store(3, m);
        assert!(kt.is_killer(3, m));
        assert!(!kt.is_killer(4, m));
        assert!(!kt.is_killer(MAX_PLY + 1, m));
    }

    #[test]
    fn null_move_is_never_a_killer() {
        let kt = KillerTable::new();
        assert!(!kt.is_killer(0, Move::NULL));
    }

    #[test]
    fn history_credits_depth_squared() {
        let mut ht = HistoryTable::new();
        let knight = Piece::new(PieceKind::Knight, Color::White);
        assert_eq!(ht.score(knight, 20), 0);
        ht.update_good(knight, 20, 4);
        assert_eq!(ht.score(knight, 20), 16);
        // Same square for the other color is independent.
        assert_eq!(ht.score(Piece::new(PieceKind::Knight, Color::Black), 20), 0);
    }

    #[test]
    fn history_is_capped() {
        let mut ht = HistoryTable::new();
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);
        for _ in 0..100 {
            ht.update_good(pawn, 255, 10);
        }
        assert_eq!(ht.score(pawn, 255), HISTORY_MAX);
        assert_eq!(ht.score(Piece::NONE, 255), 0);
    }

    #[test]
    fn counter_moves() {
        let mut cm = CounterMoveTable::new();
        let prev = mv("e2e4");
        let reply = mv("e7e5");
        assert!(!cm.is_counter(prev, reply));
        cm.store(prev, reply);
        assert!(cm.is_counter(prev, reply));
        assert!(!cm.is_counter(mv("d2d4"), reply));
        assert!(!cm.is_counter(Move::NULL, reply));
    }
}
