//! Move ordering via TT hint, SEE, promotions, killers, counter-moves, and history.

use std::cmp::Reverse;
use std::sync::OnceLock;

use archon_core::{Board, Move, MoveList};

use crate::eval::material::piece_value;
use crate::search::heuristics::{CounterMoveTable, HistoryTable, KillerTable};
use crate::search::see::see;

/// Score bands. Higher is searched first.
const TT_MOVE: i32 = 10_000;
const GOOD_CAPTURE: i32 = 5_000;
const QUIET_PROMOTION: i32 = 4_000;
const BAD_CAPTURE: i32 = 1_000;
const FIRST_KILLER: i32 = 900;
const SECOND_KILLER: i32 = 800;
const COUNTER_MOVE: i32 = 700;

/// Quiet-move context for one node.
pub struct OrderingContext<'a> {
    pub tt_move: Move,
    pub killers: &'a KillerTable,
    pub history: &'a HistoryTable,
    pub counters: &'a CounterMoveTable,
    /// The move that led to this node, or [`Move::NULL`] at the root.
    pub prev_move: Move,
    pub ply: usize,
}

/// Return `true` if `mv` removes an enemy piece.
#[inline]
pub fn is_capture(board: &Board, mv: Move) -> bool {
    mv.is_en_passant() || board.piece_at(mv.dest()).is_some()
}

/// Score a capture: winning and even exchanges above every quiet move, losing
/// ones below killers but above plain quiet moves with no history.
fn capture_score(board: &Board, mv: Move) -> i32 {
    let gain = see(board, mv);
    if gain >= 0 {
        GOOD_CAPTURE + gain
    } else {
        BAD_CAPTURE + gain
    }
}

/// Score a move for the main search.
pub fn score_move(board: &Board, mv: Move, ctx: &OrderingContext<'_>) -> i32 {
    if mv == ctx.tt_move {
        return TT_MOVE;
    }
    if is_capture(board, mv) {
        return capture_score(board, mv);
    }
    if let Some(promo) = mv.promotion() {
        return QUIET_PROMOTION + piece_value(promo) / 10;
    }

    let bonus = match ctx.killers.slot(ctx.ply, mv) {
        Some(0) => FIRST_KILLER,
        Some(_) => SECOND_KILLER,
        None if ctx.counters.is_counter(ctx.prev_move, mv) => COUNTER_MOVE,
        None => 0,
    };
    bonus + ctx.history.score(board.piece_at(mv.source()), mv.dest().index())
}

/// Score a move for quiescence search (captures and promotions only).
pub fn score_tactical(board: &Board, mv: Move) -> i32 {
    if is_capture(board, mv) {
        capture_score(board, mv)
    } else if let Some(promo) = mv.promotion() {
        QUIET_PROMOTION + piece_value(promo) / 10
    } else {
        0
    }
}

// ── LMR Table ─────────────────────────────────────────────────────────────────

/// LMR reduction table in 1024ths of a ply, indexed by [move_index][depth].
static LMR_TABLE: OnceLock<[[i32; 64]; 64]> = OnceLock::new();

fn lmr_table() -> &'static [[i32; 64]; 64] {
    LMR_TABLE.get_or_init(|| {
        let mut t = [[0i32; 64]; 64];
        for (i, row) in t.iter_mut().enumerate().skip(1) {
            for (d, cell) in row.iter_mut().enumerate().skip(1) {
                *cell = ((0.5 + (i as f64).ln() * (d as f64).ln() / 2.5) * 1024.0) as i32;
            }
        }
        t
    })
}

/// Get the LMR reduction for the given move index and depth (in 1024ths of a ply).
pub fn lmr_reduction(move_index: usize, depth: usize) -> i32 {
    lmr_table()[move_index.min(63)][depth.min(63)]
}

// ── Move Picker ────────────────────────────────────────────────────────────────

/// Moves sorted once, up front, in descending score order.
///
/// The sort is stable, so equally scored moves keep generation order and
/// the search stays deterministic.
pub struct MovePicker {
    moves: Vec<(Move, i32)>,
    cursor: usize,
}

impl MovePicker {
    /// Order every legal move for an interior node.
    pub fn new(moves: &MoveList, board: &Board, ctx: &OrderingContext<'_>) -> Self {
        Self::sorted(moves, |mv| score_move(board, mv, ctx))
    }

    /// Order captures and promotions for quiescence search.
    pub fn new_qsearch(moves: &MoveList, board: &Board) -> Self {
        Self::sorted(moves, |mv| score_tactical(board, mv))
    }

    fn sorted(moves: &MoveList, mut score: impl FnMut(Move) -> i32) -> Self {
        let mut scored: Vec<(Move, i32)> = moves.as_slice().iter().map(|&mv| (mv, score(mv))).collect();
        scored.sort_by_key(|&(_, s)| Reverse(s));
        Self {
            moves: scored,
            cursor: 0,
        }
    }

    /// Yield the next move with its ordering score.
    pub fn pick_next(&mut self) -> Option<(Move, i32)> {
        let next = self.moves.get(self.cursor).copied();
        self.cursor += 1;
        next
    }

    /// Number of moves being ordered.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Return `true` if there is nothing to order.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The full ordering, best first.
    pub fn ordered(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|&(mv, _)| mv)
    }
}

/// Sort `moves` best first for the given node context.
pub fn order_moves(board: &Board, moves: &MoveList, ctx: &OrderingContext<'_>) -> Vec<Move> {
    MovePicker::new(moves, board, ctx).ordered().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::{Board, PieceKind, generate_legal_captures, generate_legal_moves};

    struct Tables {
        killers: KillerTable,
        history: HistoryTable,
        counters: CounterMoveTable,
    }

    impl Tables {
        fn new() -> Self {
            Self {
                killers: KillerTable::new(),
                history: HistoryTable::new(),
                counters: CounterMoveTable::new(),
            }
        }

        fn ctx(&self, tt_move: Move, prev_move: Move) -> OrderingContext<'_> {
            OrderingContext {
                tt_move,
                killers: &self.killers,
                history: &self.history,
                counters: &self.counters,
                prev_move,
                ply: 0,
            }
        }
    }

    #[test]
    fn tt_move_comes_first() {
        let board = Board::classic();
        let moves = generate_legal_moves(&board);
        let tables = Tables::new();
        let tt_move = board.find_move("a2a3").unwrap();
        let ordered = order_moves(&board, &moves, &tables.ctx(tt_move, Move::NULL));
        assert_eq!(ordered[0], tt_move);
        assert_eq!(ordered.len(), moves.len());
    }

    #[test]
    fn winning_capture_before_quiet_and_losing_capture_after_killer() {
        // Qd4xe5 wins a pawn; Qd4xd7 runs into the king's defence.
        let board: Board = "8/3pk3/8/4p3/3Q4/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&board);
        let mut tables = Tables::new();
        let killer = board.find_move("e1f1").unwrap();
        tables.killers.store(0, killer);
        let ordered = order_moves(&board, &moves, &tables.ctx(Move::NULL, Move::NULL));

        let pos = |n: &str| {
            let mv = board.find_move(n).unwrap();
            ordered.iter().position(|&m| m == mv).unwrap()
        };
        assert_eq!(pos("d4e5"), 0);
        assert_eq!(pos("e1f1"), 1);
        assert!(pos("d4d7") < ordered.len());
        let bad = score_move(&board, board.find_move("d4d7").unwrap(), &tables.ctx(Move::NULL, Move::NULL));
        assert_eq!(bad, BAD_CAPTURE + 100 - 900);
    }

    #[test]
    fn killers_and_counter_bands() {
        let board = Board::standard();
        let mut tables = Tables::new();
        let first = board.find_move("g1f3").unwrap();
        let second = board.find_move("b1c3").unwrap();
        let counter = board.find_move("e2e4").unwrap();
        let prev = board.find_move("d2d4").unwrap();
        tables.killers.store(0, second);
        tables.killers.store(0, first);
        tables.counters.store(prev, counter);

        let ctx = tables.ctx(Move::NULL, prev);
        assert_eq!(score_move(&board, first, &ctx), FIRST_KILLER);
        assert_eq!(score_move(&board, second, &ctx), SECOND_KILLER);
        assert_eq!(score_move(&board, counter, &ctx), COUNTER_MOVE);
        assert_eq!(score_move(&board, board.find_move("a2a3").unwrap(), &ctx), 0);
    }

    #[test]
    fn history_orders_plain_quiet_moves() {
        let board = Board::standard();
        let mut tables = Tables::new();
        let mv = board.find_move("h2h3").unwrap();
        tables.history.update_good(board.piece_at(mv.source()), mv.dest().index(), 5);
        let moves = generate_legal_moves(&board);
        let ordered = order_moves(&board, &moves, &tables.ctx(Move::NULL, Move::NULL));
        assert_eq!(ordered[0], mv);
    }

    #[test]
    fn angel_promotion_scores_highest_quiet_promotion() {
        let board: Board = "7k/4P3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&board);
        let tables = Tables::new();
        let ordered = order_moves(&board, &moves, &tables.ctx(Move::NULL, Move::NULL));
        assert_eq!(ordered[0].promotion(), Some(PieceKind::Angel));
    }

    #[test]
    fn qsearch_picker_empty_on_starting_position() {
        let board = Board::classic();
        let captures = generate_legal_captures(&board);
        let mut picker = MovePicker::new_qsearch(&captures, &board);
        assert!(picker.is_empty());
        assert!(picker.pick_next().is_none());
    }

    #[test]
    fn picker_yields_all_moves_once() {
        let board = Board::standard();
        let moves = generate_legal_moves(&board);
        let tables = Tables::new();
        let mut picker = MovePicker::new(&moves, &board, &tables.ctx(Move::NULL, Move::NULL));
        let mut count = 0;
        while picker.pick_next().is_some() {
            count += 1;
        }
        assert_eq!(count, 20);
    }

    #[test]
    fn equal_scores_keep_generation_order() {
        let board = Board::standard();
        let moves = generate_legal_moves(&board);
        let tables = Tables::new();
        let ordered = order_moves(&board, &moves, &tables.ctx(Move::NULL, Move::NULL));
        assert_eq!(ordered.as_slice(), moves.as_slice());
    }

    #[test]
    fn lmr_reduction_increases_with_depth_and_moves() {
        assert!(lmr_reduction(10, 5) > lmr_reduction(5, 5));
        assert!(lmr_reduction(5, 10) > lmr_reduction(5, 5));
        assert_eq!(lmr_reduction(0, 10), 0);
    }
}
