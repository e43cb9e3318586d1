//! Negamax alpha-beta search with PVS, pruning, reductions, and quiescence.
//!
//! The board is mutated in place. Every `make_move` is undone in the same
//! frame before the child's result is inspected, so an abort unwinding
//! through `?` always leaves the board as it was found.

use archon_core::{Board, Move, MoveList, legal_captures_into, legal_moves_into};

use crate::eval::evaluate;
use crate::eval::material::has_non_pawn_material;
use crate::eval::personality::Personality;
use crate::search::control::SearchControl;
use crate::search::heuristics::{CounterMoveTable, HistoryTable, KillerTable};
use crate::search::ordering::{MovePicker, OrderingContext, is_capture, lmr_reduction};
use crate::search::see::see_ge;
use crate::search::tt::{Bound, TranspositionTable};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 30_000;

/// Base score for checkmate (adjusted by ply for mate distance).
pub const MATE_SCORE: i32 = 29_000;

/// Scores above this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Maximum search depth (in plies) for array sizing and recursion limits.
pub const MAX_PLY: usize = 128;

const STATIC_NULL_MAX_DEPTH: i32 = 3;
const STATIC_NULL_MARGIN: i32 = 120;
const NULL_MOVE_MIN_DEPTH: i32 = 3;
const LMR_MIN_DEPTH: i32 = 3;
/// Moves at this index or earlier are never reduced.
const LMR_MIN_INDEX: usize = 4;

/// The search was stopped; the current iteration's result is void.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Aborted;

pub(crate) type NodeResult = Result<i32, Aborted>;

/// Search state threaded through every recursive call.
pub(crate) struct SearchContext<'a> {
    /// Total nodes visited.
    pub nodes: u64,
    pub tt: &'a mut TranspositionTable,
    pub control: &'a SearchControl,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub counters: CounterMoveTable,
    pub personality: Personality,
    /// Hashes of positions reached before the root.
    pub game_history: &'a [u64],
    /// Hashes from the root to the current node, inclusive.
    pub path: Vec<u64>,
    /// Depth of the current iteration; bounds check extensions.
    pub root_depth: i32,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        tt: &'a mut TranspositionTable,
        control: &'a SearchControl,
        personality: Personality,
        game_history: &'a [u64],
    ) -> Self {
        Self {
            nodes: 0,
            tt,
            control,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            counters: CounterMoveTable::new(),
            personality,
            game_history,
            path: Vec::with_capacity(MAX_PLY + 1),
            root_depth: 1,
        }
    }

    /// Return `true` if `hash` already occurred on the path above the
    /// current node or anywhere in the game history.
    fn is_repetition(&self, hash: u64) -> bool {
        let above = self.path.len().saturating_sub(1);
        self.path[..above].contains(&hash) || self.game_history.contains(&hash)
    }

    fn tick(&mut self) -> Result<(), Aborted> {
        self.nodes += 1;
        if self.control.should_stop(self.nodes) {
            Err(Aborted)
        } else {
            Ok(())
        }
    }
}

fn tt_depth(depth: i32) -> u8 {
    depth.clamp(0, u8::MAX as i32) as u8
}

/// Play `mv`, run `f` on the child, then undo before returning its result.
fn with_move<T>(
    board: &mut Board,
    mv: Move,
    ctx: &mut SearchContext<'_>,
    f: impl FnOnce(&mut Board, &mut SearchContext<'_>) -> T,
) -> T {
    let undo = board.make_move(mv);
    ctx.path.push(board.hash());
    let result = f(board, ctx);
    ctx.path.pop();
    board.undo_move(mv, undo);
    result
}

/// Search the root moves in order with PVS.
///
/// `moves` must be non-empty. Returns the best score and move; when every
/// move fails low the first move is returned with the fail-low score.
pub(crate) fn search_root(
    board: &mut Board,
    moves: &[Move],
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> Result<(i32, Move), Aborted> {
    ctx.tick()?;
    ctx.root_depth = depth;
    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = moves.first().copied().unwrap_or(Move::NULL);

    for (index, &mv) in moves.iter().enumerate() {
        let score = with_move(board, mv, ctx, |board, ctx| -> NodeResult {
            if index == 0 {
                return Ok(-negamax(board, depth - 1, 1, -beta, -alpha, mv, ctx)?);
            }
            let score = -negamax(board, depth - 1, 1, -alpha - 1, -alpha, mv, ctx)?;
            if score > alpha && score < beta {
                return Ok(-negamax(board, depth - 1, 1, -beta, -alpha, mv, ctx)?);
            }
            Ok(score)
        })?;

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        Bound::UpperBound
    } else if best_score >= beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };
    ctx.tt.store(board.hash(), tt_depth(depth), best_score, bound, best_move, 0);
    Ok((best_score, best_move))
}

/// Score every root move with a full window at `depth`.
///
/// Used by difficulty scaling, which needs comparable scores for all moves
/// rather than bounds.
pub(crate) fn score_root_moves(
    board: &mut Board,
    moves: &[Move],
    depth: i32,
    ctx: &mut SearchContext<'_>,
) -> Result<Vec<(Move, i32)>, Aborted> {
    ctx.root_depth = depth;
    let mut scored = Vec::with_capacity(moves.len());
    for &mv in moves {
        let score = with_move(board, mv, ctx, |board, ctx| -> NodeResult {
            Ok(-negamax(board, depth - 1, 1, -INF, INF, mv, ctx)?)
        })?;
        scored.push((mv, score));
    }
    Ok(scored)
}

/// Negamax alpha-beta search below the root.
///
/// Returns the best score for the side to move. `prev_move` is the move that
/// led here, or [`Move::NULL`] after a null move.
pub(crate) fn negamax(
    board: &mut Board,
    depth: i32,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    prev_move: Move,
    ctx: &mut SearchContext<'_>,
) -> NodeResult {
    ctx.tick()?;

    let us = board.side_to_move();
    let hash = board.hash();

    // Fifty-move rule and repetition draws
    if board.halfmove_clock() >= 100 || ctx.is_repetition(hash) {
        return Ok(0);
    }

    // Ply ceiling to prevent runaway recursion
    if ply >= MAX_PLY - 1 {
        return Ok(evaluate(board, us, ctx.personality));
    }

    let in_check = board.in_check(us);
    let extend = in_check && ply < 2 * ctx.root_depth.max(1) as usize;

    if depth <= 0 && !extend {
        return qsearch(board, ply, alpha, beta, ctx);
    }

    let pv_node = beta - alpha > 1;

    // Probe transposition table at the nominal depth
    let mut tt_move = Move::NULL;
    if let Some(hit) = ctx.tt.probe(hash, tt_depth(depth), alpha, beta, ply as u8) {
        tt_move = hit.best_move;
        if let Some(score) = hit.score {
            return Ok(score);
        }
    }

    // Check extension
    let depth = if extend { depth + 1 } else { depth };
    if depth <= 0 {
        return qsearch(board, ply, alpha, beta, ctx);
    }

    let static_eval = if in_check {
        -INF
    } else {
        evaluate(board, us, ctx.personality)
    };

    // Static null-move pruning: far enough above beta that a quiet move won't drop below it
    if !pv_node
        && !in_check
        && depth <= STATIC_NULL_MAX_DEPTH
        && beta.abs() < MATE_THRESHOLD
        && static_eval - STATIC_NULL_MARGIN * depth >= beta
    {
        return Ok(static_eval - STATIC_NULL_MARGIN * depth);
    }

    // Null-move pruning: hand the opponent a free move and see if we still beat beta
    if !pv_node
        && !in_check
        && !prev_move.is_null()
        && depth >= NULL_MOVE_MIN_DEPTH
        && static_eval >= beta
        && beta.abs() < MATE_THRESHOLD
        && has_non_pawn_material(board, us)
    {
        let r = 3 + depth / 6;
        let undo = board.make_null_move();
        ctx.path.push(board.hash());
        let result = negamax(board, depth - 1 - r, ply + 1, -beta, -beta + 1, Move::NULL, ctx);
        ctx.path.pop();
        board.undo_null_move(undo);
        let score = -result?;
        if score >= beta {
            return Ok(if score >= MATE_THRESHOLD { beta } else { score });
        }
    }

    let mut moves = MoveList::new();
    legal_moves_into(board, &mut moves);

    // No legal moves: checkmate or stalemate
    if moves.is_empty() {
        return Ok(if in_check { -(MATE_SCORE - ply as i32) } else { 0 });
    }

    let mut picker = MovePicker::new(
        &moves,
        board,
        &OrderingContext {
            tt_move,
            killers: &ctx.killers,
            history: &ctx.history,
            counters: &ctx.counters,
            prev_move,
            ply,
        },
    );

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = Move::NULL;
    let mut index = 0usize;

    while let Some((mv, _)) = picker.pick_next() {
        let quiet = !is_capture(board, mv) && !mv.is_promotion();
        let piece = board.piece_at(mv.source());

        let score = with_move(board, mv, ctx, |board, ctx| -> NodeResult {
            let new_depth = depth - 1;
            if index == 0 {
                return Ok(-negamax(board, new_depth, ply + 1, -beta, -alpha, mv, ctx)?);
            }

            let gives_check = board.in_check(board.side_to_move());
            let mut reduction = 0;
            if quiet
                && !in_check
                && !gives_check
                && depth >= LMR_MIN_DEPTH
                && index > LMR_MIN_INDEX
            {
                let r = lmr_reduction(index, depth as usize) / 1024;
                reduction = r.clamp(0, (new_depth - 1).max(0));
            }

            let mut score =
                -negamax(board, new_depth - reduction, ply + 1, -alpha - 1, -alpha, mv, ctx)?;
            if score > alpha && reduction > 0 {
                score = -negamax(board, new_depth, ply + 1, -alpha - 1, -alpha, mv, ctx)?;
            }
            if score > alpha && score < beta {
                score = -negamax(board, new_depth, ply + 1, -beta, -alpha, mv, ctx)?;
            }
            Ok(score)
        })?;
        index += 1;

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            if quiet {
                ctx.killers.store(ply, mv);
                ctx.history.update_good(piece, mv.dest().index(), tt_depth(depth));
                ctx.counters.store(prev_move, mv);
            }
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        Bound::UpperBound
    } else if best_score >= beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };
    ctx.tt.store(hash, tt_depth(depth), best_score, bound, best_move, ply as u8);

    Ok(best_score)
}

/// Quiescence search: resolve capture sequences before evaluating.
///
/// Only captures are searched. Captures that lose material by SEE are
/// skipped unless they promote.
fn qsearch(
    board: &mut Board,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> NodeResult {
    ctx.tick()?;

    // Stand-pat: the side to move can choose not to capture
    let stand_pat = evaluate(board, board.side_to_move(), ctx.personality);
    if ply >= MAX_PLY - 1 || stand_pat >= beta {
        return Ok(stand_pat);
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut captures = MoveList::new();
    legal_captures_into(board, &mut captures);
    let mut picker = MovePicker::new_qsearch(&captures, board);

    while let Some((mv, _)) = picker.pick_next() {
        if mv.promotion().is_none() && !see_ge(board, mv, 0) {
            continue;
        }
        let score = with_move(board, mv, ctx, |board, ctx| -> NodeResult {
            Ok(-qsearch(board, ply + 1, -beta, -alpha, ctx)?)
        })?;

        if score >= beta {
            return Ok(score);
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use archon_core::{Board, Color, generate_legal_moves};

    use super::*;

    fn run<T>(board: &Board, f: impl FnOnce(&mut Board, &mut SearchContext<'_>) -> T) -> T {
        let mut tt = TranspositionTable::default();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut ctx = SearchContext::new(&mut tt, &control, Personality::Normal, &[]);
        let mut scratch = board.clone();
        let result = f(&mut scratch, &mut ctx);
        assert_eq!(scratch.hash(), board.hash(), "board not restored");
        result
    }

    fn root(board: &Board, depth: i32) -> (i32, Move) {
        let moves = generate_legal_moves(board);
        run(board, |b, ctx| search_root(b, moves.as_slice(), depth, -INF, INF, ctx)).unwrap()
    }

    #[test]
    fn mated_node_scores_by_distance() {
        // Black king on h8, white queen on g7, white king on f6; black to move, checkmated
        let board: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let score = run(&board, |b, ctx| negamax(b, 2, 3, -INF, INF, Move::NULL, ctx)).unwrap();
        assert_eq!(score, -(MATE_SCORE - 3));
    }

    #[test]
    fn stalemate_scores_zero() {
        let board: Board = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let score = run(&board, |b, ctx| negamax(b, 3, 1, -INF, INF, Move::NULL, ctx)).unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn root_finds_back_rank_mate() {
        let board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let (score, mv) = root(&board, 3);
        assert_eq!(mv.notation(8), "a1a8");
        assert_eq!(score, MATE_SCORE - 1);
    }

    #[test]
    fn quiescence_sees_the_recapture() {
        // Qxd5 loses the queen to the rook on d8; the quiet search must not take it.
        let board: Board = "3rk3/8/8/3p4/8/8/3Q4/4K3 w - - 0 1".parse().unwrap();
        let (_, mv) = root(&board, 1);
        assert_ne!(mv.notation(8), "d2d5");
    }

    #[test]
    fn repetition_on_path_is_a_draw() {
        let board = Board::standard();
        let history = [board.hash()];
        let mut tt = TranspositionTable::default();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut ctx = SearchContext::new(&mut tt, &control, Personality::Normal, &history);
        let mut scratch = board.clone();
        ctx.path.push(scratch.hash());
        let score = negamax(&mut scratch, 4, 1, -INF, INF, Move::NULL, &mut ctx).unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn fifty_move_rule_is_a_draw() {
        let board: Board = "4k3/8/8/8/8/8/8/3QK3 w - - 100 80".parse().unwrap();
        let score = run(&board, |b, ctx| negamax(b, 3, 1, -INF, INF, Move::NULL, ctx)).unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn abort_restores_the_board() {
        let board = Board::classic();
        let mut tt = TranspositionTable::default();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(true)));
        let mut ctx = SearchContext::new(&mut tt, &control, Personality::Normal, &[]);
        let mut scratch = board.clone();
        let moves = generate_legal_moves(&board);
        let result = search_root(&mut scratch, moves.as_slice(), 5, -INF, INF, &mut ctx);
        assert_eq!(result, Err(Aborted));
        assert_eq!(scratch.hash(), board.hash());
        assert_eq!(scratch.to_string(), board.to_string());
    }

    #[test]
    fn root_scores_cover_every_move() {
        let board: Board = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&board);
        let scored = run(&board, |b, ctx| score_root_moves(b, moves.as_slice(), 2, ctx)).unwrap();
        assert_eq!(scored.len(), moves.len());
        let capture = board.find_move("e4d5").unwrap();
        let best = scored.iter().max_by_key(|&&(_, s)| s).unwrap();
        assert_eq!(best.0, capture);
    }

    #[test]
    fn qsearch_skips_losing_captures() {
        // Qxd5 loses the queen to exd5
        let board: Board = "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        let (score, nodes) = run(&board, |b, ctx| {
            let score = qsearch(b, 1, -INF, INF, ctx).unwrap();
            (score, ctx.nodes)
        });
        assert_eq!(nodes, 1);
        assert_eq!(score, evaluate(&board, Color::White, Personality::Normal));
    }

    #[test]
    fn qsearch_plays_winning_captures() {
        let board: Board = "4k3/8/8/3p4/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        let (score, nodes) = run(&board, |b, ctx| {
            let score = qsearch(b, 1, -INF, INF, ctx).unwrap();
            (score, ctx.nodes)
        });
        assert!(nodes > 1);
        assert!(score > evaluate(&board, Color::White, Personality::Normal));
    }

    #[test]
    fn checked_node_uses_entry_at_nominal_depth() {
        let board: Board = "4k3/8/8/8/8/8/4R3/4K3 b - - 0 1".parse().unwrap();
        assert!(board.in_check(Color::Black));
        let (score, nodes) = run(&board, |b, ctx| {
            ctx.tt.store(b.hash(), 2, 1234, Bound::Exact, Move::NULL, 1);
            let score = negamax(b, 2, 1, -INF, INF, Move::NULL, ctx).unwrap();
            (score, ctx.nodes)
        });
        assert_eq!(score, 1234);
        assert_eq!(nodes, 1);
    }
}
