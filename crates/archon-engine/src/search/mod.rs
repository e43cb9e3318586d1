//! Search algorithms and move ordering.

pub mod control;
pub mod difficulty;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod tt;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use archon_core::{Board, Move, generate_legal_moves};
use tracing::{debug, info, warn};

use crate::book::{BOOK_MOVE_LIMIT, OpeningBook};
use crate::eval::evaluate;
use crate::time::SearchLimits;
use difficulty::{Difficulty, NOISE_SCORING_DEPTH};
use negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, SearchContext, score_root_moves, search_root};
use ordering::{MovePicker, OrderingContext};
use tt::{TranspositionTable, TtConfig};

/// Aspiration half-window around the previous iteration's score.
const ASPIRATION_WINDOW: i32 = 50;

/// Default minimum gap between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// How the returned move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveSource {
    /// Taken from the opening book without searching.
    Book,
    /// The only legal move.
    Forced,
    /// Result of a completed search iteration.
    Search,
    /// No iteration completed in time; the best-ordered move was used.
    Fallback,
}

/// Snapshot reported after a completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub depth: u8,
    pub max_depth: u8,
    pub nodes: u64,
    pub best_move: Option<Move>,
    pub score: i32,
}

/// Result of one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` only when the side to move has no legal move or no king.
    pub best_move: Option<Move>,
    /// Score in centipawns from the mover's point of view.
    pub score: i32,
    /// Principal variation, starting with `best_move`.
    pub pv: Vec<Move>,
    pub nodes: u64,
    /// Depth of the last completed iteration.
    pub depth: u8,
    pub source: MoveSource,
}

impl SearchOutcome {
    fn without_move(score: i32) -> Self {
        Self {
            best_move: None,
            score,
            pv: Vec::new(),
            nodes: 0,
            depth: 0,
            source: MoveSource::Search,
        }
    }

    fn immediate(mv: Move, score: i32, source: MoveSource) -> Self {
        Self {
            best_move: Some(mv),
            score,
            pv: vec![mv],
            nodes: 0,
            depth: 0,
            source,
        }
    }
}

/// Tracks best-move stability across ID iterations for time management.
///
/// When the best move changes or the score drops significantly, the engine
/// should think longer. When the best move is stable, it can play faster.
pub(super) struct StabilityTracker {
    last_move: Move,
    last_score: i32,
    stable_streak: u32,
}

impl StabilityTracker {
    fn new() -> Self {
        Self {
            last_move: Move::NULL,
            last_score: 0,
            stable_streak: 0,
        }
    }

    /// Update with the latest iteration results and return a scale factor (in hundredths).
    ///
    /// - Score drop > 100cp: 250 (think much longer)
    /// - Score drop > 50cp: 180 (think longer)
    /// - Stable streak >= 3: 60 (play faster)
    /// - Otherwise: 100 (neutral)
    fn update(&mut self, best_move: Move, score: i32) -> u32 {
        let scale = if self.last_move.is_null() {
            100
        } else {
            let score_drop = self.last_score - score;
            if score_drop > 100 {
                self.stable_streak = 0;
                250
            } else if score_drop > 50 {
                self.stable_streak = 0;
                180
            } else if best_move == self.last_move {
                self.stable_streak += 1;
                if self.stable_streak >= 3 { 60 } else { 100 }
            } else {
                self.stable_streak = 0;
                100
            }
        };

        self.last_move = best_move;
        self.last_score = score;
        scale
    }
}

/// Iterative-deepening searcher owning its transposition table and book.
pub struct Searcher {
    tt: TranspositionTable,
    book: Option<OpeningBook>,
    progress_interval: Duration,
}

impl Searcher {
    /// Create a searcher with the given table size and no book.
    pub fn new(config: TtConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config),
            book: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Attach an opening book.
    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = Some(book);
        self
    }

    /// Set the minimum gap between two progress reports.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Replace (or remove) the opening book.
    pub fn set_book(&mut self, book: Option<OpeningBook>) {
        self.book = book;
    }

    /// Pick a move for the side to move.
    ///
    /// `history` holds the hashes of earlier game positions for repetition
    /// detection. `stop` aborts the search from outside; the last completed
    /// iteration's move is still returned. Never returns `None` while a
    /// legal move exists.
    pub fn search<F>(
        &mut self,
        board: &Board,
        limits: &SearchLimits,
        difficulty: &Difficulty,
        history: &[u64],
        stop: Arc<AtomicBool>,
        mut on_progress: F,
    ) -> SearchOutcome
    where
        F: FnMut(&Progress),
    {
        let us = board.side_to_move();
        if board.king_square(us).is_none() {
            warn!(side = ?us, "no king for the side to move");
            return SearchOutcome::without_move(0);
        }

        let legal = generate_legal_moves(board);
        if legal.is_empty() {
            let score = if board.in_check(us) { -MATE_SCORE } else { 0 };
            return SearchOutcome::without_move(score);
        }

        let mut rng = difficulty.rng();
        if board.fullmove_number() < BOOK_MOVE_LIMIT
            && let Some(book) = &self.book
            && let Some(mv) = book.lookup(board, &mut rng)
        {
            debug!(mv = %mv.notation(board.size()), "playing book move");
            return SearchOutcome::immediate(mv, 0, MoveSource::Book);
        }

        if legal.len() == 1 {
            let score = evaluate(board, us, difficulty.personality);
            return SearchOutcome::immediate(legal[0], score, MoveSource::Forced);
        }

        // Each request starts from a clean table so results depend only on the input.
        self.tt.clear();
        let control = limits.control(stop);
        let max_depth = limits.max_depth.min(difficulty.depth_cap()).max(1);
        let mut board = board.clone();

        let mut ctx = SearchContext::new(&mut self.tt, &control, difficulty.personality, history);
        ctx.path.push(board.hash());

        let mut root_moves: Vec<Move> = {
            let order = OrderingContext {
                tt_move: Move::NULL,
                killers: &ctx.killers,
                history: &ctx.history,
                counters: &ctx.counters,
                prev_move: Move::NULL,
                ply: 0,
            };
            MovePicker::new(&legal, &board, &order).ordered().collect()
        };

        let mut completed_move = root_moves[0];
        let mut completed_score: i32 = 0;
        let mut completed_depth: u8 = 0;
        let mut stability = StabilityTracker::new();
        let mut last_report: Option<Instant> = None;
        let mut reported_depth: u8 = 0;

        for depth in 1..=max_depth {
            if control.should_stop_iterating() {
                break;
            }

            let d = depth as i32;
            let result = if depth > 1 && completed_score.abs() < MATE_THRESHOLD {
                let alpha = completed_score - ASPIRATION_WINDOW;
                let beta = completed_score + ASPIRATION_WINDOW;
                match search_root(&mut board, &root_moves, d, alpha, beta, &mut ctx) {
                    Ok((score, _)) if score <= alpha || score >= beta => {
                        debug!(depth, score, "aspiration window missed");
                        search_root(&mut board, &root_moves, d, -INF, INF, &mut ctx)
                    }
                    other => other,
                }
            } else {
                search_root(&mut board, &root_moves, d, -INF, INF, &mut ctx)
            };

            let Ok((score, best)) = result else {
                debug!(depth, nodes = ctx.nodes, "iteration aborted");
                break;
            };

            completed_move = best;
            completed_score = score;
            completed_depth = depth;
            if let Some(pos) = root_moves.iter().position(|&m| m == best) {
                root_moves[..=pos].rotate_right(1);
            }
            debug!(depth, score, nodes = ctx.nodes, mv = %best.notation(board.size()), "iteration complete");

            if last_report.is_none_or(|t| t.elapsed() >= self.progress_interval) {
                on_progress(&Progress {
                    depth,
                    max_depth,
                    nodes: ctx.nodes,
                    best_move: Some(best),
                    score,
                });
                last_report = Some(Instant::now());
                reported_depth = depth;
            }

            if score.abs() >= MATE_THRESHOLD {
                break;
            }
            control.update_soft_scale(stability.update(best, score));
        }

        let source = if completed_depth == 0 {
            warn!(mv = %completed_move.notation(board.size()), "no iteration completed, using first ordered move");
            MoveSource::Fallback
        } else {
            MoveSource::Search
        };

        if completed_depth > 0 && difficulty.is_noisy() {
            let scoring_depth = completed_depth.min(NOISE_SCORING_DEPTH) as i32;
            match score_root_moves(&mut board, &root_moves, scoring_depth, &mut ctx) {
                Ok(scored) => {
                    if let Some((mv, score)) = difficulty.choose(&scored, &mut rng) {
                        completed_move = mv;
                        completed_score = score;
                    }
                }
                Err(_) => debug!("root scoring aborted, keeping the searched move"),
            }
        }

        if completed_depth > 0 && reported_depth != completed_depth {
            on_progress(&Progress {
                depth: completed_depth,
                max_depth,
                nodes: ctx.nodes,
                best_move: Some(completed_move),
                score: completed_score,
            });
        }

        let nodes = ctx.nodes;
        drop(ctx);
        let pv = self.principal_variation(&board, completed_move, history);
        info!(
            depth = completed_depth,
            score = completed_score,
            nodes,
            elapsed_ms = control.elapsed().as_millis() as u64,
            mv = %completed_move.notation(board.size()),
            "search finished"
        );

        SearchOutcome {
            best_move: Some(completed_move),
            score: completed_score,
            pv,
            nodes,
            depth: completed_depth,
            source,
        }
    }

    /// Walk TT best moves from the root after playing `first`.
    ///
    /// Each step is checked against the legal moves; the walk stops at a
    /// missing or illegal entry or a repeated position.
    fn principal_variation(&self, board: &Board, first: Move, history: &[u64]) -> Vec<Move> {
        let mut board = board.clone();
        let mut seen: Vec<u64> = history.to_vec();
        seen.push(board.hash());
        let mut pv = vec![first];
        board.make_move(first);

        while pv.len() < MAX_PLY {
            let hash = board.hash();
            if seen.contains(&hash) {
                break;
            }
            seen.push(hash);
            let Some(mv) = self.tt.best_move(hash) else {
                break;
            };
            if !generate_legal_moves(&board).contains(mv) {
                warn!(mv = %mv.notation(board.size()), "illegal TT move rejected from PV");
                break;
            }
            pv.push(mv);
            board.make_move(mv);
        }
        pv
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt_entries", &self.tt.len())
            .field("book_positions", &self.book.as_ref().map(OpeningBook::len))
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(TtConfig::default())
    }
}
