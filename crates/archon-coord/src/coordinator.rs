//! Request dispatch over a fixed pool of search workers.
//!
//! Each worker owns a private [`Searcher`](archon_engine::Searcher) and a
//! copy of the opening book for the current game mode. Requests travel
//! over a shared job queue and answer on their own channels, so concurrent
//! requests never share mutable state. The ticket returned by
//! [`Coordinator::request`] enforces an outer timeout and falls back to a
//! random legal move when the worker does not answer in time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use rand::Rng;
use tracing::{debug, info, warn};

use archon_core::{Board, generate_legal_moves};
use archon_engine::{
    DEFAULT_TT_CAPACITY, Difficulty, MoveSource, OpeningBook, Progress, SearchLimits,
    SearchOutcome, TtConfig,
};

use crate::error::CoordError;
use crate::worker::{self, Job, WorkerSetup};

/// Upper bound on the default worker count.
const MAX_DEFAULT_WORKERS: usize = 4;

/// Pool sizing and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub workers: usize,
    /// Wall-clock limit on a whole request, independent of the search's own.
    pub outer_timeout: Duration,
    /// Transposition table entries per worker.
    pub tt_capacity: usize,
    /// Minimum spacing between relayed progress events.
    pub progress_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(MAX_DEFAULT_WORKERS);
        Self {
            workers,
            outer_timeout: Duration::from_secs(30),
            tt_capacity: DEFAULT_TT_CAPACITY,
            progress_interval: Duration::from_millis(100),
        }
    }
}

/// One position to search and how.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub board: Board,
    pub limits: SearchLimits,
    pub difficulty: Difficulty,
    /// Hashes of earlier game positions, oldest first.
    pub history: Vec<u64>,
}

impl SearchRequest {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            limits: SearchLimits::default(),
            difficulty: Difficulty::default(),
            history: Vec::new(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_history(mut self, history: Vec<u64>) -> Self {
        self.history = history;
        self
    }
}

/// Fixed-size pool of search workers for one game mode.
pub struct Coordinator {
    config: CoordinatorConfig,
    mode: String,
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    /// Stop flags of requests that may still be running.
    issued: Vec<Weak<AtomicBool>>,
}

impl Coordinator {
    /// Spawn `config.workers` workers, each loaded with `book`.
    pub fn new(
        config: CoordinatorConfig,
        mode: impl Into<String>,
        book: Option<OpeningBook>,
    ) -> Result<Self, CoordError> {
        let mut coordinator = Self {
            config,
            mode: mode.into(),
            jobs: None,
            workers: Vec::new(),
            issued: Vec::new(),
        };
        coordinator.spawn_workers(book)?;
        info!(
            workers = coordinator.workers.len(),
            mode = %coordinator.mode,
            "coordinator started"
        );
        Ok(coordinator)
    }

    /// The game mode the workers are loaded for.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a search without waiting for it.
    pub fn request(&mut self, request: SearchRequest) -> Result<SearchTicket, CoordError> {
        let jobs = self.jobs.as_ref().ok_or(CoordError::Disconnected)?;

        let stop = Arc::new(AtomicBool::new(false));
        let (progress_tx, progress_rx) = unbounded();
        let (reply_tx, reply_rx) = bounded(1);

        let ticket = SearchTicket {
            board: request.board.clone(),
            difficulty: request.difficulty,
            stop: Arc::clone(&stop),
            progress: progress_rx,
            reply: reply_rx,
            deadline: Instant::now() + self.config.outer_timeout,
        };

        self.issued.retain(|flag| flag.strong_count() > 0);
        self.issued.push(Arc::downgrade(&stop));

        jobs.send(Job {
            request,
            stop,
            progress: progress_tx,
            reply: reply_tx,
        })
        .map_err(|_| CoordError::Disconnected)?;
        Ok(ticket)
    }

    /// Switch to another game mode, recycling every worker with `book`.
    ///
    /// In-flight requests are stopped and answer with what they have.
    pub fn set_mode(
        &mut self,
        mode: impl Into<String>,
        book: Option<OpeningBook>,
    ) -> Result<(), CoordError> {
        let mode = mode.into();
        if mode == self.mode {
            return Ok(());
        }
        info!(from = %self.mode, to = %mode, "recycling workers for new mode");
        self.stop_workers();
        self.mode = mode;
        self.spawn_workers(book)
    }

    /// Stop in-flight searches, close the queue, and join every worker.
    pub fn shutdown(&mut self) {
        if self.jobs.is_none() && self.workers.is_empty() {
            return;
        }
        self.stop_workers();
        info!(mode = %self.mode, "coordinator stopped");
    }

    fn spawn_workers(&mut self, book: Option<OpeningBook>) -> Result<(), CoordError> {
        let (tx, rx) = unbounded();
        let setup = WorkerSetup {
            tt: TtConfig {
                capacity: self.config.tt_capacity,
            },
            book,
            progress_interval: self.config.progress_interval,
        };
        for id in 0..self.config.workers.max(1) {
            let handle = worker::spawn(id, setup.clone(), rx.clone())?;
            self.workers.push(handle);
        }
        self.jobs = Some(tx);
        Ok(())
    }

    fn stop_workers(&mut self) {
        for flag in self.issued.drain(..).filter_map(|weak| weak.upgrade()) {
            flag.store(true, Ordering::Relaxed);
        }
        self.jobs = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("search worker exited abnormally");
            }
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("mode", &self.mode)
            .field("workers", &self.workers.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Handle to one dispatched search.
pub struct SearchTicket {
    board: Board,
    difficulty: Difficulty,
    stop: Arc<AtomicBool>,
    progress: Receiver<Progress>,
    reply: Receiver<SearchOutcome>,
    deadline: Instant,
}

impl SearchTicket {
    /// Progress events relayed since the last call.
    pub fn progress(&self) -> impl Iterator<Item = Progress> + '_ {
        self.progress.try_iter()
    }

    /// Ask the worker to stop; `wait` still returns its best move so far.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Block until the search answers or the outer timeout fires.
    ///
    /// Falls back to a uniformly random legal move when the worker times
    /// out, fails, or reports no move. Errors only when the position has no
    /// legal move at all.
    pub fn wait(self) -> Result<SearchOutcome, CoordError> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        match self.reply.recv_timeout(remaining) {
            Ok(outcome) if outcome.best_move.is_some() => Ok(outcome),
            Ok(_) => self.fallback(),
            Err(RecvTimeoutError::Timeout) => {
                self.cancel();
                warn!("outer timeout, playing a random legal move");
                self.fallback()
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("search worker failed, playing a random legal move");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Result<SearchOutcome, CoordError> {
        let moves = generate_legal_moves(&self.board);
        if moves.is_empty() {
            return Err(CoordError::NoLegalMoves);
        }
        let mut rng = self.difficulty.rng();
        let mv = moves[rng.random_range(0..moves.len())];
        debug!(mv = %mv.notation(self.board.size()), "fallback move");
        Ok(SearchOutcome {
            best_move: Some(mv),
            score: 0,
            pv: vec![mv],
            nodes: 0,
            depth: 0,
            source: MoveSource::Fallback,
        })
    }
}

impl std::fmt::Debug for SearchTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTicket")
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .field("deadline", &self.deadline)
            .finish()
    }
}
