//! Search worker: one thread owning one searcher, fed jobs over a channel.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use archon_engine::{OpeningBook, Progress, SearchOutcome, Searcher, TtConfig};

use crate::coordinator::SearchRequest;

/// One dispatched request with its private reply channels.
pub(crate) struct Job {
    pub request: SearchRequest,
    pub stop: Arc<AtomicBool>,
    pub progress: Sender<Progress>,
    pub reply: Sender<SearchOutcome>,
}

/// Everything a worker needs to build its own searcher.
#[derive(Clone)]
pub(crate) struct WorkerSetup {
    pub tt: TtConfig,
    pub book: Option<OpeningBook>,
    pub progress_interval: Duration,
}

impl WorkerSetup {
    fn searcher(&self) -> Searcher {
        let searcher = Searcher::new(self.tt).with_progress_interval(self.progress_interval);
        match &self.book {
            Some(book) => searcher.with_book(book.clone()),
            None => searcher,
        }
    }
}

/// Start worker `id` on its own thread.
pub(crate) fn spawn(
    id: usize,
    setup: WorkerSetup,
    jobs: Receiver<Job>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("archon-search-{id}"))
        .spawn(move || run(id, setup, jobs))
}

fn run(id: usize, setup: WorkerSetup, jobs: Receiver<Job>) {
    debug!(worker = id, "search worker started");
    let mut searcher = setup.searcher();

    for job in jobs.iter() {
        let Job {
            request,
            stop,
            progress,
            reply,
        } = job;

        if stop.load(Ordering::Relaxed) {
            debug!(worker = id, "job cancelled before start");
            continue;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            searcher.search(
                &request.board,
                &request.limits,
                &request.difficulty,
                &request.history,
                stop,
                |p| {
                    let _ = progress.send(*p);
                },
            )
        }));

        match result {
            Ok(outcome) => {
                // The requester may have given up already.
                let _ = reply.send(outcome);
            }
            Err(_) => {
                // Dropping `reply` tells the ticket to fall back.
                warn!(worker = id, "search panicked, rebuilding searcher");
                searcher = setup.searcher();
            }
        }
    }

    debug!(worker = id, "search worker stopped");
}
