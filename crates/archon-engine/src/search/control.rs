//! Search control: stop flag and deadlines.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Nodes between two clock reads.
const CHECK_INTERVAL: u64 = 2048;

/// Controls when a search should stop.
///
/// Checked periodically by the search (every 2048 nodes) to decide whether
/// to abort. The hard limit aborts mid-iteration; the soft limit only stops
/// iterative deepening from starting another depth, and is rescaled after
/// each iteration by best-move stability.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    /// Soft-limit scale in hundredths.
    soft_scale: AtomicU32,
}

impl SearchControl {
    /// Control without time limits; only the external stop flag ends the search.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
            soft_scale: AtomicU32::new(100),
        }
    }

    /// Control with time limits; the clock starts immediately.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft.min(hard)),
            hard_limit: Some(hard),
            soft_scale: AtomicU32::new(100),
        }
    }

    /// Check whether the search should abort immediately.
    ///
    /// Returns `true` if the external stop flag was set, or if the hard limit
    /// has been exceeded (checked only every 2048 nodes). When the hard limit
    /// fires, the stop flag is set so later calls return at once.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if nodes % CHECK_INTERVAL != 0 {
            return false;
        }

        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        false
    }

    /// Check whether iterative deepening should start a new iteration.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        match (self.soft_limit, self.hard_limit) {
            (Some(soft), hard) => {
                let scaled = soft.mul_f64(self.soft_scale.load(Ordering::Relaxed) as f64 / 100.0);
                let limit = hard.map_or(scaled, |h| scaled.min(h));
                self.elapsed() >= limit
            }
            (None, _) => false,
        }
    }

    /// Rescale the soft limit (in hundredths) after an iteration.
    pub fn update_soft_scale(&self, scale: u32) {
        self.soft_scale.store(scale, Ordering::Relaxed);
    }

    /// Elapsed time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
