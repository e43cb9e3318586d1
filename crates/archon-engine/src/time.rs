//! Time management: convert request limits to soft and hard deadlines.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::search::control::SearchControl;

/// Budget when neither a time limit nor a clock is supplied.
pub const DEFAULT_MOVE_TIME: Duration = Duration::from_millis(1000);

/// Share of the remaining clock spent on one move.
const MOVES_TO_GO: u32 = 20;

/// Default iterative-deepening ceiling; difficulty caps usually bind first.
pub const DEFAULT_MAX_DEPTH: u8 = 64;

/// The mover's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub remaining: Duration,
    pub increment: Duration,
}

/// Depth and time limits for one search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u8,
    /// Hard per-move limit; overrides the clock.
    pub time_limit: Option<Duration>,
    pub clock: Option<ClockState>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            time_limit: None,
            clock: None,
        }
    }
}

impl SearchLimits {
    /// Search to `max_depth` with a fixed per-move time limit.
    pub fn new(max_depth: u8, time_limit: Duration) -> Self {
        Self {
            max_depth,
            time_limit: Some(time_limit),
            clock: None,
        }
    }

    /// Search with a time budget derived from the mover's clock.
    pub fn with_clock(remaining: Duration, increment: Duration) -> Self {
        Self {
            clock: Some(ClockState {
                remaining,
                increment,
            }),
            ..Self::default()
        }
    }

    /// Soft and hard limits for this request.
    pub fn budget(&self) -> (Duration, Duration) {
        let hard = match (self.time_limit, self.clock) {
            (Some(limit), _) => limit,
            (None, Some(clock)) => clock_budget(clock),
            (None, None) => DEFAULT_MOVE_TIME,
        };
        (soft_limit(hard), hard)
    }

    /// Build the [`SearchControl`] that enforces these limits.
    pub fn control(&self, stopped: Arc<AtomicBool>) -> SearchControl {
        let (soft, hard) = self.budget();
        SearchControl::new_timed(stopped, soft, hard)
    }
}

/// Per-move budget from a running clock: a twentieth of what is left plus
/// half the increment, never more than is left.
///
/// | Remaining | Increment | Budget |
/// |-----------|-----------|--------|
/// | 60 s      | 0         | 3 s    |
/// | 60 s      | 2 s       | 4 s    |
/// | < 10 ms   | any       | 1 ms   |
pub fn clock_budget(clock: ClockState) -> Duration {
    if clock.remaining < Duration::from_millis(10) {
        return Duration::from_millis(1);
    }
    let budget = clock.remaining / MOVES_TO_GO + clock.increment / 2;
    budget.min(clock.remaining - Duration::from_millis(5))
}

/// Half the hard limit; stability scaling later stretches or shrinks it.
pub fn soft_limit(hard: Duration) -> Duration {
    hard / 2
}
