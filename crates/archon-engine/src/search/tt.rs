//! Two-tier transposition table.
//!
//! The **deep** tier keeps, per position, the result of the deepest search
//! seen so far; the **recent** tier always holds the latest write. Probes
//! read both and prefer the deeper entry, so a fresh shallow result never
//! hides a deep one and a stale deep entry never hides the current path's
//! move hint.
//!
//! Both tiers are bounded and evict the least recently written key. Keys are
//! the full 64-bit Zobrist hash; two positions sharing a hash may surface each
//! other's data, so callers validate any suggested move against the legal
//! move list before playing it.

use std::collections::{HashMap, VecDeque};

use archon_core::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// Default total entry capacity across both tiers.
pub const DEFAULT_TT_CAPACITY: usize = 1_000_000;

/// Table sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtConfig {
    /// Total entries across both tiers: 40% deep, 60% recent.
    pub capacity: usize,
}

impl Default for TtConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TT_CAPACITY,
        }
    }
}

impl TtConfig {
    fn deep_capacity(self) -> usize {
        (self.capacity * 2 / 5).max(1)
    }

    fn recent_capacity(self) -> usize {
        (self.capacity - self.capacity * 2 / 5).max(1)
    }
}

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The stored score is exact (PV node).
    Exact,
    /// The stored score is a lower bound (failed high / beta cutoff).
    LowerBound,
    /// The stored score is an upper bound (failed low / all-node).
    UpperBound,
}

/// One stored search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    /// Score in TT form (mate distance measured from this node).
    pub score: i32,
    pub bound: Bound,
    pub best_move: Move,
}

/// Result of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtProbe {
    /// Ordering hint; [`Move::NULL`] when no entry carried a move.
    pub best_move: Move,
    /// Present only when the stored depth and bound justify a cutoff.
    pub score: Option<i32>,
}

/// Convert a search score to TT-storable form.
///
/// Mate scores are path-dependent: `MATE_SCORE - ply` changes based on
/// the search path. We store them as distance-from-node instead of
/// distance-from-root so they're path-independent.
pub fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Convert a TT-stored score back to search-usable form.
///
/// Reverses the mate-distance adjustment applied by [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// A bounded map that evicts the least recently written key.
///
/// Write order lives in a queue of `(key, stamp)` pairs; a pair whose stamp
/// no longer matches the map is stale and skipped on eviction.
#[derive(Debug)]
struct Tier {
    map: HashMap<u64, (TtEntry, u64)>,
    order: VecDeque<(u64, u64)>,
    capacity: usize,
    clock: u64,
}

impl Tier {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            clock: 0,
        }
    }

    fn get(&self, hash: u64) -> Option<&TtEntry> {
        self.map.get(&hash).map(|(entry, _)| entry)
    }

    fn insert(&mut self, hash: u64, entry: TtEntry) {
        self.clock += 1;
        self.map.insert(hash, (entry, self.clock));
        self.order.push_back((hash, self.clock));

        while self.map.len() > self.capacity {
            let Some((key, stamp)) = self.order.pop_front() else {
                break;
            };
            if self.map.get(&key).is_some_and(|&(_, s)| s == stamp) {
                self.map.remove(&key);
            }
        }

        // Rewrites of hot keys leave stale queue pairs behind.
        if self.order.len() > self.capacity * 4 + 64 {
            let map = &self.map;
            self.order
                .retain(|(key, stamp)| map.get(key).is_some_and(|&(_, s)| s == *stamp));
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
        self.clock = 0;
    }
}

/// Depth-preferred plus always-replace transposition table.
#[derive(Debug)]
pub struct TranspositionTable {
    deep: Tier,
    recent: Tier,
}

impl TranspositionTable {
    /// Create an empty table.
    pub fn new(config: TtConfig) -> Self {
        Self {
            deep: Tier::new(config.deep_capacity()),
            recent: Tier::new(config.recent_capacity()),
        }
    }

    /// Store a completed node.
    ///
    /// The recent tier is always overwritten; the deep tier only when `depth`
    /// is at least the depth already stored for this key.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u8,
        score: i32,
        bound: Bound,
        best_move: Move,
        ply: u8,
    ) {
        let entry = TtEntry {
            depth,
            score: score_to_tt(score, ply),
            bound,
            best_move,
        };
        self.recent.insert(hash, entry);
        if self.deep.get(hash).is_none_or(|old| depth >= old.depth) {
            self.deep.insert(hash, entry);
        }
    }

    /// The deeper of the two tier entries for `hash`.
    fn preferred(&self, hash: u64) -> Option<TtEntry> {
        match (self.deep.get(hash), self.recent.get(hash)) {
            (Some(deep), Some(recent)) if recent.depth >= deep.depth => Some(*recent),
            (Some(deep), _) => Some(*deep),
            (None, recent) => recent.copied(),
        }
    }

    /// Look up `hash` for a search at `depth` within `(alpha, beta)`.
    ///
    /// Always returns the move hint when an entry exists; the score is only
    /// returned when the stored depth is sufficient and the bound proves a
    /// result for this window.
    pub fn probe(
        &self,
        hash: u64,
        depth: u8,
        alpha: i32,
        beta: i32,
        ply: u8,
    ) -> Option<TtProbe> {
        let entry = self.preferred(hash)?;
        let best_move = if entry.best_move.is_null() {
            self.best_move(hash).unwrap_or(Move::NULL)
        } else {
            entry.best_move
        };

        let score = if entry.depth >= depth {
            let score = score_from_tt(entry.score, ply);
            match entry.bound {
                Bound::Exact => Some(score),
                Bound::LowerBound if score >= beta => Some(score),
                Bound::UpperBound if score <= alpha => Some(score),
                _ => None,
            }
        } else {
            None
        };

        Some(TtProbe { best_move, score })
    }

    /// Best move recorded for `hash` in either tier, deeper tier first.
    pub fn best_move(&self, hash: u64) -> Option<Move> {
        let deep = self.deep.get(hash).map(|e| e.best_move);
        let recent = self.recent.get(hash).map(|e| e.best_move);
        match self.preferred(hash) {
            Some(entry) if !entry.best_move.is_null() => Some(entry.best_move),
            _ => deep.into_iter().chain(recent).find(|mv| !mv.is_null()),
        }
    }

    /// Number of entries per tier as `(deep, recent)`.
    pub fn len(&self) -> (usize, usize) {
        (self.deep.len(), self.recent.len())
    }

    /// Return `true` if both tiers are empty.
    pub fn is_empty(&self) -> bool {
        self.deep.len() == 0 && self.recent.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.deep.clear();
        self.recent.clear();
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(TtConfig::default())
    }
}
