//! Elo-calibrated strength: depth caps, root score noise, and blunders.

use archon_core::Move;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::eval::personality::Personality;

/// At or above this rating the engine plays its best move without noise.
pub const FULL_STRENGTH_ELO: u16 = 2200;

/// Below this rating root moves are sampled and blunders happen.
pub const WEAKEST_TIER_ELO: u16 = 1000;

const MAX_NOISE: i32 = 150;
const BLUNDER_CHANCE: f64 = 0.15;
const MIN_SAMPLE: usize = 5;

/// Deepest search used to score root moves for noisy play.
pub const NOISE_SCORING_DEPTH: u8 = 3;

/// Strength and style for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    pub elo: u16,
    pub personality: Personality,
    /// Fixed seed for reproducible noise; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            elo: 2500,
            personality: Personality::Normal,
            seed: None,
        }
    }
}

impl Difficulty {
    /// Settings for `elo` with the default personality and no seed.
    pub fn new(elo: u16) -> Self {
        Self {
            elo,
            ..Self::default()
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Maximum iterative-deepening depth for this rating.
    pub fn depth_cap(&self) -> u8 {
        match self.elo {
            0..1000 => 3,
            1000..1400 => 4,
            1400..1800 => 5,
            1800..2200 => 6,
            _ => 8,
        }
    }

    /// Half-width of the zero-mean noise added to root scores, in centipawns.
    pub fn noise_amplitude(&self) -> i32 {
        let gap = FULL_STRENGTH_ELO.saturating_sub(self.elo) as i32;
        (gap / 8).min(MAX_NOISE)
    }

    /// Return `true` if root moves should be re-scored and perturbed.
    pub fn is_noisy(&self) -> bool {
        self.noise_amplitude() > 0
    }

    /// Return `true` for the sampling and blunder tier.
    pub fn is_weakest(&self) -> bool {
        self.elo < WEAKEST_TIER_ELO
    }

    /// Random source for this request.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Pick a root move from `scored` (every legal move with its score).
    ///
    /// Adds noise to each score, then either takes the best noisy score or,
    /// on the weakest tier, samples from the top half (at least five) with a
    /// chance of ignoring the scores entirely. Returns the move and its
    /// unperturbed score, or `None` when `scored` is empty.
    pub fn choose<R: Rng>(&self, scored: &[(Move, i32)], rng: &mut R) -> Option<(Move, i32)> {
        if scored.is_empty() {
            return None;
        }

        if self.is_weakest() && rng.random_bool(BLUNDER_CHANCE) {
            return Some(scored[rng.random_range(0..scored.len())]);
        }

        let amplitude = self.noise_amplitude();
        let mut noisy: Vec<(usize, i32)> = scored
            .iter()
            .enumerate()
            .map(|(i, &(_, score))| {
                let noise = if amplitude > 0 {
                    rng.random_range(-amplitude..=amplitude)
                } else {
                    0
                };
                (i, score.saturating_add(noise))
            })
            .collect();
        noisy.sort_by_key(|&(_, s)| std::cmp::Reverse(s));

        let pick = if self.is_weakest() {
            let top = (noisy.len() / 2).max(MIN_SAMPLE).min(noisy.len());
            noisy[rng.random_range(0..top)].0
        } else {
            noisy[0].0
        };
        Some(scored[pick])
    }
}
