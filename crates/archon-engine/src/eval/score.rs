//! Middlegame/endgame score pair used throughout evaluation.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A pair of middlegame and endgame centipawn values.
///
/// Every evaluation term produces one of these; the final score blends the
/// two halves by the game phase (see [`Score::taper`]). The components are
/// kept as separate `i32` fields because compound pieces and large boards
/// push material sums well past what a packed `i16` pair can hold.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score {
    mg: i32,
    eg: i32,
}

impl Score {
    /// Zero score (mg=0, eg=0).
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    /// Construct a `Score` from separate middlegame and endgame values.
    #[inline]
    pub const fn new(mg: i32, eg: i32) -> Score {
        Score { mg, eg }
    }

    /// Middlegame component.
    #[inline]
    pub const fn mg(self) -> i32 {
        self.mg
    }

    /// Endgame component.
    #[inline]
    pub const fn eg(self) -> i32 {
        self.eg
    }

    /// Scale both components by a floating-point weight, rounding to nearest.
    #[inline]
    pub fn scaled(self, weight: f32) -> Score {
        if weight == 1.0 {
            return self;
        }
        Score::new(
            (self.mg as f32 * weight).round() as i32,
            (self.eg as f32 * weight).round() as i32,
        )
    }

    /// Blend the two components: `phase == max_phase` is pure middlegame,
    /// `phase == 0` pure endgame.
    #[inline]
    pub fn taper(self, phase: i32, max_phase: i32) -> i32 {
        let phase = phase.clamp(0, max_phase);
        (self.mg * phase + self.eg * (max_phase - phase)) / max_phase
    }
}

/// Shorthand constructor for a [`Score`].
///
/// `S(mg, eg)` is equivalent to `Score::new(mg, eg)`. The uppercase name
/// follows the usual handcrafted-evaluation convention.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i32, eg: i32) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        self.mg -= rhs.mg;
        self.eg -= rhs.eg;
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        Score::new(-self.mg, -self.eg)
    }
}

impl Mul<i32> for Score {
    type Output = Score;

    #[inline]
    fn mul(self, rhs: i32) -> Score {
        Score::new(self.mg * rhs, self.eg * rhs)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg, self.eg)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg, self.eg)
    }
}

#[cfg(test)]
mod tests {
    use super::{S, Score};

    #[test]
    fn components() {
        let s = S(100, -50);
        assert_eq!(s.mg(), 100);
        assert_eq!(s.eg(), -50);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(S(10, 20) + S(30, 40), S(40, 60));
        assert_eq!(S(50, 60) - S(10, 20), S(40, 40));
        assert_eq!(-S(10, -20), S(-10, 20));
        assert_eq!(S(10, 20) * -2, S(-20, -40));
    }

    #[test]
    fn assign_ops() {
        let mut s = S(1, 2);
        s += S(3, 4);
        assert_eq!(s, S(4, 6));
        s -= S(4, 6);
        assert_eq!(s, Score::ZERO);
    }

    #[test]
    fn values_beyond_i16_range() {
        let s = S(40_000, -40_000) * 2;
        assert_eq!(s.mg(), 80_000);
        assert_eq!(s.eg(), -80_000);
    }

    #[test]
    fn scaled_rounds() {
        assert_eq!(S(10, 15).scaled(1.5), S(15, 23));
        assert_eq!(S(10, 15).scaled(1.0), S(10, 15));
        assert_eq!(S(-10, 10).scaled(0.0), Score::ZERO);
    }

    #[test]
    fn taper_endpoints() {
        let s = S(100, 300);
        assert_eq!(s.taper(24, 24), 100);
        assert_eq!(s.taper(0, 24), 300);
        assert_eq!(s.taper(12, 24), 200);
        // Out-of-range phases clamp.
        assert_eq!(s.taper(40, 24), 100);
    }
}
