//! Score values the recurrence can run on: a scalar [`Score`], or a vector of
//! lanes holding one independent alignment each.
use dp_types::Score;
use num_traits::{Bounded, FromPrimitive, PrimInt, SaturatingAdd, Signed, ToPrimitive};
use std::{array::from_fn, fmt::Debug};

/// The arithmetic the affine recurrence needs. All additions saturate.
pub trait DpScore: Copy + Debug + PartialEq + Send + Sync {
    /// The value `s` in every lane, clamped to the representable range.
    fn splat(s: Score) -> Self;
    fn min_value() -> Self;
    fn sat_add(self, other: Self) -> Self;
    fn vmax(self, other: Self) -> Self;

    #[inline]
    fn zero() -> Self {
        Self::splat(0)
    }

    /// The lowest score a reachable cell can take: `MIN - (gap_open + gap_extend)`,
    /// so that adding both gap scores to it never wraps.
    #[inline]
    fn lowest_viable(gap_open: Score, gap_extend: Score) -> Self {
        let headroom = -(gap_open as i64 + gap_extend as i64);
        Self::min_value().sat_add(Self::splat(headroom.clamp(0, Score::MAX as i64) as Score))
    }
}

impl DpScore for Score {
    #[inline]
    fn splat(s: Score) -> Self {
        s
    }
    #[inline]
    fn min_value() -> Self {
        Score::MIN
    }
    #[inline]
    fn sat_add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
    #[inline]
    fn vmax(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }
}

/// The element type of a lane.
pub trait LaneScalar:
    PrimInt + Signed + SaturatingAdd + FromPrimitive + ToPrimitive + Bounded + Debug + Send + Sync + 'static
{
    const BITS: u32;
}

impl LaneScalar for i8 {
    const BITS: u32 = 8;
}
impl LaneScalar for i16 {
    const BITS: u32 = 16;
}
impl LaneScalar for i32 {
    const BITS: u32 = 32;
}

/// `L` lanes of `S`, updated in lockstep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lanes<S, const L: usize>(pub [S; L]);

impl<S: LaneScalar, const L: usize> Lanes<S, L> {
    #[inline]
    pub fn from_fn(f: impl FnMut(usize) -> S) -> Self {
        Self(from_fn(f))
    }

    /// Lane-wise `if mask { a } else { b }`.
    #[inline]
    pub fn select(mask: [bool; L], a: Self, b: Self) -> Self {
        Self::from_fn(|i| if mask[i] { a.0[i] } else { b.0[i] })
    }

    #[inline]
    pub fn lane(&self, i: usize) -> S {
        self.0[i]
    }

    /// Lane `i` widened to a scalar score.
    #[inline]
    pub fn lane_score(&self, i: usize) -> Score {
        self.0[i].to_i32().unwrap_or(Score::MIN)
    }
}

impl<S: LaneScalar, const L: usize> DpScore for Lanes<S, L> {
    #[inline]
    fn splat(s: Score) -> Self {
        let v = S::from_i32(s).unwrap_or(if s < 0 {
            S::min_value()
        } else {
            S::max_value()
        });
        Self([v; L])
    }
    #[inline]
    fn min_value() -> Self {
        Self([S::min_value(); L])
    }
    #[inline]
    fn sat_add(self, other: Self) -> Self {
        Self::from_fn(|i| SaturatingAdd::saturating_add(&self.0[i], &other.0[i]))
    }
    #[inline]
    fn vmax(self, other: Self) -> Self {
        Self::from_fn(|i| std::cmp::max(self.0[i], other.0[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_viable_leaves_room_for_gaps() {
        let low = Score::lowest_viable(-11, -1);
        assert_eq!(low, Score::MIN + 12);
        assert_eq!(low.sat_add(-11).sat_add(-1), Score::MIN);

        let low = Lanes::<i8, 4>::lowest_viable(-11, -1);
        assert_eq!(low, Lanes([-116; 4]));
    }

    #[test]
    fn lanes_saturate() {
        let a = Lanes::<i8, 2>([120, -120]);
        let b = Lanes::<i8, 2>([10, -10]);
        assert_eq!(a.sat_add(b), Lanes([127, -128]));
        assert_eq!(a.vmax(b), Lanes([120, -10]));
        assert_eq!(Lanes::<i8, 2>::splat(1000), Lanes([127, 127]));
        assert_eq!(Lanes::<i16, 2>::splat(-5).lane_score(1), -5);
        assert_eq!(
            Lanes::select([true, false], a, b),
            Lanes::<i8, 2>([120, -10])
        );
    }
}
