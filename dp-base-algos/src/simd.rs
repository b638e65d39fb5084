//! Inter-sequence vectorization: lane `i` of every vector belongs to pair `i` of a batch.
//!
//! Sequences of different lengths are padded to the longest one. Padding uses
//! two reserved bit patterns: `MIN` (only the most significant bit set) for
//! the reference and `MIN >> 1` (the two most significant bits set) for the
//! query. Real symbols are non-negative, so a comparison involves padding iff
//! the OR of both operands is negative, and padding never equals anything on
//! the other side.
use crate::{
    kernel::CellKernel,
    optimum::LaneOptimumTracker,
    recurrence::AffineRecurrence,
    score::{DpScore, LaneScalar, Lanes},
};
use dp_types::*;

/// Fails with [`AlignError::ScoreOverflowsLane`] when `score` does not fit in `S`.
pub fn check_fits<S: LaneScalar>(score: i64) -> Result<()> {
    match S::from_i64(score) {
        Some(_) => Ok(()),
        None => Err(AlignError::ScoreOverflowsLane {
            score,
            bits: S::BITS,
        }),
    }
}

/// Match/mismatch scoring on lane vectors.
#[derive(Clone, Copy, Debug)]
pub struct SimdScoring<S, const L: usize> {
    match_score: Lanes<S, L>,
    mismatch_score: Lanes<S, L>,
    local: bool,
}

impl<S: LaneScalar, const L: usize> SimdScoring<S, L> {
    /// Only [`ScoringScheme::Simple`] can be vectorized.
    pub fn new(scoring: &ScoringScheme, gaps: &GapScheme, method: &Method) -> Result<Self> {
        let ScoringScheme::Simple {
            match_score,
            mismatch_score,
        } = *scoring
        else {
            return Err(AlignError::UnsupportedSimdScoring);
        };
        for s in [
            match_score as i64,
            mismatch_score as i64,
            gaps.gap_open() as i64,
            gaps.gap_extend() as i64,
            gaps.gap_open() as i64 + gaps.gap_extend() as i64,
        ] {
            check_fits::<S>(s)?;
        }
        Ok(Self {
            match_score: Lanes::splat(match_score),
            mismatch_score: Lanes::splat(mismatch_score),
            local: method.is_local(),
        })
    }

    /// The largest absolute score of a single step of an alignment.
    pub fn max_step(&self, gaps: &GapScheme) -> i64 {
        [
            self.match_score.lane_score(0) as i64,
            self.mismatch_score.lane_score(0) as i64,
            gaps.gap_open() as i64,
        ]
        .into_iter()
        .map(i64::abs)
        .max()
        .unwrap_or(0)
    }

    /// Lane-wise substitution scores.
    ///
    /// Global: a comparison involving padding scores 0. Local: padding is
    /// always a mismatch.
    #[inline]
    pub fn score(&self, reference: Lanes<S, L>, query: Lanes<S, L>) -> Lanes<S, L> {
        let zero = S::zero();
        Lanes::from_fn(|i| {
            let (l, r) = (reference.lane(i), query.lane(i));
            if l ^ r == zero {
                self.match_score.lane(i)
            } else if !self.local && (l | r) < zero {
                zero
            } else {
                self.mismatch_score.lane(i)
            }
        })
    }
}

/// Up to `L` pairs, transposed into lane vectors.
#[derive(Clone, Debug)]
pub struct PackedBatch<S, const L: usize> {
    /// `reference[j]` holds symbol `j` of every reference.
    pub reference: Vec<Lanes<S, L>>,
    /// `query[i]` holds symbol `i` of every query.
    pub query: Vec<Lanes<S, L>>,
    /// The matrix dimensions of each pair.
    pub dims: Vec<MatrixDims>,
}

fn lane_symbols<S: LaneScalar>(seq: Seq) -> Result<Vec<S>> {
    seq.iter()
        .map(|&c| match S::from_u8(c) {
            Some(s) if s >= S::zero() => Ok(s),
            _ => Err(AlignError::SymbolOutOfLaneRange {
                symbol: c,
                bits: S::BITS,
            }),
        })
        .collect()
}

fn transpose<S: LaneScalar, const L: usize>(seqs: &[Vec<S>], pad: S) -> Vec<Lanes<S, L>> {
    let len = seqs.iter().map(Vec::len).max().unwrap_or(0);
    (0..len)
        .map(|j| Lanes::from_fn(|i| seqs.get(i).and_then(|s| s.get(j)).copied().unwrap_or(pad)))
        .collect()
}

impl<S: LaneScalar, const L: usize> PackedBatch<S, L> {
    pub fn new(pairs: &[(Seq, Seq)]) -> Result<Self> {
        if pairs.len() > L {
            return Err(AlignError::BatchTooLarge {
                pairs: pairs.len(),
                lanes: L,
            });
        }
        let mut references = Vec::with_capacity(pairs.len());
        let mut queries = Vec::with_capacity(pairs.len());
        for &(reference, query) in pairs {
            if reference.is_empty() {
                return Err(AlignError::EmptySequence(Which::First));
            }
            if query.is_empty() {
                return Err(AlignError::EmptySequence(Which::Second));
            }
            references.push(lane_symbols::<S>(reference)?);
            queries.push(lane_symbols::<S>(query)?);
        }
        let reference_pad = S::min_value();
        let query_pad = S::min_value() >> 1;
        Ok(Self {
            reference: transpose(&references, reference_pad),
            query: transpose(&queries, query_pad),
            dims: pairs
                .iter()
                .map(|(r, q)| MatrixDims::for_pair(r, q))
                .collect(),
        })
    }

    /// The dimensions of the padded matrix.
    pub fn dims(&self) -> MatrixDims {
        MatrixDims {
            rows: self.query.len() + 1,
            cols: self.reference.len() + 1,
        }
    }
}

/// The score-only kernel over `L` lanes.
pub struct SimdKernel<'a, S, const L: usize> {
    rec: AffineRecurrence<Lanes<S, L>>,
    scoring: &'a SimdScoring<S, L>,
    batch: &'a PackedBatch<S, L>,
    tracker: LaneOptimumTracker<L>,
}

impl<'a, S: LaneScalar, const L: usize> SimdKernel<'a, S, L> {
    pub fn new(method: &Method, gaps: &GapScheme, scoring: &'a SimdScoring<S, L>, batch: &'a PackedBatch<S, L>) -> Self {
        let rec = AffineRecurrence::new(method, gaps);
        let lowest = Score::lowest_viable(gaps.gap_open(), gaps.gap_extend());
        Self {
            rec,
            scoring,
            batch,
            tracker: LaneOptimumTracker::new(method, &batch.dims, lowest),
        }
    }

    pub fn tracker(&self) -> &LaneOptimumTracker<L> {
        &self.tracker
    }

    #[inline]
    fn report(&mut self, row: usize, col: usize, cell: ScoreCell<Lanes<S, L>>) -> (ScoreCell<Lanes<S, L>>, TraceCell) {
        self.tracker.consider(cell.current, row, col);
        (cell, TraceCell::NONE)
    }
}

impl<'a, S: LaneScalar, const L: usize> CellKernel<Lanes<S, L>> for SimdKernel<'a, S, L> {
    #[inline]
    fn lowest(&self) -> Lanes<S, L> {
        self.rec.lowest()
    }

    #[inline]
    fn origin(&mut self) -> (ScoreCell<Lanes<S, L>>, TraceCell) {
        let cell = self.rec.origin();
        self.report(0, 0, cell)
    }

    #[inline]
    fn first_column(&mut self, row: usize, up_in: Lanes<S, L>) -> (ScoreCell<Lanes<S, L>>, TraceCell) {
        let cell = self.rec.first_column(up_in);
        self.report(row, 0, cell)
    }

    #[inline]
    fn first_row(&mut self, col: usize, left_in: Lanes<S, L>) -> (ScoreCell<Lanes<S, L>>, TraceCell) {
        let cell = self.rec.first_row(left_in);
        self.report(0, col, cell)
    }

    #[inline]
    fn inner(
        &mut self,
        row: usize,
        col: usize,
        diag: Lanes<S, L>,
        up_in: Lanes<S, L>,
        left_in: Lanes<S, L>,
    ) -> (ScoreCell<Lanes<S, L>>, TraceCell) {
        let s = self
            .scoring
            .score(self.batch.reference[col - 1], self.batch.query[row - 1]);
        let cell = self.rec.inner(diag.sat_add(s), up_in, left_in);
        self.report(row, col, cell)
    }
}
