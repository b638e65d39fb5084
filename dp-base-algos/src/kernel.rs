//! Per-cell computation handed to the storage while it walks a column.
use crate::{
    optimum::AlignmentOptimumTracker,
    recurrence::{AffineRecurrence, TraceMode},
    score::DpScore,
};
use dp_types::*;
use std::marker::PhantomData;

/// Computes one cell from its predecessors and reports it to the optimum tracker.
///
/// Storages decide which variant applies to a cell; predecessors are passed
/// by value. `diag` is the `current` score of the diagonal predecessor, before
/// adding the substitution score.
pub trait CellKernel<V: DpScore> {
    /// The score of unreachable states.
    fn lowest(&self) -> V;

    fn origin(&mut self) -> (ScoreCell<V>, TraceCell);

    /// A column-0 cell below the origin, entered through the `up` of the cell above.
    fn first_column(&mut self, row: usize, up_in: V) -> (ScoreCell<V>, TraceCell);

    /// A row-0 cell right of the origin, entered through the `left` of the cell before it.
    fn first_row(&mut self, col: usize, left_in: V) -> (ScoreCell<V>, TraceCell);

    fn inner(&mut self, row: usize, col: usize, diag: V, up_in: V, left_in: V) -> (ScoreCell<V>, TraceCell);

    /// The top cell of a band column, which has no vertical predecessor.
    fn band_first(&mut self, row: usize, col: usize, diag: V, left_in: V) -> (ScoreCell<V>, TraceCell) {
        let lowest = self.lowest();
        self.inner(row, col, diag, lowest, left_in)
    }
}

/// The kernel of a scalar alignment of `reference` (the columns) and `query` (the rows).
pub struct ScalarKernel<'a, T> {
    rec: AffineRecurrence<Score>,
    scoring: &'a ScoringScheme,
    reference: Seq<'a>,
    query: Seq<'a>,
    tracker: AlignmentOptimumTracker,
    _trace: PhantomData<T>,
}

impl<'a, T: TraceMode> ScalarKernel<'a, T> {
    pub fn new(
        method: &Method,
        scoring: &'a ScoringScheme,
        gaps: &GapScheme,
        reference: Seq<'a>,
        query: Seq<'a>,
    ) -> Self {
        let rec = AffineRecurrence::new(method, gaps);
        let dims = MatrixDims::for_pair(reference, query);
        Self {
            tracker: AlignmentOptimumTracker::new(method, dims, rec.lowest()),
            rec,
            scoring,
            reference,
            query,
            _trace: PhantomData,
        }
    }

    pub fn tracker(&self) -> &AlignmentOptimumTracker {
        &self.tracker
    }

    #[inline]
    fn report(&mut self, row: usize, col: usize, out: (ScoreCell<Score>, TraceCell)) -> (ScoreCell<Score>, TraceCell) {
        self.tracker.consider(out.0.current, row, col);
        out
    }
}

impl<'a, T: TraceMode> CellKernel<Score> for ScalarKernel<'a, T> {
    #[inline]
    fn lowest(&self) -> Score {
        self.rec.lowest()
    }

    #[inline]
    fn origin(&mut self) -> (ScoreCell<Score>, TraceCell) {
        let out = if T::ENABLED {
            self.rec.origin_traced()
        } else {
            (self.rec.origin(), TraceCell::NONE)
        };
        self.report(0, 0, out)
    }

    #[inline]
    fn first_column(&mut self, row: usize, up_in: Score) -> (ScoreCell<Score>, TraceCell) {
        let out = if T::ENABLED {
            self.rec.first_column_traced(up_in)
        } else {
            (self.rec.first_column(up_in), TraceCell::NONE)
        };
        self.report(row, 0, out)
    }

    #[inline]
    fn first_row(&mut self, col: usize, left_in: Score) -> (ScoreCell<Score>, TraceCell) {
        let out = if T::ENABLED {
            self.rec.first_row_traced(left_in)
        } else {
            (self.rec.first_row(left_in), TraceCell::NONE)
        };
        self.report(0, col, out)
    }

    #[inline]
    fn inner(&mut self, row: usize, col: usize, diag: Score, up_in: Score, left_in: Score) -> (ScoreCell<Score>, TraceCell) {
        let s = self
            .scoring
            .score(self.reference[col - 1], self.query[row - 1]);
        let diag = diag.sat_add(s);
        let out = if T::ENABLED {
            self.rec.inner_traced(diag, up_in, left_in)
        } else {
            (self.rec.inner(diag, up_in, left_in), TraceCell::NONE)
        };
        self.report(row, col, out)
    }
}
