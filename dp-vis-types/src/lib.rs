pub mod debug_matrix;

pub use debug_matrix::DebugMatrix;

use dp_types::*;
use serde::{Deserialize, Serialize};

/// One freshly computed column of the DP matrix.
///
/// `cells[i]` and `traces[i]` belong to row `first_row + i`. Rows outside
/// `first_row..first_row + cells.len()` are not part of the band.
#[derive(Debug)]
pub struct ColumnView<'a, V = Score> {
    pub col: usize,
    pub first_row: usize,
    pub cells: &'a [ScoreCell<V>],
    /// `None` when the matrix does not store trace directions.
    pub traces: Option<&'a [TraceCell]>,
}

impl<'a, V> Clone for ColumnView<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, V> Copy for ColumnView<'a, V> {}

impl<'a, V: Copy> ColumnView<'a, V> {
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.first_row..self.first_row + self.cells.len()
    }

    /// The `current` score of `row`, if it is part of this column.
    pub fn score(&self, row: usize) -> Option<V> {
        row.checked_sub(self.first_row)
            .and_then(|i| self.cells.get(i))
            .map(|c| c.current)
    }
}

/// Callbacks to follow the progress of a scalar alignment, one column at a time.
///
/// All methods default to doing nothing, so the default [`NoDebug`] compiles away.
pub trait ColumnObserver {
    /// Called once the matrix is allocated, before the first column.
    fn start(&mut self, _dims: MatrixDims, _reference: Seq, _query: Seq) {}

    /// Called after every computed column, in increasing column order.
    fn column(&mut self, _view: ColumnView<'_>) {}

    /// Called after the optimum is known and the traceback, if any, is done.
    fn finish(&mut self, _score: Score, _end: Coordinate, _cigar: Option<&Cigar>) {}
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoDebug;

impl ColumnObserver for NoDebug {}

impl<O: ColumnObserver + ?Sized> ColumnObserver for &mut O {
    fn start(&mut self, dims: MatrixDims, reference: Seq, query: Seq) {
        (**self).start(dims, reference, query)
    }
    fn column(&mut self, view: ColumnView<'_>) {
        (**self).column(view)
    }
    fn finish(&mut self, score: Score, end: Coordinate, cigar: Option<&Cigar>) {
        (**self).finish(score, end, cigar)
    }
}
